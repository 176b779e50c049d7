//! A device instance that owns its generated geometry.

use std::fmt::Debug;

use layir::CellGeometry;

use crate::devices::{Generation, PCell};
use crate::error::{Error, Result};
use crate::rules::DeviceRuleSet;

/// The lifecycle state of a [`PCellInstance`].
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub enum InstanceState {
    /// No parameters and no geometry.
    Uninitialized,
    /// Parameters are set but no geometry has been generated for them.
    Parameterized,
    /// Geometry matches the current parameters.
    Generated,
}

/// An instance of the cell `D`.
///
/// Changing the parameters discards the geometry; generating replaces it
/// wholesale. A failed generation leaves the instance parameterized with no
/// geometry.
pub struct PCellInstance<D: PCell> {
    params: Option<D::Params>,
    generation: Option<Generation>,
}

impl<D: PCell> Debug for PCellInstance<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PCellInstance")
            .field("cell", &D::NAME)
            .field("params", &self.params)
            .field("state", &self.state())
            .finish()
    }
}

impl<D: PCell> Default for PCellInstance<D> {
    fn default() -> Self {
        Self {
            params: None,
            generation: None,
        }
    }
}

impl<D: PCell> PCellInstance<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: D::Params) -> Self {
        Self {
            params: Some(params),
            generation: None,
        }
    }

    pub fn state(&self) -> InstanceState {
        match (&self.params, &self.generation) {
            (None, _) => InstanceState::Uninitialized,
            (Some(_), None) => InstanceState::Parameterized,
            (Some(_), Some(_)) => InstanceState::Generated,
        }
    }

    pub fn params(&self) -> Option<&D::Params> {
        self.params.as_ref()
    }

    /// Sets new parameters, discarding any generated geometry.
    pub fn set_params(&mut self, params: D::Params) {
        self.params = Some(params);
        self.generation = None;
    }

    /// Generates geometry for the current parameters.
    pub fn generate(&mut self, rules: &DeviceRuleSet) -> Result<&Generation> {
        self.generation = None;
        let params = self.params.as_ref().ok_or(Error::MissingParameters(D::NAME))?;
        let generation = D::generate(rules, params)?;
        let generation: &Generation = self.generation.insert(generation);
        Ok(generation)
    }

    pub fn generation(&self) -> Option<&Generation> {
        self.generation.as_ref()
    }

    pub fn geometry(&self) -> Option<&CellGeometry> {
        self.generation.as_ref().map(|g| &g.elements)
    }
}
