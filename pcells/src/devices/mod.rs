//! Device generators.
//!
//! Each generator is a pure function of a [`DeviceRuleSet`] and a parameter
//! record. It either returns the complete geometry of the device or an
//! error; there is no partial output.

pub mod cmim;
pub mod nmos;
pub mod rsil;

use std::fmt::Debug;
use std::hash::Hash;

use arcstr::ArcStr;
use indexmap::IndexMap;
use layir::{CellGeometry, Element};
use serde::Serialize;

use crate::diagnostics::{IssueSet, PcellIssue};
use crate::error::Result;
use crate::params::DeviceParameters;
use crate::rules::{CommonRules, DeviceRuleSet};

pub use cmim::{cmim, Cmim};
pub use nmos::{nmos, Nmos};
pub use rsil::{rsil, Rsil};

/// The output of one generator run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Generation {
    /// Geometry in painting order.
    pub elements: CellGeometry,
    /// Recoverable issues raised while generating.
    pub issues: IssueSet<PcellIssue>,
    /// Derived values such as the drawn width or the resistance.
    pub properties: IndexMap<ArcStr, f64>,
}

impl Generation {
    pub fn property(&self, name: &str) -> Option<f64> {
        self.properties.get(name).copied()
    }
}

/// A parametric cell.
pub trait PCell {
    /// The parameter record of the cell.
    type Params: Clone + Debug + Eq + Hash;

    /// The cell name, also used as the text of its thermal label.
    const NAME: &'static str;

    /// Generates the cell's geometry.
    fn generate(rules: &DeviceRuleSet, params: &Self::Params) -> Result<Generation>;
}

/// Generates any supported device.
pub fn generate(rules: &DeviceRuleSet, params: &DeviceParameters) -> Result<Generation> {
    match params {
        DeviceParameters::Nmos(params) => Nmos::generate(rules, params),
        DeviceParameters::Rsil(params) => Rsil::generate(rules, params),
        DeviceParameters::Cmim(params) => Cmim::generate(rules, params),
    }
}

/// Collects elements, issues and properties while a generator runs.
pub(crate) struct Output {
    cell: &'static str,
    tolerance: f64,
    generation: Generation,
}

impl Output {
    pub(crate) fn new(cell: &'static str, common: &CommonRules) -> Self {
        tracing::debug!(cell, "generating");
        Self {
            cell,
            tolerance: common.epsilon * common.grid,
            generation: Generation::default(),
        }
    }

    pub(crate) fn add(&mut self, element: impl Into<Element>) {
        self.generation.elements.add_element(element);
    }

    pub(crate) fn extend(&mut self, elements: impl IntoIterator<Item = Element>) {
        self.generation.elements.extend(elements);
    }

    /// Returns `value`, raised to `minimum` if it falls short.
    ///
    /// Only a shortfall beyond the tolerance raises a warning.
    pub(crate) fn clamp_min(&mut self, parameter: &'static str, value: f64, minimum: f64) -> f64 {
        if value < minimum - self.tolerance {
            self.generation
                .issues
                .add(PcellIssue::ParameterBelowMinimum {
                    cell: self.cell,
                    parameter,
                    requested: value,
                    minimum,
                });
            minimum
        } else {
            value.max(minimum)
        }
    }

    pub(crate) fn degenerate(&mut self, what: &'static str) {
        self.generation.issues.add(PcellIssue::DegenerateGeometry {
            cell: self.cell,
            what,
        });
    }

    pub(crate) fn property(&mut self, name: &'static str, value: f64) {
        self.generation
            .properties
            .insert(ArcStr::from(name), value);
    }

    pub(crate) fn finish(self) -> Generation {
        tracing::debug!(
            cell = self.cell,
            elements = self.generation.elements.len(),
            issues = self.generation.issues.len(),
            "generated"
        );
        self.generation
    }
}
