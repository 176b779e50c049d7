//! Technology parameter tables.
//!
//! A process kit ships its design rules and layer map as one JSON resource:
//!
//! ```json
//! {
//!     "Parameters": { "grid": 0.005, "epsilon": 0.001, "dbu": 1000, "Cnt_a": 0.16 },
//!     "Layers": [
//!         { "name": "Cont", "purpose": "drawing", "layer": 6, "datatype": 0 }
//!     ]
//! }
//! ```
//!
//! The resource is loaded once into a [`TechParameterTable`], which is
//! immutable afterwards and meant to be shared behind an [`Arc`](std::sync::Arc).

pub mod error;
pub mod layers;

#[cfg(test)]
mod tests;

use std::fmt::Display;
use std::path::Path;

use arcstr::ArcStr;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use crate::error::{Result, TechError};
pub use crate::layers::LayerTable;
use crate::layers::LayerEntry;

/// The manufacturing grid, in microns.
pub const GRID: &str = "grid";
/// Tolerance absorbed when snapping to the grid, in grid steps.
pub const EPSILON: &str = "epsilon";
/// Database units per micron.
pub const DBU: &str = "dbu";

/// A single rule value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TechValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(ArcStr),
}

impl TechValue {
    /// A short name for the value's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }
}

impl Display for TechValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Deserialize)]
struct TechResource {
    #[serde(rename = "Parameters")]
    parameters: IndexMap<ArcStr, TechValue>,
    #[serde(rename = "Layers", default)]
    layers: Vec<LayerEntry>,
}

/// An immutable mapping from rule names to values, plus the layer table.
#[derive(Debug, Clone, PartialEq)]
pub struct TechParameterTable {
    rules: IndexMap<ArcStr, TechValue>,
    layers: LayerTable,
    grid: f64,
    epsilon: f64,
    dbu: i64,
}

impl TechParameterTable {
    /// Parses a technology resource.
    ///
    /// Fails if `grid`, `epsilon` or `dbu` is missing or out of range.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let resource: TechResource = serde_json::from_str(json)?;
        let layers = LayerTable::from_entries(resource.layers)?;
        let mut table = Self {
            rules: resource.parameters,
            layers,
            grid: 0.,
            epsilon: 0.,
            dbu: 0,
        };

        table.grid = table.get_f64(GRID)?;
        if table.grid.is_nan() || table.grid <= 0. {
            return Err(TechError::invalid(GRID, "grid must be positive"));
        }
        table.epsilon = table.get_f64(EPSILON)?;
        if table.epsilon.is_nan() || table.epsilon < 0. {
            return Err(TechError::invalid(EPSILON, "epsilon must not be negative"));
        }
        table.dbu = table.get_i64(DBU)?;
        if table.dbu <= 0 {
            return Err(TechError::invalid(DBU, "dbu must be a positive integer"));
        }

        tracing::debug!(
            rules = table.rules.len(),
            layers = table.layers.len(),
            grid = table.grid,
            dbu = table.dbu,
            "loaded technology table"
        );
        Ok(table)
    }

    /// Reads and parses the technology resource at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "reading technology resource");
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Gets the value of a rule.
    pub fn get(&self, rule: &str) -> Result<&TechValue> {
        self.rules
            .get(rule)
            .ok_or_else(|| TechError::UnknownRule(rule.into()))
    }

    /// Returns `true` if the table defines `rule`.
    pub fn contains(&self, rule: &str) -> bool {
        self.rules.contains_key(rule)
    }

    /// Gets a numeric rule as a float. Integer rules are widened.
    pub fn get_f64(&self, rule: &str) -> Result<f64> {
        match self.get(rule)? {
            TechValue::Float(v) => Ok(*v),
            TechValue::Int(v) => Ok(*v as f64),
            other => Err(wrong_type(rule, "float", other)),
        }
    }

    /// Gets an integer rule.
    pub fn get_i64(&self, rule: &str) -> Result<i64> {
        match self.get(rule)? {
            TechValue::Int(v) => Ok(*v),
            other => Err(wrong_type(rule, "int", other)),
        }
    }

    /// Gets a text rule.
    pub fn get_str(&self, rule: &str) -> Result<&ArcStr> {
        match self.get(rule)? {
            TechValue::Text(v) => Ok(v),
            other => Err(wrong_type(rule, "text", other)),
        }
    }

    /// Gets a boolean rule.
    pub fn get_bool(&self, rule: &str) -> Result<bool> {
        match self.get(rule)? {
            TechValue::Bool(v) => Ok(*v),
            other => Err(wrong_type(rule, "bool", other)),
        }
    }

    /// The manufacturing grid, in microns.
    #[inline]
    pub fn grid(&self) -> f64 {
        self.grid
    }

    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Database units per micron.
    #[inline]
    pub fn dbu(&self) -> i64 {
        self.dbu
    }

    #[inline]
    pub fn layers(&self) -> &LayerTable {
        &self.layers
    }

    /// Iterates over all rules in file order.
    pub fn rules(&self) -> impl Iterator<Item = (&ArcStr, &TechValue)> {
        self.rules.iter()
    }
}

fn wrong_type(rule: &str, expected: &'static str, found: &TechValue) -> TechError {
    TechError::WrongType {
        rule: rule.into(),
        expected,
        found: found.type_name(),
    }
}
