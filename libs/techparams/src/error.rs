//! Technology table errors.

use std::sync::Arc;

use arcstr::ArcStr;
use layir::{LayerKey, LayerPurpose};

/// A result type returning technology table errors.
pub type Result<T, E = TechError> = std::result::Result<T, E>;

/// An error looking up or loading technology data.
#[derive(thiserror::Error, Debug, Clone)]
pub enum TechError {
    /// The rule is not defined by the technology.
    #[error("unknown rule `{0}`")]
    UnknownRule(ArcStr),
    /// The rule exists but holds a value of a different type.
    #[error("rule `{rule}` has type {found}, expected {expected}")]
    WrongType {
        rule: ArcStr,
        expected: &'static str,
        found: &'static str,
    },
    /// The layer is not defined by the technology.
    #[error("unknown layer `{name}` with purpose `{purpose}`")]
    UnknownLayer { name: ArcStr, purpose: LayerPurpose },
    /// The same layer appears twice in the layer table.
    #[error("layer `{0}` is defined more than once")]
    DuplicateLayer(LayerKey),
    /// The rule holds a value outside its allowed range.
    #[error("invalid value for rule `{rule}`: {reason}")]
    Invalid { rule: ArcStr, reason: ArcStr },
    /// The technology resource is not valid JSON of the expected shape.
    #[error("error parsing technology resource: {0}")]
    Parse(#[from] Arc<serde_json::Error>),
    /// An I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] Arc<std::io::Error>),
}

impl From<std::io::Error> for TechError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(Arc::new(value))
    }
}

impl From<serde_json::Error> for TechError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(Arc::new(value))
    }
}

impl TechError {
    pub(crate) fn invalid(rule: impl Into<ArcStr>, reason: impl Into<ArcStr>) -> Self {
        Self::Invalid {
            rule: rule.into(),
            reason: reason.into(),
        }
    }
}
