//! Error types and error handling utilities.

use std::sync::Arc;

use arcstr::ArcStr;
use techparams::TechError;

use crate::quantity::ParseQuantityError;

/// A result type returning PCell errors.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error type for PCell generation.
#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    /// A technology rule or layer is missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(#[from] TechError),
    /// A device parameter could not be parsed as a physical quantity.
    #[error(transparent)]
    Quantity(#[from] ParseQuantityError),
    /// No device geometry realizes the requested electrical value.
    #[error("cannot solve for {target}: {reason}")]
    Unsolvable { target: &'static str, reason: ArcStr },
    /// Generation was requested before any parameters were set.
    #[error("no parameters have been set for this {0} instance")]
    MissingParameters(&'static str),
    /// Generator options could not be parsed.
    #[error("invalid generator options: {0}")]
    Options(#[from] Arc<toml::de::Error>),
    /// An I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] Arc<std::io::Error>),
}

impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        Self::Options(Arc::new(value))
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(Arc::new(value))
    }
}
