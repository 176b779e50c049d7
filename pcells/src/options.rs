//! Generator options.
//!
//! ```toml
//! cache_capacity = 128
//!
//! [label_font]
//! family = "Arial"
//! size = 2
//! ```

use std::path::Path;

use layir::Font;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The default number of generated cells kept by a [`Pdk`](crate::Pdk).
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorOptions {
    /// Maximum number of generated cells to keep. Zero disables caching.
    pub cache_capacity: usize,
    /// Overrides the technology's label font.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_font: Option<Font>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            label_font: None,
        }
    }
}

impl GeneratorOptions {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}
