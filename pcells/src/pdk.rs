//! The process kit: a technology table, its rule set and a generation cache.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use techparams::{LayerTable, TechParameterTable};

use crate::cache::{CacheStats, GenerationCache};
use crate::devices::{self, Generation};
use crate::error::Result;
use crate::options::GeneratorOptions;
use crate::params::DeviceParameters;
use crate::rules::DeviceRuleSet;

/// A loaded process kit.
///
/// `Pdk` is `Send + Sync`. Generation itself takes no lock; only cache
/// lookups and insertions do.
#[derive(Debug)]
pub struct Pdk {
    table: Arc<TechParameterTable>,
    rules: DeviceRuleSet,
    options: GeneratorOptions,
    cache: Mutex<GenerationCache<DeviceParameters, Arc<Generation>>>,
}

impl Pdk {
    pub fn new(table: Arc<TechParameterTable>) -> Result<Self> {
        Self::with_options(table, GeneratorOptions::default())
    }

    pub fn with_options(table: Arc<TechParameterTable>, options: GeneratorOptions) -> Result<Self> {
        let mut rules = DeviceRuleSet::from_table(&table)?;
        if let Some(font) = &options.label_font {
            rules = rules.with_label_font(font.clone());
        }
        Ok(Self {
            table,
            rules,
            cache: Mutex::new(GenerationCache::new(options.cache_capacity)),
            options,
        })
    }

    /// Parses a technology resource and builds a kit with default options.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::new(Arc::new(TechParameterTable::from_json_str(json)?))
    }

    /// Loads the technology resource at `path`.
    pub fn load(path: impl AsRef<Path>, options: GeneratorOptions) -> Result<Self> {
        Self::with_options(Arc::new(TechParameterTable::load(path)?), options)
    }

    #[inline]
    pub fn table(&self) -> &Arc<TechParameterTable> {
        &self.table
    }

    #[inline]
    pub fn layers(&self) -> &LayerTable {
        self.table.layers()
    }

    #[inline]
    pub fn rules(&self) -> &DeviceRuleSet {
        &self.rules
    }

    #[inline]
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Generates a device, reusing a cached result for identical parameters.
    ///
    /// Failed generations are not cached.
    pub fn generate(&self, params: &DeviceParameters) -> Result<Arc<Generation>> {
        if let Some(hit) = self.lock_cache().get(params) {
            tracing::debug!(cell = params.cell_name(), "generation cache hit");
            return Ok(hit.clone());
        }
        tracing::debug!(cell = params.cell_name(), "generation cache miss");
        let generation = Arc::new(devices::generate(&self.rules, params)?);
        self.lock_cache()
            .insert(params.clone(), Arc::clone(&generation));
        Ok(generation)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.lock_cache().stats()
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    fn lock_cache(
        &self,
    ) -> std::sync::MutexGuard<'_, GenerationCache<DeviceParameters, Arc<Generation>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
