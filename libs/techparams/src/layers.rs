//! The technology layer table.

use arcstr::ArcStr;
use indexmap::IndexMap;
use layir::{GdsLayer, Layer, LayerKey, LayerPurpose};
use serde::Deserialize;

use crate::error::{Result, TechError};

/// One entry of the `"Layers"` array.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LayerEntry {
    name: ArcStr,
    purpose: ArcStr,
    layer: u16,
    datatype: u16,
    /// Rendering attributes (colors, fill patterns and so on).
    #[serde(flatten)]
    attributes: IndexMap<ArcStr, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
struct LayerInfo {
    layer: Layer,
    attributes: IndexMap<ArcStr, serde_json::Value>,
}

/// The logical layers of a technology, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerTable {
    layers: IndexMap<LayerKey, LayerInfo>,
}

impl LayerTable {
    pub(crate) fn from_entries(entries: Vec<LayerEntry>) -> Result<Self> {
        let mut layers = IndexMap::with_capacity(entries.len());
        for entry in entries {
            let Some(purpose) = LayerPurpose::from_name(&entry.purpose) else {
                tracing::debug!(
                    name = %entry.name,
                    purpose = %entry.purpose,
                    "skipping layer with unsupported purpose"
                );
                continue;
            };
            let layer = Layer::new(
                entry.name,
                purpose,
                GdsLayer(entry.layer, entry.datatype),
            );
            let key = layer.key().clone();
            if layers.contains_key(&key) {
                return Err(TechError::DuplicateLayer(key));
            }
            layers.insert(
                key,
                LayerInfo {
                    layer,
                    attributes: entry.attributes,
                },
            );
        }
        Ok(Self { layers })
    }

    /// Gets the layer with the given name and purpose.
    pub fn get(&self, name: &str, purpose: LayerPurpose) -> Result<&Layer> {
        self.try_get(name, purpose)
            .ok_or_else(|| TechError::UnknownLayer {
                name: name.into(),
                purpose,
            })
    }

    pub fn try_get(&self, name: &str, purpose: LayerPurpose) -> Option<&Layer> {
        self.layers
            .get(&LayerKey::new(name, purpose))
            .map(|info| &info.layer)
    }

    /// Gets the drawing layer with the given name.
    pub fn drawing(&self, name: &str) -> Result<&Layer> {
        self.get(name, LayerPurpose::Drawing)
    }

    /// Gets the pin layer with the given name.
    pub fn pin(&self, name: &str) -> Result<&Layer> {
        self.get(name, LayerPurpose::Pin)
    }

    /// Iterates over all logical layers written to the given GDS pair.
    pub fn by_gds(&self, gds: GdsLayer) -> impl Iterator<Item = &Layer> {
        self.layers
            .values()
            .map(|info| &info.layer)
            .filter(move |layer| layer.gds() == gds)
    }

    /// The companion layer on which text for `layer` is drawn, if the technology defines one.
    pub fn label_layer_for(&self, layer: &Layer) -> Option<&Layer> {
        self.try_get(layer.name(), LayerPurpose::Label)
    }

    /// Rendering attributes retained from the technology file.
    pub fn attributes(&self, key: &LayerKey) -> Option<&IndexMap<ArcStr, serde_json::Value>> {
        self.layers.get(key).map(|info| &info.attributes)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.values().map(|info| &info.layer)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
