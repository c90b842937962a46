//! See [`StyleDocument`].

use crate::engine::Visibility;
use crate::error::ViewerError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The parts of a map style document the viewer reads.
///
/// Sources, paint properties and everything else the renderer needs are kept opaque: the
/// viewer only needs to know which layers exist and whether they start visible.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StyleDocument {
    /// Style specification version.
    #[serde(default)]
    pub version: u32,
    /// Human readable name of the style.
    #[serde(default)]
    pub name: Option<String>,
    /// Data sources, kept as raw JSON.
    #[serde(default)]
    pub sources: serde_json::Map<String, serde_json::Value>,
    /// Layers in render order.
    #[serde(default)]
    pub layers: Vec<StyleLayer>,
}

/// A layer entry of the style.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleLayer {
    /// Unique id of the layer.
    pub id: String,
    /// Rendering type, e.g. `fill`, `line` or `circle`.
    #[serde(rename = "type")]
    pub layer_type: String,
    /// Id of the source the layer draws.
    #[serde(default)]
    pub source: Option<String>,
    /// Layer of a vector tile source.
    #[serde(default, rename = "source-layer")]
    pub source_layer: Option<String>,
    /// Layout properties.
    #[serde(default)]
    pub layout: StyleLayout,
}

/// Layout properties of a layer. Only visibility is interpreted.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StyleLayout {
    /// `"visible"` or `"none"`.
    #[serde(default)]
    pub visibility: Option<Visibility>,
}

impl StyleLayer {
    /// Visibility the layer starts with. Layers without the property are visible.
    pub fn visibility(&self) -> Visibility {
        self.layout.visibility.unwrap_or_default()
    }
}

impl StyleDocument {
    /// Parses a style document.
    pub fn from_json_str(json: &str) -> Result<Self, ViewerError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a style document from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ViewerError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Ids of all layers in render order.
    pub fn layer_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.layers.iter().map(|layer| layer.id.as_str())
    }

    /// Layer with the given id.
    pub fn layer(&self, id: &str) -> Option<&StyleLayer> {
        self.layers.iter().find(|layer| layer.id == id)
    }
}
