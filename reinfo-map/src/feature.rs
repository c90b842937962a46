//! Features returned by rendered feature queries.

use reinfo_map_types::{GeoPoint2d, Properties};
use serde::{Deserialize, Serialize};

/// Geometry of a rendered feature as far as the viewer cares about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureGeometry {
    /// Point geometry with its geographic position.
    Point(GeoPoint2d),
    /// Lines, polygons and collections. Their coordinates are never read by the viewer.
    Other,
}

/// Snapshot of a feature the engine rendered, valid for the interaction that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedFeature {
    layer_id: String,
    properties: Properties,
    geometry: FeatureGeometry,
}

impl RenderedFeature {
    /// Creates a feature of the given layer.
    pub fn new(
        layer_id: impl Into<String>,
        properties: Properties,
        geometry: FeatureGeometry,
    ) -> Self {
        Self {
            layer_id: layer_id.into(),
            properties,
            geometry,
        }
    }

    /// Creates a point feature.
    pub fn point(
        layer_id: impl Into<String>,
        properties: Properties,
        position: GeoPoint2d,
    ) -> Self {
        Self::new(layer_id, properties, FeatureGeometry::Point(position))
    }

    /// Id of the style layer the feature was rendered by.
    pub fn layer_id(&self) -> &str {
        &self.layer_id
    }

    /// Attributes of the feature in source order.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Geometry of the feature.
    pub fn geometry(&self) -> &FeatureGeometry {
        &self.geometry
    }
}
