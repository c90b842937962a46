//! See [`LayerCollection`].

use crate::engine::{MapEngine, Visibility};
use crate::error::ViewerError;
use crate::feature::RenderedFeature;
use crate::style::StyleDocument;
use reinfo_map_types::{ScreenPoint, ScreenRect};

/// In-memory map engine: an ordered collection of style layers with their visibility and
/// the features they currently render.
///
/// Hit-testing is done against screen footprints given to each feature when it is inserted.
/// A feature without a footprint is hit anywhere on the canvas. Any layer can be hidden with
/// [`LayerCollection::hide`]; hidden layers keep their place and features but are never
/// returned by queries.
///
/// ```
/// use reinfo_map::engine::{LayerCollection, MapEngine};
/// use reinfo_map::feature::RenderedFeature;
/// use reinfo_map_types::{latlon, Properties, ScreenPoint, ScreenRect};
///
/// let mut collection = LayerCollection::default();
/// collection.push("XPT001");
/// collection.set_style_loaded(true);
/// collection
///     .insert_feature(
///         RenderedFeature::point("XPT001", Properties::new(), latlon!(35.9, 139.47)),
///         Some(ScreenRect::around(ScreenPoint::new(100.0, 100.0), 8.0)),
///     )
///     .unwrap();
///
/// let hits = collection
///     .query_rendered_features(ScreenPoint::new(102.0, 97.0), &["XPT001"])
///     .unwrap();
/// assert_eq!(hits.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct LayerCollection {
    layers: Vec<LayerEntry>,
    style_loaded: bool,
}

#[derive(Debug)]
struct LayerEntry {
    id: String,
    is_hidden: bool,
    features: Vec<PlacedFeature>,
}

/// Feature together with the screen area it covers.
#[derive(Debug, Clone)]
pub struct PlacedFeature {
    /// The feature returned by queries.
    pub feature: RenderedFeature,
    /// Area the feature is hit in. `None` covers the whole canvas.
    pub footprint: Option<ScreenRect>,
}

impl PlacedFeature {
    fn is_hit(&self, point: &ScreenPoint) -> bool {
        self.footprint
            .as_ref()
            .is_none_or(|footprint| footprint.contains(point))
    }
}

impl LayerCollection {
    /// Creates a collection with one empty layer per style layer, hidden if the style says
    /// so. The style counts as loaded.
    pub fn from_style(style: &StyleDocument) -> Self {
        let layers = style
            .layers
            .iter()
            .map(|layer| LayerEntry {
                id: layer.id.clone(),
                is_hidden: !layer.visibility().is_visible(),
                features: vec![],
            })
            .collect();

        Self {
            layers,
            style_loaded: true,
        }
    }

    /// Adds an empty visible layer to the end of the collection. Does nothing if a layer with
    /// the same id is already present.
    pub fn push(&mut self, id: impl Into<String>) {
        let id = id.into();
        if self.position(&id).is_some() {
            return;
        }

        self.layers.push(LayerEntry {
            id,
            is_hidden: false,
            features: vec![],
        });
    }

    /// Adds a feature to the layer it names in [`RenderedFeature::layer_id`].
    pub fn insert_feature(
        &mut self,
        feature: RenderedFeature,
        footprint: Option<ScreenRect>,
    ) -> Result<(), ViewerError> {
        let entry = self.entry_mut(feature.layer_id())?;
        entry.features.push(PlacedFeature { feature, footprint });

        Ok(())
    }

    /// Marks the style as loaded or not. Queries fail until the style is loaded.
    pub fn set_style_loaded(&mut self, loaded: bool) {
        self.style_loaded = loaded;
    }

    /// Returns `true` once the style is marked as loaded.
    pub fn is_style_loaded(&self) -> bool {
        self.style_loaded
    }

    /// Returns the count of layers in the collection.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if the collection contains zero layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Ids of all layers in render order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.layers.iter().map(|entry| entry.id.as_str())
    }

    /// Makes the layer visible.
    pub fn show(&mut self, id: &str) -> Result<(), ViewerError> {
        self.entry_mut(id)?.is_hidden = false;
        Ok(())
    }

    /// Hides the layer. It keeps its place and features in the collection.
    pub fn hide(&mut self, id: &str) -> Result<(), ViewerError> {
        self.entry_mut(id)?.is_hidden = true;
        Ok(())
    }

    /// Returns `true` if the layer exists and is not hidden.
    pub fn is_visible(&self, id: &str) -> bool {
        self.entry(id).is_ok_and(|entry| !entry.is_hidden)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|entry| entry.id == id)
    }

    fn entry(&self, id: &str) -> Result<&LayerEntry, ViewerError> {
        self.layers
            .iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| ViewerError::UnknownLayer(id.to_string()))
    }

    fn entry_mut(&mut self, id: &str) -> Result<&mut LayerEntry, ViewerError> {
        self.layers
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| ViewerError::UnknownLayer(id.to_string()))
    }
}

impl MapEngine for LayerCollection {
    fn query_rendered_features(
        &self,
        point: ScreenPoint,
        layers: &[&str],
    ) -> Result<Vec<RenderedFeature>, ViewerError> {
        if !self.style_loaded {
            return Err(ViewerError::StyleNotLoaded);
        }

        let mut result = vec![];
        for id in layers {
            let entry = self.entry(id)?;
            if entry.is_hidden {
                continue;
            }

            result.extend(
                entry
                    .features
                    .iter()
                    .filter(|placed| placed.is_hit(&point))
                    .map(|placed| placed.feature.clone()),
            );
        }

        Ok(result)
    }

    fn set_layer_visibility(
        &mut self,
        layer_id: &str,
        visibility: Visibility,
    ) -> Result<(), ViewerError> {
        self.entry_mut(layer_id)?.is_hidden = !visibility.is_visible();
        Ok(())
    }

    fn layer_visibility(&self, layer_id: &str) -> Option<Visibility> {
        self.entry(layer_id)
            .ok()
            .map(|entry| Visibility::from(!entry.is_hidden))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use reinfo_map_types::{latlon, Properties};

    fn collection() -> LayerCollection {
        let mut collection = LayerCollection::default();
        collection.push("XKT001");
        collection.push("XKT002");
        collection.set_style_loaded(true);

        collection
    }

    fn feature(layer: &str, name: &str) -> RenderedFeature {
        let properties: Properties = [("name", name)].into_iter().collect();
        RenderedFeature::point(layer, properties, latlon!(35.9, 139.47))
    }

    #[test]
    fn push_ignores_duplicate_ids() {
        let mut collection = collection();
        collection.push("XKT001");

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.ids().collect::<Vec<_>>(), vec!["XKT001", "XKT002"]);
    }

    #[test]
    fn query_fails_until_style_is_loaded() {
        let mut collection = collection();
        collection.set_style_loaded(false);

        assert_matches!(
            collection.query_rendered_features(ScreenPoint::new(0.0, 0.0), &["XKT001"]),
            Err(ViewerError::StyleNotLoaded)
        );
    }

    #[test]
    fn query_of_unknown_layer_fails() {
        let collection = collection();
        assert_matches!(
            collection.query_rendered_features(ScreenPoint::new(0.0, 0.0), &["XKT999"]),
            Err(ViewerError::UnknownLayer(id)) if id == "XKT999"
        );
    }

    #[test]
    fn query_uses_footprints_and_keeps_order() {
        let mut collection = collection();
        collection
            .insert_feature(feature("XKT001", "everywhere"), None)
            .expect("layer exists");
        collection
            .insert_feature(
                feature("XKT001", "near"),
                Some(ScreenRect::around(ScreenPoint::new(10.0, 10.0), 2.0)),
            )
            .expect("layer exists");
        collection
            .insert_feature(
                feature("XKT001", "far"),
                Some(ScreenRect::around(ScreenPoint::new(100.0, 100.0), 2.0)),
            )
            .expect("layer exists");

        let hits = collection
            .query_rendered_features(ScreenPoint::new(11.0, 9.0), &["XKT001"])
            .expect("query succeeds");
        let names: Vec<_> = hits
            .iter()
            .map(|f| f.properties().get("name").map(|v| v.to_string()))
            .collect();

        assert_eq!(
            names,
            vec![Some("everywhere".to_string()), Some("near".to_string())]
        );
    }

    #[test]
    fn hidden_layers_are_not_hit() {
        let mut collection = collection();
        collection
            .insert_feature(feature("XKT002", "a"), None)
            .expect("layer exists");
        collection
            .set_layer_visibility("XKT002", Visibility::None)
            .expect("layer exists");

        let hits = collection
            .query_rendered_features(ScreenPoint::new(0.0, 0.0), &["XKT002"])
            .expect("query succeeds");
        assert!(hits.is_empty());
        assert_eq!(collection.layer_visibility("XKT002"), Some(Visibility::None));
        assert!(!collection.is_visible("XKT002"));

        collection.show("XKT002").expect("layer exists");
        assert!(collection.is_visible("XKT002"));
    }

    #[test]
    fn unknown_layer_visibility_fails() {
        let mut collection = collection();
        assert_matches!(
            collection.set_layer_visibility("nope", Visibility::Visible),
            Err(ViewerError::UnknownLayer(_))
        );
        assert_eq!(collection.layer_visibility("nope"), None);
        assert_matches!(
            collection.insert_feature(feature("nope", "a"), None),
            Err(ViewerError::UnknownLayer(_))
        );
    }
}
