//! Feature inspection popups.
//!
//! A click on the map is hit-tested by the engine for one style layer at a time. Every
//! feature found becomes one attribute table of a [`PopupReport`], titled with the layer id
//! and the 1-based position of the feature in the query result. The report is anchored at the
//! geographic position of the click, not at any feature geometry, so stacked features share
//! one popup.

use crate::control::{ClickEvent, EventProcessor, Subscription};
use crate::engine::{MapEngine, PopupDisplay, SharedDisplay, SharedEngine};
use crate::error::ViewerError;
use crate::feature::RenderedFeature;
use reinfo_map_types::{GeoPoint2d, ScreenPoint};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use v_htmlescape::escape;

/// Attribute table of one feature.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupSection {
    /// `"{layer_id} #{index}"`.
    pub title: String,
    /// Layer the feature was rendered by.
    pub layer_id: String,
    /// 1-based position of the feature in the query result.
    pub index: usize,
    /// `(key, value)` pairs in the feature's property order.
    pub rows: Vec<(String, String)>,
}

impl PopupSection {
    fn new(layer_id: &str, index: usize, feature: &RenderedFeature) -> Self {
        Self {
            title: format!("{layer_id} #{index}"),
            layer_id: layer_id.to_string(),
            index,
            rows: feature
                .properties()
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        }
    }
}

/// Content of a popup: one section per feature found at a click.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupReport {
    /// Geographic position of the click the popup is shown at.
    pub anchor: GeoPoint2d,
    /// One section per feature, in query result order.
    pub sections: Vec<PopupSection>,
}

/// Header labels of the attribute tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLabels {
    /// Header of the key column.
    pub attribute: String,
    /// Header of the value column.
    pub value: String,
}

impl Default for TableLabels {
    fn default() -> Self {
        Self {
            attribute: "属性".to_string(),
            value: "値".to_string(),
        }
    }
}

/// Presentation options handed to the popup display together with the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupOptions {
    /// CSS max width of the popup.
    pub max_width: String,
    /// CSS class of the attribute tables.
    pub class_name: String,
}

impl Default for PopupOptions {
    fn default() -> Self {
        Self {
            max_width: "300px".to_string(),
            class_name: "popup-table".to_string(),
        }
    }
}

/// Popup ready to be shown by a [`PopupDisplay`].
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    /// Content of the popup.
    pub report: PopupReport,
    /// Presentation options.
    pub options: PopupOptions,
    /// The report rendered as HTML tables.
    pub html: String,
}

impl PopupReport {
    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns `true` if the report has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Renders one HTML table per section.
    pub fn to_html(&self, labels: &TableLabels, class_name: &str) -> String {
        let mut html = String::new();
        for section in &self.sections {
            html.push_str(&format!(
                "<table class=\"{}\"><caption>{}</caption><tr><th>{}</th><th>{}</th></tr>",
                escape(class_name),
                escape(&section.title),
                escape(&labels.attribute),
                escape(&labels.value),
            ));
            for (key, value) in &section.rows {
                html.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td></tr>",
                    escape(key),
                    escape(value)
                ));
            }
            html.push_str("</table>");
        }

        html
    }
}

impl Display for PopupReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for section in &self.sections {
            writeln!(f, "{}", section.title)?;
            for (key, value) in &section.rows {
                writeln!(f, "  {key}: {value}")?;
            }
        }

        Ok(())
    }
}

/// Builds the popup report for a click on `layer_id`.
///
/// Returns `None` when nothing of the layer is rendered at the click, and when the query
/// fails. A failed query is logged and only affects this click.
pub fn handle_click<F>(
    layer_id: &str,
    click_point: ScreenPoint,
    click_lng_lat: GeoPoint2d,
    query_fn: F,
) -> Option<PopupReport>
where
    F: FnOnce(ScreenPoint, &[&str]) -> Result<Vec<RenderedFeature>, ViewerError>,
{
    let features = match query_fn(click_point, &[layer_id]) {
        Ok(features) => features,
        Err(error) => {
            log::error!("Failed to query features of layer '{layer_id}' at {click_point}: {error}");
            return None;
        }
    };

    if features.is_empty() {
        log::debug!("No features of layer '{layer_id}' at {click_point}");
        return None;
    }

    let sections = features
        .iter()
        .enumerate()
        .map(|(i, feature)| PopupSection::new(layer_id, i + 1, feature))
        .collect();

    Some(PopupReport {
        anchor: click_lng_lat,
        sections,
    })
}

/// Shows feature popups for clicks on a set of layers.
pub struct FeaturePopupBuilder<E, D> {
    engine: SharedEngine<E>,
    display: SharedDisplay<D>,
    options: PopupOptions,
    labels: TableLabels,
}

impl<E, D> Clone for FeaturePopupBuilder<E, D> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            display: self.display.clone(),
            options: self.options.clone(),
            labels: self.labels.clone(),
        }
    }
}

impl<E, D> FeaturePopupBuilder<E, D>
where
    E: MapEngine + Send + Sync + 'static,
    D: PopupDisplay + Send + 'static,
{
    /// Creates a builder with default options and labels.
    pub fn new(engine: SharedEngine<E>, display: SharedDisplay<D>) -> Self {
        Self {
            engine,
            display,
            options: PopupOptions::default(),
            labels: TableLabels::default(),
        }
    }

    /// Sets the presentation options of the popups.
    pub fn with_options(self, options: PopupOptions) -> Self {
        Self { options, ..self }
    }

    /// Sets the header labels of the attribute tables.
    pub fn with_labels(self, labels: TableLabels) -> Self {
        Self { labels, ..self }
    }

    /// Builds the report for the click and hands it to the display. Returns `true` if a popup
    /// was shown.
    pub fn handle_click(&self, layer_id: &str, click: &ClickEvent) -> bool {
        let report = {
            let engine = self.engine.read();
            handle_click(layer_id, click.screen_point, click.lng_lat, |point, layers| {
                engine.query_rendered_features(point, layers)
            })
        };

        let Some(report) = report else {
            return false;
        };

        let html = report.to_html(&self.labels, &self.options.class_name);
        self.display.lock().show_popup(Popup {
            report,
            options: self.options.clone(),
            html,
        });

        true
    }

    /// Subscribes the builder to clicks on every given layer.
    pub fn register_layers<'a>(
        &self,
        layer_ids: impl IntoIterator<Item = &'a str>,
        events: &EventProcessor,
    ) -> Vec<Subscription> {
        layer_ids
            .into_iter()
            .map(|layer_id| {
                let builder = self.clone();
                events.on_layer_click(layer_id, move |layer_id, click| {
                    builder.handle_click(layer_id, click);
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::UiEvent;
    use crate::engine::LayerCollection;
    use crate::feature::FeatureGeometry;
    use parking_lot::{Mutex, RwLock};
    use reinfo_map_types::{latlon, Properties, PropertyValue, ScreenRect};
    use std::sync::Arc;

    fn feature(layer: &str, pairs: &[(&str, PropertyValue)]) -> RenderedFeature {
        let properties: Properties = pairs.iter().cloned().collect();
        RenderedFeature::new(layer, properties, FeatureGeometry::Other)
    }

    fn click_point() -> ScreenPoint {
        ScreenPoint::new(120.0, 80.0)
    }

    #[test]
    fn empty_hit_test_produces_no_report() {
        let report = handle_click("XKT001", click_point(), latlon!(35.9, 139.4), |_, _| {
            Ok(vec![])
        });
        assert!(report.is_none());
    }

    #[test]
    fn query_receives_click_point_and_layer() {
        let mut seen = None;
        handle_click("XKT002", click_point(), latlon!(35.9, 139.4), |point, layers| {
            seen = Some((point, layers.iter().map(|l| l.to_string()).collect::<Vec<_>>()));
            Ok(vec![])
        });

        assert_eq!(seen, Some((click_point(), vec!["XKT002".to_string()])));
    }

    #[test]
    fn failing_query_is_swallowed() {
        let report = handle_click("XKT001", click_point(), latlon!(35.9, 139.4), |_, _| {
            Err(ViewerError::StyleNotLoaded)
        });
        assert!(report.is_none());
    }

    #[test]
    fn every_feature_gets_a_numbered_section() {
        let features = vec![
            feature(
                "XKT001",
                &[
                    ("用途地域", "第一種低層住居専用地域".into()),
                    ("建ぺい率", PropertyValue::Integer(50)),
                    ("容積率", PropertyValue::Integer(100)),
                ],
            ),
            feature("XKT001", &[("id", PropertyValue::Null)]),
            feature("XKT001", &[]),
        ];

        let report = handle_click("XKT001", click_point(), latlon!(35.9, 139.4), move |_, _| {
            Ok(features)
        })
        .expect("features were found");

        assert_eq!(report.len(), 3);
        let titles: Vec<_> = report.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["XKT001 #1", "XKT001 #2", "XKT001 #3"]);
        assert_eq!(
            report.sections[0].rows,
            vec![
                ("用途地域".to_string(), "第一種低層住居専用地域".to_string()),
                ("建ぺい率".to_string(), "50".to_string()),
                ("容積率".to_string(), "100".to_string()),
            ]
        );
        assert_eq!(
            report.sections[1].rows,
            vec![("id".to_string(), "null".to_string())]
        );
        assert!(report.sections[2].rows.is_empty());
    }

    #[test]
    fn report_is_anchored_at_click_position() {
        let click = latlon!(35.90596, 139.47507);
        let features = vec![
            RenderedFeature::point("XPT001", Properties::new(), latlon!(36.0, 140.0)),
            RenderedFeature::point("XPT001", Properties::new(), latlon!(34.0, 138.0)),
        ];

        let report = handle_click("XPT001", click_point(), click, move |_, _| Ok(features))
            .expect("features were found");
        assert_eq!(report.anchor, click);
    }

    #[test]
    fn html_escapes_keys_and_values() {
        let report = PopupReport {
            anchor: latlon!(0.0, 0.0),
            sections: vec![PopupSection {
                title: "L #1".to_string(),
                layer_id: "L".to_string(),
                index: 1,
                rows: vec![("<b>".to_string(), "a & b".to_string())],
            }],
        };

        assert_eq!(
            report.to_html(&TableLabels::default(), "popup-table"),
            "<table class=\"popup-table\"><caption>L #1</caption>\
             <tr><th>属性</th><th>値</th></tr>\
             <tr><td>&lt;b&gt;</td><td>a &amp; b</td></tr></table>"
        );
        assert_eq!(report.to_string(), "L #1\n  <b>: a & b\n");
    }

    #[test]
    fn html_escapes_quotes_in_values() {
        let report = PopupReport {
            anchor: latlon!(0.0, 0.0),
            sections: vec![PopupSection {
                title: "L #1".to_string(),
                layer_id: "L".to_string(),
                index: 1,
                rows: vec![("name".to_string(), "\"it's\"".to_string())],
            }],
        };

        let html = report.to_html(&TableLabels::default(), "popup-table");
        assert!(html.contains("<td>&quot;it&#x27;s&quot;</td>"));
        assert!(!html.contains("it's"));
    }

    #[test]
    fn builder_shows_popup_and_survives_failures() {
        let mut collection = LayerCollection::default();
        collection.push("XKT001");
        collection
            .insert_feature(
                feature("XKT001", &[("name", "zone".into())]),
                Some(ScreenRect::around(click_point(), 4.0)),
            )
            .expect("layer exists");

        let engine = Arc::new(RwLock::new(collection));
        let display = Arc::new(Mutex::new(Vec::<Popup>::new()));
        let events = EventProcessor::default();
        let builder = FeaturePopupBuilder::new(engine.clone(), display.clone());
        builder.register_layers(["XKT001", "XKT404"], &events);

        let click = UiEvent::click(click_point(), latlon!(35.9, 139.4));

        // Style is not loaded yet: every query fails, nothing is shown.
        events.handle(&click);
        assert!(display.lock().is_empty());

        engine.write().set_style_loaded(true);
        events.handle(&click);
        {
            let popups = display.lock();
            assert_eq!(popups.len(), 1);
            assert_eq!(popups[0].report.sections[0].title, "XKT001 #1");
            assert_eq!(popups[0].options.max_width, "300px");
            assert!(popups[0].html.contains("<td>zone</td>"));
        }

        events.handle(&UiEvent::click(
            ScreenPoint::new(500.0, 500.0),
            latlon!(35.0, 139.0),
        ));
        assert_eq!(display.lock().len(), 1);
    }
}
