//! Load-time configuration of a viewer.

use crate::camera::{CameraOptions, MAX_PITCH_LIMIT};
use crate::controls::{Attribution, ControlPosition, MapControl, ScaleUnit};
use crate::error::ViewerError;
use crate::geocoder::GeocoderConfig;
use crate::layer_switch::{parse_layer_declaration, LayerToggle};
use crate::popup::{PopupOptions, TableLabels};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Switch input declared in the page, with its comma separated layer list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleConfig {
    /// Id of the input element.
    pub element_id: String,
    /// Comma separated ids of the layers the input shows and hides.
    pub layers: String,
    /// Initial state of the input.
    #[serde(default = "default_checked")]
    pub checked: bool,
}

fn default_checked() -> bool {
    true
}

impl ToggleConfig {
    /// Parses the layer list. Fails if it names no layer.
    pub fn to_toggle(&self) -> Result<LayerToggle, ViewerError> {
        LayerToggle::new(self.element_id.clone(), &self.layers, self.checked)
    }
}

/// Everything a viewer needs to know before the map loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Reference to the style document, usually a path or URL.
    pub style: String,
    /// Initial camera and its limits.
    pub camera: CameraOptions,
    /// Keep the camera in the URL hash.
    pub hash: bool,
    /// Draw tile outlines over the map.
    pub show_tile_boundaries: bool,
    /// Layers that show a feature popup when clicked.
    pub popup_layers: Vec<String>,
    /// Layer switches of the page.
    pub toggles: Vec<ToggleConfig>,
    /// Controls placed over the map, in the order they are added.
    pub controls: Vec<MapControl>,
    /// Presentation of feature popups.
    pub popup: PopupOptions,
    /// Header labels of the popup attribute tables.
    pub table_labels: TableLabels,
    /// Address search service of the search box, if any.
    pub geocoder: Option<GeocoderConfig>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            style: String::new(),
            camera: CameraOptions::default(),
            hash: true,
            show_tile_boundaries: false,
            popup_layers: vec![],
            toggles: vec![],
            controls: vec![],
            popup: PopupOptions::default(),
            table_labels: TableLabels::default(),
            geocoder: None,
        }
    }
}

/// Layers of the real estate information library tiles.
pub const REINFOLIB_LAYER_IDS: [&str; 16] = [
    "XPT001",
    "XPT002",
    "XKT001",
    "XKT002",
    "XKT003",
    "XKT003-line",
    "XKT004",
    "XKT004-line",
    "XKT005",
    "XKT005-line",
    "XKT006",
    "XKT007",
    "XKT010",
    "XKT011",
    "XKT013",
    "XKT014",
];

impl ViewerConfig {
    /// Reads the configuration from a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ViewerError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads the configuration from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ViewerError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Viewer over the real estate information library tiles, centered on Tokorozawa.
    pub fn reinfolib() -> Self {
        let toggles = REINFOLIB_LAYER_IDS
            .iter()
            .filter(|id| !id.ends_with("-line"))
            .map(|id| {
                let layers = if REINFOLIB_LAYER_IDS.contains(&format!("{id}-line").as_str()) {
                    format!("{id},{id}-line")
                } else {
                    id.to_string()
                };

                ToggleConfig {
                    element_id: id.to_lowercase(),
                    layers,
                    checked: true,
                }
            })
            .collect();

        Self {
            style: "mono.json".to_string(),
            camera: CameraOptions {
                center: [139.47507, 35.90596],
                zoom: 12.0,
                min_zoom: 11.0,
                max_pitch: MAX_PITCH_LIMIT,
                ..Default::default()
            },
            hash: true,
            show_tile_boundaries: false,
            popup_layers: REINFOLIB_LAYER_IDS.iter().map(|id| id.to_string()).collect(),
            toggles,
            controls: vec![
                MapControl::Geocoder {
                    position: Some(ControlPosition::TopRight),
                },
                MapControl::Navigation { position: None },
                MapControl::Fullscreen { position: None },
                MapControl::Geolocate {
                    position: None,
                    high_accuracy: false,
                    fit_bounds_max_zoom: 18.0,
                    track_user_location: true,
                    show_user_location: true,
                },
                MapControl::Scale {
                    position: None,
                    max_width: 200,
                    unit: ScaleUnit::Metric,
                },
                MapControl::Attribution {
                    position: None,
                    compact: true,
                    custom: vec![
                        Attribution::new(
                            "X(旧Twitter)",
                            Some("https://twitter.com/shi__works".to_string()),
                        ),
                        Attribution::new(
                            "GitHub",
                            Some(
                                "https://github.com/shiwaku/mlit-reinfolib-map-on-maplibre"
                                    .to_string(),
                            ),
                        ),
                    ],
                },
            ],
            popup: PopupOptions::default(),
            table_labels: TableLabels::default(),
            geocoder: Some(GeocoderConfig::default()),
        }
    }

    /// Checks the configuration for values the map cannot start with.
    pub fn validate(&self) -> Result<(), ViewerError> {
        let camera = &self.camera;
        if !camera.center().is_valid() {
            return Err(ViewerError::Config(format!(
                "center {:?} is not a valid [lon, lat] position",
                camera.center
            )));
        }
        if camera.min_zoom.is_nan() || camera.max_zoom.is_nan() || camera.min_zoom > camera.max_zoom
        {
            return Err(ViewerError::Config(format!(
                "min zoom {} is greater than max zoom {}",
                camera.min_zoom, camera.max_zoom
            )));
        }
        if !(0.0..=MAX_PITCH_LIMIT).contains(&camera.max_pitch) {
            return Err(ViewerError::Config(format!(
                "max pitch {} is outside of [0, {MAX_PITCH_LIMIT}]",
                camera.max_pitch
            )));
        }
        if !(0.0..=camera.max_pitch).contains(&camera.pitch) {
            return Err(ViewerError::Config(format!(
                "pitch {} is outside of [0, {}]",
                camera.pitch, camera.max_pitch
            )));
        }

        for toggle in &self.toggles {
            if parse_layer_declaration(&toggle.layers).is_empty() {
                return Err(ViewerError::EmptyLayerDeclaration(toggle.layers.clone()));
            }
        }

        if let Some(id) = self.popup_layers.iter().find(|id| id.trim().is_empty()) {
            return Err(ViewerError::Config(format!("popup layer id '{id}' is empty")));
        }

        Ok(())
    }

    /// Layer switches parsed from [`ViewerConfig::toggles`].
    pub fn layer_toggles(&self) -> Result<Vec<LayerToggle>, ViewerError> {
        self.toggles.iter().map(ToggleConfig::to_toggle).collect()
    }
}
