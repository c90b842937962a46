//! UI controls placed over the map.
//!
//! Controls are implemented by the host map widget. The viewer only keeps their
//! configuration and the order they were added in.

use crate::error::ViewerError;
use serde::{Deserialize, Serialize};
use v_htmlescape::escape;

/// Represents an attribution, typically used for citing sources or providing credit.
///
/// This struct stores a text description along with an optional URL where more information
/// or the source can be found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    text: String,
    #[serde(default)]
    url: Option<String>,
}

impl Attribution {
    /// Creates a new `Attribution` with the given text and optional URL.
    pub fn new(text: impl Into<String>, url: Option<String>) -> Self {
        Self {
            text: text.into(),
            url,
        }
    }

    /// Returns the text of the attribution.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the URL of the attribution, if any.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Link opening in a new tab, or plain text if there is no URL.
    pub fn to_html(&self) -> String {
        match &self.url {
            Some(url) => format!(
                "<a href=\"{}\" target=\"_blank\">{}</a>",
                escape(url),
                escape(&self.text)
            ),
            None => escape(&self.text).to_string(),
        }
    }
}

/// Corner of the map a control is placed in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlPosition {
    /// Top left corner.
    TopLeft,
    /// Top right corner.
    TopRight,
    /// Bottom left corner.
    BottomLeft,
    /// Bottom right corner.
    BottomRight,
}

/// Unit of the scale bar.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleUnit {
    /// Meters and kilometers.
    #[default]
    Metric,
    /// Feet and miles.
    Imperial,
    /// Nautical miles.
    Nautical,
}

/// Kind of a control, without its options.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// See [`MapControl::Navigation`].
    Navigation,
    /// See [`MapControl::Fullscreen`].
    Fullscreen,
    /// See [`MapControl::Geolocate`].
    Geolocate,
    /// See [`MapControl::Scale`].
    Scale,
    /// See [`MapControl::Attribution`].
    Attribution,
    /// See [`MapControl::Geocoder`].
    Geocoder,
}

fn default_true() -> bool {
    true
}

fn default_fit_bounds_max_zoom() -> f64 {
    18.0
}

fn default_scale_width() -> u32 {
    200
}

/// A control with its options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapControl {
    /// Zoom buttons and compass.
    Navigation {
        /// Corner of the control, top right by default.
        #[serde(default)]
        position: Option<ControlPosition>,
    },
    /// Button that puts the map into fullscreen mode.
    Fullscreen {
        /// Corner of the control, top right by default.
        #[serde(default)]
        position: Option<ControlPosition>,
    },
    /// Shows and optionally tracks the user location.
    Geolocate {
        /// Corner of the control, top right by default.
        #[serde(default)]
        position: Option<ControlPosition>,
        /// Ask the device for its most precise position.
        #[serde(default)]
        high_accuracy: bool,
        /// Highest zoom level used when the map moves to the user location.
        #[serde(default = "default_fit_bounds_max_zoom")]
        fit_bounds_max_zoom: f64,
        /// Keep following the user location as it changes.
        #[serde(default = "default_true")]
        track_user_location: bool,
        /// Draw a marker at the user location.
        #[serde(default = "default_true")]
        show_user_location: bool,
    },
    /// Scale bar.
    Scale {
        /// Corner of the control, bottom left by default.
        #[serde(default)]
        position: Option<ControlPosition>,
        /// Width of the bar in pixels.
        #[serde(default = "default_scale_width")]
        max_width: u32,
        /// Distance unit.
        #[serde(default)]
        unit: ScaleUnit,
    },
    /// Data sources and credits.
    Attribution {
        /// Corner of the control, bottom right by default.
        #[serde(default)]
        position: Option<ControlPosition>,
        /// Collapse the attributions behind a button.
        #[serde(default)]
        compact: bool,
        /// Attributions added to the ones of the style sources.
        #[serde(default)]
        custom: Vec<Attribution>,
    },
    /// Address search box backed by a [`Geocoder`](crate::geocoder::Geocoder).
    Geocoder {
        /// Corner of the control, top right by default.
        #[serde(default)]
        position: Option<ControlPosition>,
    },
}

impl MapControl {
    /// Kind of the control.
    pub fn kind(&self) -> ControlKind {
        match self {
            MapControl::Navigation { .. } => ControlKind::Navigation,
            MapControl::Fullscreen { .. } => ControlKind::Fullscreen,
            MapControl::Geolocate { .. } => ControlKind::Geolocate,
            MapControl::Scale { .. } => ControlKind::Scale,
            MapControl::Attribution { .. } => ControlKind::Attribution,
            MapControl::Geocoder { .. } => ControlKind::Geocoder,
        }
    }

    /// Configured position, or the corner the control goes to by default.
    pub fn position(&self) -> ControlPosition {
        let (explicit, default) = match self {
            MapControl::Navigation { position }
            | MapControl::Fullscreen { position }
            | MapControl::Geolocate { position, .. }
            | MapControl::Geocoder { position } => (position, ControlPosition::TopRight),
            MapControl::Scale { position, .. } => (position, ControlPosition::BottomLeft),
            MapControl::Attribution { position, .. } => (position, ControlPosition::BottomRight),
        };

        explicit.unwrap_or(default)
    }

    /// Custom attribution html of an attribution control, entries separated by ` | `.
    pub fn attribution_html(&self) -> Option<String> {
        match self {
            MapControl::Attribution { custom, .. } if !custom.is_empty() => Some(
                custom
                    .iter()
                    .map(Attribution::to_html)
                    .collect::<Vec<_>>()
                    .join(" | "),
            ),
            _ => None,
        }
    }
}

/// Controls of a viewer in the order they were added. Each kind can be added once.
#[derive(Debug, Default, Clone)]
pub struct ControlSet(Vec<MapControl>);

impl ControlSet {
    /// Adds a control. Fails if a control of the same kind is already present.
    pub fn add(&mut self, control: MapControl) -> Result<(), ViewerError> {
        let kind = control.kind();
        if self.contains(kind) {
            return Err(ViewerError::Config(format!(
                "control {kind:?} is added more than once"
            )));
        }

        self.0.push(control);
        Ok(())
    }

    /// Returns `true` if a control of the kind was added.
    pub fn contains(&self, kind: ControlKind) -> bool {
        self.0.iter().any(|control| control.kind() == kind)
    }

    /// Control of the kind, if added.
    pub fn get(&self, kind: ControlKind) -> Option<&MapControl> {
        self.0.iter().find(|control| control.kind() == kind)
    }

    /// Iterates over the controls in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &MapControl> + '_ {
        self.0.iter()
    }

    /// Number of controls.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no control was added.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<MapControl>> for ControlSet {
    type Error = ViewerError;

    fn try_from(controls: Vec<MapControl>) -> Result<Self, Self::Error> {
        let mut set = ControlSet::default();
        for control in controls {
            set.add(control)?;
        }

        Ok(set)
    }
}
