//! Boundary between the viewer and the map engine that renders the style.
//!
//! The viewer never renders, fetches tiles or hit-tests geometries itself. Everything it
//! needs from the engine goes through [`MapEngine`], and every popup it produces is handed
//! to a [`PopupDisplay`]. [`LayerCollection`] is an in-memory engine used by tests and
//! headless tools.

use crate::error::ViewerError;
use crate::feature::RenderedFeature;
use crate::popup::Popup;
use parking_lot::{Mutex, RwLock};
use reinfo_map_types::ScreenPoint;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

mod layer_collection;

pub use layer_collection::{LayerCollection, PlacedFeature};

/// Engine shared between the viewer and its event handlers.
pub type SharedEngine<E> = Arc<RwLock<E>>;

/// Popup display shared between the viewer and its event handlers.
pub type SharedDisplay<D> = Arc<Mutex<D>>;

/// Value of a style layer's `layout.visibility` property.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Layer is drawn.
    #[default]
    Visible,
    /// Layer is hidden.
    None,
}

impl Visibility {
    /// Returns `true` for [`Visibility::Visible`].
    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }
}

impl From<bool> for Visibility {
    fn from(visible: bool) -> Self {
        if visible {
            Visibility::Visible
        } else {
            Visibility::None
        }
    }
}

/// Query and mutation interface of the map engine.
pub trait MapEngine {
    /// Returns features of the given layers rendered at the screen pixel, in the order the
    /// engine reports them.
    fn query_rendered_features(
        &self,
        point: ScreenPoint,
        layers: &[&str],
    ) -> Result<Vec<RenderedFeature>, ViewerError>;

    /// Changes visibility of a style layer. Fails with [`ViewerError::UnknownLayer`] if the
    /// style has no such layer.
    fn set_layer_visibility(
        &mut self,
        layer_id: &str,
        visibility: Visibility,
    ) -> Result<(), ViewerError>;

    /// Current visibility of the layer, or `None` if the style has no such layer.
    fn layer_visibility(&self, layer_id: &str) -> Option<Visibility>;
}

/// Widget that shows popups over the map. Once a popup is shown, the display owns it.
pub trait PopupDisplay {
    /// Shows the popup at its anchor.
    fn show_popup(&mut self, popup: Popup);
}

impl PopupDisplay for Vec<Popup> {
    fn show_popup(&mut self, popup: Popup) {
        self.push(popup);
    }
}
