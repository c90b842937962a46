//! Interactive layer switches and feature popups for a vector tile map.
//!
//! The map itself (style loading, tile decoding, rendering and hit-testing) belongs to an
//! external engine. This crate contains what a viewer page adds on top of it:
//!
//! * [`layer switches`](layer_switch) that show and hide groups of style layers when a
//!   checkbox changes,
//! * [`feature popups`](popup) that list the attributes of every feature under a click,
//! * the [`viewer`](Viewer) that wires both to the UI events from its load-time
//!   [`configuration`](ViewerConfig), together with the map [`controls`] and the
//!   [`geocoder`] of the search box.
//!
//! The engine is reached through the [`MapEngine`](engine::MapEngine) trait, and popups are
//! handed to a [`PopupDisplay`](engine::PopupDisplay). [`LayerCollection`](engine::LayerCollection)
//! implements the engine in memory, which is enough to drive a viewer without a window:
//!
//! ```
//! use std::sync::Arc;
//! use parking_lot::{Mutex, RwLock};
//! use reinfo_map::control::UiEvent;
//! use reinfo_map::engine::{LayerCollection, MapEngine, Visibility};
//! use reinfo_map::popup::Popup;
//! use reinfo_map::{Viewer, ViewerConfig};
//!
//! let mut collection = LayerCollection::default();
//! for id in reinfo_map::config::REINFOLIB_LAYER_IDS {
//!     collection.push(id);
//! }
//! collection.set_style_loaded(true);
//!
//! let engine = Arc::new(RwLock::new(collection));
//! let display = Arc::new(Mutex::new(Vec::<Popup>::new()));
//! let mut viewer = Viewer::new(ViewerConfig::reinfolib(), engine.clone(), display).unwrap();
//! viewer.on_load().unwrap();
//!
//! viewer.dispatch(&UiEvent::input_changed("xkt003", false));
//! assert_eq!(engine.read().layer_visibility("XKT003-line"), Some(Visibility::None));
//! ```

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod camera;
pub mod config;
pub mod control;
pub mod controls;
pub mod engine;
pub mod error;
pub mod feature;
pub mod geocoder;
pub mod layer_switch;
pub mod popup;
pub mod style;
mod viewer;

pub use config::ViewerConfig;
pub use viewer::Viewer;

// Reexport reinfo_map_types
pub use reinfo_map_types;
