//! User interaction plumbing of the viewer.
//!
//! The host UI converts its own events (checkbox changes, canvas clicks) into [`UiEvent`]s
//! and gives them to the [`EventProcessor`]. The processor forwards each event to the
//! registered [`UiEventHandler`]s in registration order. Registering a handler returns a
//! [`Subscription`] that can later be disposed to remove the handler again.
//!
//! Handlers can be invoked directly with synthetic events, so no real UI runtime is needed
//! to drive the viewer.

use reinfo_map_types::{GeoPoint2d, ScreenPoint};

mod event_processor;

pub use event_processor::{EventProcessor, Subscription};

/// User input handler.
pub trait UiEventHandler: Send + Sync {
    /// Handle the event.
    fn handle(&self, event: &UiEvent) -> EventPropagation;
}

impl<T> UiEventHandler for T
where
    T: Fn(&UiEvent) -> EventPropagation + Send + Sync,
{
    fn handle(&self, event: &UiEvent) -> EventPropagation {
        self(event)
    }
}

/// Interaction event produced by the host UI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// A toggle input changed its checked state.
    InputChanged(InputChange),
    /// The map canvas was clicked.
    Click(ClickEvent),
}

/// Change of a checkbox-like input.
#[derive(Debug, Clone, PartialEq)]
pub struct InputChange {
    /// Id of the input element.
    pub element_id: String,
    /// Checked state after the change.
    pub checked: bool,
}

/// Click on the map canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    /// Pointer position on the canvas in pixels from the top-left corner.
    pub screen_point: ScreenPoint,
    /// Geographic position under the pointer.
    pub lng_lat: GeoPoint2d,
}

impl UiEvent {
    /// Creates an [`UiEvent::InputChanged`] event.
    pub fn input_changed(element_id: impl Into<String>, checked: bool) -> Self {
        Self::InputChanged(InputChange {
            element_id: element_id.into(),
            checked,
        })
    }

    /// Creates an [`UiEvent::Click`] event.
    pub fn click(screen_point: ScreenPoint, lng_lat: GeoPoint2d) -> Self {
        Self::Click(ClickEvent {
            screen_point,
            lng_lat,
        })
    }
}

/// Value returned by an [`UiEventHandler`] to indicate the status of the event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventPropagation {
    /// Event should be propagated to the next handler.
    Propagate,
    /// Event should not be propagated to the next handler.
    Stop,
}
