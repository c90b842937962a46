//! Layer switches: checkbox-like inputs that show or hide one or more style layers.
//!
//! A switch declares its target layers as a comma separated list, e.g. `"XKT003, XKT003-line"`.
//! Whenever the input changes, every declared layer gets the visibility matching the input's
//! checked state.
//!
//! All target layers of a switch are attempted, in declaration order. A layer the style does
//! not know does not stop the remaining ones: the failure is logged and reported in the
//! [`ToggleOutcome`], and never propagated to the caller.

use crate::control::{EventProcessor, Subscription};
use crate::engine::{MapEngine, SharedEngine, Visibility};
use crate::error::ViewerError;
use std::sync::Arc;

/// Splits a layer declaration on `,`, trims every id and drops empty segments.
pub fn parse_layer_declaration(declaration: &str) -> Vec<String> {
    declaration
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Input element bound to a set of style layers.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerToggle {
    element_id: String,
    is_checked: bool,
    target_layer_ids: Vec<String>,
}

impl LayerToggle {
    /// Creates a toggle from its layer declaration. Fails if the declaration names no layer.
    pub fn new(
        element_id: impl Into<String>,
        declaration: &str,
        is_checked: bool,
    ) -> Result<Self, ViewerError> {
        let target_layer_ids = parse_layer_declaration(declaration);
        if target_layer_ids.is_empty() {
            return Err(ViewerError::EmptyLayerDeclaration(declaration.to_string()));
        }

        Ok(Self {
            element_id: element_id.into(),
            is_checked,
            target_layer_ids,
        })
    }

    /// Id of the input element.
    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    /// Checked state the target layers are set to.
    pub fn is_checked(&self) -> bool {
        self.is_checked
    }

    /// Layer ids in declaration order.
    pub fn target_layer_ids(&self) -> &[String] {
        &self.target_layer_ids
    }

    /// Copy of the toggle with a new checked state.
    pub fn with_checked(&self, is_checked: bool) -> Self {
        Self {
            is_checked,
            ..self.clone()
        }
    }

    fn visibility(&self) -> Visibility {
        Visibility::from(self.is_checked)
    }
}

/// Result of applying a toggle.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ToggleOutcome {
    /// Layers whose visibility was set.
    pub applied: Vec<String>,
    /// Layers that could not be changed, with the reason.
    pub failed: Vec<(String, String)>,
}

impl ToggleOutcome {
    /// Returns `true` if every target layer was changed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

fn apply_with(
    toggle: &LayerToggle,
    mut setter: impl FnMut(&str, Visibility) -> Result<(), ViewerError>,
) -> ToggleOutcome {
    let visibility = toggle.visibility();
    let mut outcome = ToggleOutcome::default();

    for layer_id in &toggle.target_layer_ids {
        match setter(layer_id, visibility) {
            Ok(()) => outcome.applied.push(layer_id.clone()),
            Err(error) => {
                log::warn!(
                    "Switch '{}' could not change layer '{layer_id}': {error}",
                    toggle.element_id
                );
                outcome.failed.push((layer_id.clone(), error.to_string()));
            }
        }
    }

    outcome
}

/// Applies layer switches to a map engine.
pub struct LayerSwitchController<E> {
    engine: SharedEngine<E>,
}

impl<E> Clone for LayerSwitchController<E> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
        }
    }
}

impl<E: MapEngine + Send + Sync + 'static> LayerSwitchController<E> {
    /// Creates a controller that changes layers of the engine.
    pub fn new(engine: SharedEngine<E>) -> Self {
        Self { engine }
    }

    /// Sets every target layer of the toggle to its checked state. All layers are changed
    /// under one write lock, so no other handler observes a half applied switch.
    pub fn apply(&self, toggle: &LayerToggle) -> ToggleOutcome {
        let mut engine = self.engine.write();
        apply_with(toggle, |layer_id, visibility| {
            engine.set_layer_visibility(layer_id, visibility)
        })
    }

    /// Subscribes every toggle to change events of its element.
    pub fn register_toggles(
        &self,
        toggles: impl IntoIterator<Item = LayerToggle>,
        events: &EventProcessor,
    ) -> Vec<Subscription> {
        toggles
            .into_iter()
            .map(|toggle| {
                let controller = self.clone();
                events.on_input_change(toggle.element_id.clone(), move |change| {
                    controller.apply(&toggle.with_checked(change.checked));
                })
            })
            .collect()
    }
}

/// Subscribes toggles to change events using a plain visibility setter instead of an engine.
///
/// The setter receives the layer id and `true` for visible.
pub fn register_toggles<S>(
    toggles: impl IntoIterator<Item = LayerToggle>,
    events: &EventProcessor,
    setter: S,
) -> Vec<Subscription>
where
    S: Fn(&str, bool) -> Result<(), ViewerError> + Send + Sync + 'static,
{
    let setter = Arc::new(setter);
    toggles
        .into_iter()
        .map(|toggle| {
            let setter = setter.clone();
            events.on_input_change(toggle.element_id.clone(), move |change| {
                apply_with(&toggle.with_checked(change.checked), |layer_id, visibility| {
                    (*setter)(layer_id, visibility.is_visible())
                });
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::UiEvent;
    use crate::engine::LayerCollection;
    use assert_matches::assert_matches;
    use parking_lot::{Mutex, RwLock};

    #[test]
    fn parses_declarations() {
        assert_eq!(parse_layer_declaration("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_layer_declaration("XKT001"), vec!["XKT001"]);
        assert_eq!(parse_layer_declaration(" ,a,, b, "), vec!["a", "b"]);
        assert!(parse_layer_declaration(" , ").is_empty());
    }

    #[test]
    fn empty_declaration_is_rejected() {
        assert_matches!(
            LayerToggle::new("switch", " , ", true),
            Err(ViewerError::EmptyLayerDeclaration(_))
        );
    }

    fn recording_setter() -> (
        Arc<Mutex<Vec<(String, bool)>>>,
        impl Fn(&str, bool) -> Result<(), ViewerError> + Send + Sync + 'static,
    ) {
        let calls = Arc::new(Mutex::new(vec![]));
        let calls_clone = calls.clone();
        let setter = move |layer_id: &str, visible: bool| {
            calls_clone.lock().push((layer_id.to_string(), visible));
            if layer_id == "missing" {
                Err(ViewerError::UnknownLayer(layer_id.to_string()))
            } else {
                Ok(())
            }
        };

        (calls, setter)
    }

    #[test]
    fn change_event_sets_every_target_once() {
        let events = EventProcessor::default();
        let (calls, setter) = recording_setter();
        let toggle = LayerToggle::new("xkt", "XKT001,XKT002", true).expect("valid declaration");
        register_toggles([toggle], &events, setter);

        events.handle(&UiEvent::input_changed("xkt", false));
        assert_eq!(
            *calls.lock(),
            vec![("XKT001".to_string(), false), ("XKT002".to_string(), false)]
        );

        calls.lock().clear();
        events.handle(&UiEvent::input_changed("xkt", true));
        assert_eq!(
            *calls.lock(),
            vec![("XKT001".to_string(), true), ("XKT002".to_string(), true)]
        );
    }

    #[test]
    fn unknown_layer_does_not_stop_remaining_layers() {
        let events = EventProcessor::default();
        let (calls, setter) = recording_setter();
        let toggle = LayerToggle::new("xkt", "XKT001, missing, XKT002", true)
            .expect("valid declaration");
        register_toggles([toggle], &events, setter);

        events.handle(&UiEvent::input_changed("xkt", false));
        assert_eq!(calls.lock().len(), 3);
    }

    #[test]
    fn controller_changes_engine_visibility() {
        let mut collection = LayerCollection::default();
        for id in ["XKT003", "XKT003-line", "XKT004"] {
            collection.push(id);
        }
        let engine = Arc::new(RwLock::new(collection));
        let controller = LayerSwitchController::new(engine.clone());

        let toggle = LayerToggle::new("xkt003", "XKT003, XKT003-line, XKT999", false)
            .expect("valid declaration");
        let outcome = controller.apply(&toggle);

        assert_eq!(outcome.applied, vec!["XKT003", "XKT003-line"]);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].0, "XKT999");
        assert!(!outcome.is_complete());

        let engine = engine.read();
        assert_eq!(engine.layer_visibility("XKT003"), Some(Visibility::None));
        assert_eq!(engine.layer_visibility("XKT003-line"), Some(Visibility::None));
        assert_eq!(engine.layer_visibility("XKT004"), Some(Visibility::Visible));
    }

    #[test]
    fn registered_controller_follows_change_events() {
        let mut collection = LayerCollection::default();
        collection.push("XPT001");
        let engine = Arc::new(RwLock::new(collection));
        let events = EventProcessor::default();
        let controller = LayerSwitchController::new(engine.clone());

        let toggle = LayerToggle::new("xpt", "XPT001", true).expect("valid declaration");
        let subscriptions = controller.register_toggles([toggle], &events);
        assert_eq!(subscriptions.len(), 1);

        events.handle(&UiEvent::input_changed("xpt", false));
        assert_eq!(engine.read().layer_visibility("XPT001"), Some(Visibility::None));

        events.handle(&UiEvent::input_changed("xpt", true));
        assert_eq!(engine.read().layer_visibility("XPT001"), Some(Visibility::Visible));
    }
}
