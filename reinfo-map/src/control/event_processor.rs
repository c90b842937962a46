//! See [`EventProcessor`].

use crate::control::{ClickEvent, EventPropagation, InputChange, UiEvent, UiEventHandler};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

type HandlerList = Vec<(u64, Arc<dyn UiEventHandler>)>;

/// Dispatches [`UiEvent`]s to registered handlers.
#[derive(Default)]
pub struct EventProcessor {
    handlers: Arc<RwLock<HandlerList>>,
    next_id: AtomicU64,
}

/// Registration of a handler in an [`EventProcessor`].
///
/// Dropping the subscription keeps the handler registered. Call [`Subscription::dispose`] to
/// remove it.
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    handlers: Weak<RwLock<HandlerList>>,
}

impl Subscription {
    /// Removes the handler from its processor. Returns `false` if it was already removed or
    /// the processor no longer exists.
    pub fn dispose(&self) -> bool {
        let Some(handlers) = self.handlers.upgrade() else {
            return false;
        };

        let mut handlers = handlers.write();
        let len_before = handlers.len();
        handlers.retain(|(id, _)| *id != self.id);

        handlers.len() != len_before
    }

    /// Returns `true` while the handler is still registered.
    pub fn is_active(&self) -> bool {
        self.handlers
            .upgrade()
            .is_some_and(|handlers| handlers.read().iter().any(|(id, _)| *id == self.id))
    }
}

impl EventProcessor {
    pub fn add_handler(&self, handler: impl UiEventHandler + 'static) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers.write().push((id, Arc::new(handler)));

        Subscription {
            id,
            handlers: Arc::downgrade(&self.handlers),
        }
    }

    /// Registers a handler for change events of the input with the given id.
    pub fn on_input_change(
        &self,
        element_id: impl Into<String>,
        handler: impl Fn(&InputChange) + Send + Sync + 'static,
    ) -> Subscription {
        let element_id = element_id.into();
        self.add_handler(move |event: &UiEvent| {
            if let UiEvent::InputChanged(change) = event {
                if change.element_id == element_id {
                    handler(change);
                }
            }

            EventPropagation::Propagate
        })
    }

    /// Registers a click handler on behalf of a style layer. Every layer handler sees every
    /// click; it is up to the handler to find out whether the layer has anything under the
    /// pointer.
    pub fn on_layer_click(
        &self,
        layer_id: impl Into<String>,
        handler: impl Fn(&str, &ClickEvent) + Send + Sync + 'static,
    ) -> Subscription {
        let layer_id = layer_id.into();
        self.add_handler(move |event: &UiEvent| {
            if let UiEvent::Click(click) = event {
                handler(&layer_id, click);
            }

            EventPropagation::Propagate
        })
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Gives the event to the handlers in registration order until one of them stops it.
    pub fn handle(&self, event: &UiEvent) {
        // Handlers may dispose subscriptions, so they must not run under the lock.
        let handlers: Vec<_> = self
            .handlers
            .read()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();

        for handler in handlers {
            if handler.handle(event) == EventPropagation::Stop {
                break;
            }
        }
    }
}
