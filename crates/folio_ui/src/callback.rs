//! Single-slot event handler registry.
//!
//! Each event kind holds at most one handler. The first registration for a
//! kind wins and later registrations are ignored. Firing a kind with no
//! handler does nothing.
//!
//! # Examples
//!
//! ```
//! use folio_ui::{EventHandlers, GridEvent, GridEventKind, SlotId};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let moves = Rc::new(Cell::new(0));
//! let counter = moves.clone();
//!
//! let mut handlers = EventHandlers::default();
//! handlers.register(GridEventKind::Move, move |_| counter.set(counter.get() + 1));
//! handlers.register(GridEventKind::Move, |_| panic!("ignored"));
//!
//! handlers.fire(&GridEvent::Move { source: SlotId(0), target: SlotId(1) });
//! assert_eq!(moves.get(), 1);
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::event::{GridEvent, GridEventKind};

type Handler = Box<dyn FnMut(&GridEvent)>;

/// Map from event kind to its single handler.
#[derive(Default)]
pub struct EventHandlers {
    handlers: HashMap<GridEventKind, Handler>,
}

impl EventHandlers {
    /// Register a handler for `kind`.
    ///
    /// Returns `false` if a handler was already registered; the new one is dropped.
    pub fn register<F>(&mut self, kind: GridEventKind, handler: F) -> bool
    where
        F: FnMut(&GridEvent) + 'static,
    {
        if self.handlers.contains_key(&kind) {
            log::debug!("Handler for '{}' already registered, ignoring", kind.name());
            return false;
        }
        self.handlers.insert(kind, Box::new(handler));
        true
    }

    /// Call the handler registered for the event's kind, if any.
    pub fn fire(&mut self, event: &GridEvent) {
        if let Some(handler) = self.handlers.get_mut(&event.kind()) {
            handler(event);
        }
    }
}

impl fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.handlers.keys().map(|k| k.name()).collect();
        kinds.sort_unstable();
        f.debug_struct("EventHandlers")
            .field("registered", &kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::Payload;
    use crate::slot::SlotId;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_first_registration_wins() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut handlers = EventHandlers::default();

        let first = seen.clone();
        assert!(handlers.register(GridEventKind::Select, move |_| first.borrow_mut().push("first")));
        let second = seen.clone();
        assert!(!handlers.register(GridEventKind::Select, move |_| second.borrow_mut().push("second")));

        handlers.fire(&GridEvent::Select {
            slot: SlotId(0),
            payload: Payload::remote("/uploads/a.png"),
        });
        assert_eq!(*seen.borrow(), vec!["first"]);
    }

    #[test]
    fn test_unregistered_event_is_silent() {
        let mut handlers = EventHandlers::default();
        handlers.fire(&GridEvent::Move {
            source: SlotId(0),
            target: SlotId(1),
        });
        assert!(handlers.register(GridEventKind::Move, |_| {}));
    }

    #[test]
    fn test_debug_lists_registered_names() {
        let mut handlers = EventHandlers::default();
        handlers.register(GridEventKind::Clear, |_| {});
        handlers.register(GridEventKind::Select, |_| {});
        assert_eq!(
            format!("{:?}", handlers),
            r#"EventHandlers { registered: ["clear", "select"] }"#
        );
    }
}
