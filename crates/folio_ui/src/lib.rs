//! folio_ui - headless components for the folio admin editors
//!
//! This crate holds the state machines behind the editors' interactive
//! widgets. It has no DOM or filesystem dependency: a binding layer feeds
//! user gestures in and renders slot state back out.
//!
//! The main component is [`AssetGrid`], a fixed number of image slots that
//! fill contiguously from the first position and can be reordered by
//! drag-and-drop.

mod callback;
mod drag;
mod event;
mod grid;
mod payload;
mod slot;

pub use callback::EventHandlers;
pub use drag::DragState;
pub use event::{GridEvent, GridEventKind};
pub use grid::{AssetGrid, DropBehavior};
pub use payload::{Asset, FileData, Payload};
pub use slot::{ReadTicket, Slot, SlotId};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::event::{GridEvent, GridEventKind};
    pub use crate::grid::{AssetGrid, DropBehavior};
    pub use crate::payload::{Asset, FileData, Payload};
    pub use crate::slot::{Slot, SlotId};
}
