use crate::payload::{Asset, Payload};
use crate::slot::SlotId;

/// Events an asset grid emits to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// A file was picked into a slot and may need post-processing.
    Select { slot: SlotId, payload: Payload },
    /// Drag-and-drop moved content from `source` to `target`.
    Move { source: SlotId, target: SlotId },
    /// The user cleared a slot. Fired before compaction, with the removed asset.
    Clear { slot: SlotId, asset: Asset },
}

impl GridEvent {
    pub fn kind(&self) -> GridEventKind {
        match self {
            GridEvent::Select { .. } => GridEventKind::Select,
            GridEvent::Move { .. } => GridEventKind::Move,
            GridEvent::Clear { .. } => GridEventKind::Clear,
        }
    }
}

/// Event names a handler can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridEventKind {
    Select,
    Move,
    Clear,
}

impl GridEventKind {
    /// Get the event name as used by page controllers.
    pub fn name(&self) -> &'static str {
        match self {
            GridEventKind::Select => "select",
            GridEventKind::Move => "move",
            GridEventKind::Clear => "clear",
        }
    }
}
