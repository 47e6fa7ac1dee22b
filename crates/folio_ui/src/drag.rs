use web_time::{Duration, Instant};

use crate::slot::SlotId;

/// Drag interaction state for an asset grid
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// Not dragging
    #[default]
    Idle,
    /// Dragging the content of `source`
    Dragging { source: SlotId, started_at: Instant },
}

impl DragState {
    /// Check if currently dragging
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    /// Get the dragged slot if dragging
    pub fn source(&self) -> Option<SlotId> {
        match self {
            DragState::Dragging { source, .. } => Some(*source),
            DragState::Idle => None,
        }
    }

    /// Time since the drag started
    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            DragState::Dragging { started_at, .. } => Some(started_at.elapsed()),
            DragState::Idle => None,
        }
    }

    /// Start dragging `source`, replacing any stale drag
    pub fn start_drag(&mut self, source: SlotId) {
        *self = DragState::Dragging {
            source,
            started_at: Instant::now(),
        };
    }

    /// Stop dragging, returning the slot that was dragged
    pub fn stop_drag(&mut self) -> Option<SlotId> {
        let source = self.source();
        *self = DragState::Idle;
        source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_lifecycle() {
        let mut drag = DragState::default();
        assert!(!drag.is_dragging());
        assert_eq!(drag.elapsed(), None);

        drag.start_drag(SlotId(3));
        assert_eq!(drag.source(), Some(SlotId(3)));
        assert!(drag.elapsed().is_some());

        assert_eq!(drag.stop_drag(), Some(SlotId(3)));
        assert_eq!(drag.stop_drag(), None);
        assert_eq!(drag.elapsed(), None);
    }
}
