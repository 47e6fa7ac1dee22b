//! Drag-and-drop reordering between filled slots.

use super::{AssetGrid, DropBehavior};
use crate::event::GridEvent;
use crate::slot::SlotId;

impl AssetGrid {
    /// A drag gesture started on `slot`. Only filled slots can be dragged.
    pub fn drag_start(&mut self, slot: SlotId) -> bool {
        if !self.slot(slot).is_some_and(|s| s.is_filled()) {
            return false;
        }
        if let Some(stale) = self.drag.source() {
            log::debug!("Replacing unfinished drag of slot {}", stale);
        }
        self.drag.start_drag(slot);
        log::debug!("Drag started on slot {}", slot);
        true
    }

    /// A drag hovers over `slot`.
    ///
    /// Returns `true` when the caller should accept the drag (prevent the
    /// browser default) so the drop event can fire.
    pub fn drag_over(&mut self, slot: SlotId) -> bool {
        match self.slots.get_mut(slot.index()) {
            Some(target) => {
                target.set_hovered(true);
                true
            }
            None => false,
        }
    }

    /// The drag left `slot`.
    pub fn drag_leave(&mut self, slot: SlotId) {
        if let Some(target) = self.slots.get_mut(slot.index()) {
            target.set_hovered(false);
        }
    }

    /// The dragged content was dropped on `target`.
    ///
    /// Requires an active drag and a filled target; otherwise nothing
    /// happens. Dropping a slot onto itself ends the drag without an event.
    pub fn drop(&mut self, target: SlotId) -> bool {
        let Some(target_slot) = self.slots.get_mut(target.index()) else {
            return false;
        };
        target_slot.set_hovered(false);
        let target_filled = target_slot.is_filled();

        let Some(source) = self.drag.source() else {
            log::debug!("Drop on slot {} without an active drag", target);
            return false;
        };
        if !target_filled {
            log::debug!("Drop on empty slot {} ignored", target);
            return false;
        }

        let elapsed = self.drag.elapsed();
        self.drag.stop_drag();
        if source == target {
            return false;
        }

        match self.behavior {
            DropBehavior::Swap => self.swap_assets(source, target),
            DropBehavior::ShiftInsert => self.shift_insert(source, target),
        }
        self.handlers.fire(&GridEvent::Move { source, target });
        log::debug!(
            "Moved slot {} onto slot {} ({:?}) after {:?}",
            source,
            target,
            self.behavior,
            elapsed.unwrap_or_default()
        );
        true
    }

    /// The drag gesture finished, with or without a drop.
    ///
    /// Always forgets the dragged slot, so a cancelled drag cannot leak into
    /// a later drop.
    pub fn drag_end(&mut self) {
        let elapsed = self.drag.elapsed();
        if let Some(source) = self.drag.stop_drag() {
            log::debug!(
                "Drag of slot {} ended without a drop after {:?}",
                source,
                elapsed.unwrap_or_default()
            );
        }
        for slot in &mut self.slots {
            slot.set_hovered(false);
        }
    }

    fn swap_assets(&mut self, a: SlotId, b: SlotId) {
        let first = self.slots[a.index()].replace_asset(None);
        let second = self.slots[b.index()].replace_asset(first);
        self.slots[a.index()].replace_asset(second);
    }

    fn shift_insert(&mut self, source: SlotId, target: SlotId) {
        let (from, to) = (source.index(), target.index());
        let moving = self.slots[from].replace_asset(None);

        if from < to {
            for i in from..to {
                let next = self.slots[i + 1].replace_asset(None);
                self.slots[i].replace_asset(next);
            }
        } else {
            for i in (to + 1..=from).rev() {
                let prev = self.slots[i - 1].replace_asset(None);
                self.slots[i].replace_asset(prev);
            }
        }

        self.slots[to].replace_asset(moving);
    }
}
