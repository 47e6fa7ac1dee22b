//! Fixed-capacity asset grid.
//!
//! The grid keeps its filled slots as a contiguous prefix `[0, fill_count)`.
//! The slot at `fill_count` (if any) is the only one accepting new picks;
//! every slot after it is empty and disabled. Picks, clears, drops and bulk
//! loads all go through the methods here so the invariant is restored after
//! every transition.

mod drag_drop;


use serde::{Deserialize, Serialize};

use crate::callback::EventHandlers;
use crate::drag::DragState;
use crate::event::{GridEvent, GridEventKind};
use crate::payload::{Asset, Payload};
use crate::slot::{ReadTicket, Slot, SlotId};

/// What dropping one filled slot onto another does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropBehavior {
    /// Exchange the two slots' contents; nothing else moves.
    #[default]
    Swap,
    /// Take the dragged asset out and reinsert it at the target,
    /// shifting the slots in between by one.
    ShiftInsert,
}

/// An ordered, fixed-length list of slots with contiguous fill.
#[derive(Debug)]
pub struct AssetGrid {
    slots: Vec<Slot>,
    fill_count: usize,
    drag: DragState,
    behavior: DropBehavior,
    handlers: EventHandlers,
}

impl AssetGrid {
    /// Create a grid with `slot_count` empty slots. Slot 0 is enabled.
    pub fn new(slot_count: usize) -> Self {
        Self::with_behavior(slot_count, DropBehavior::default())
    }

    /// Create a grid with a specific drop behavior.
    pub fn with_behavior(slot_count: usize, behavior: DropBehavior) -> Self {
        let slots = (0..slot_count).map(|i| Slot::new(SlotId(i))).collect();
        let mut grid = Self {
            slots,
            fill_count: 0,
            drag: DragState::Idle,
            behavior,
            handlers: EventHandlers::default(),
        };
        grid.refresh_enabled();
        log::debug!("Asset grid created with {} slots ({:?})", slot_count, behavior);
        grid
    }

    /// Register the handler for an event kind. The first registration wins.
    pub fn on<F>(&mut self, kind: GridEventKind, handler: F) -> &mut Self
    where
        F: FnMut(&GridEvent) + 'static,
    {
        self.handlers.register(kind, handler);
        self
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of slots (fixed at construction).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of contiguous filled slots from position 0.
    pub fn fill_count(&self) -> usize {
        self.fill_count
    }

    /// True when every slot holds an asset.
    pub fn is_full(&self) -> bool {
        self.fill_count == self.slots.len()
    }

    /// The single slot accepting new picks, if the grid is not full.
    pub fn next_available(&self) -> Option<SlotId> {
        self.slots.get(self.fill_count).map(Slot::id)
    }

    pub fn slot(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(id.index())
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// The slot currently being dragged.
    pub fn dragged(&self) -> Option<SlotId> {
        self.drag.source()
    }

    pub fn drop_behavior(&self) -> DropBehavior {
        self.behavior
    }

    /// Ordered payloads of every filled slot, preferring processed payloads.
    ///
    /// This is the list submitted to the server; its order is the order the
    /// assets should be persisted in.
    pub fn value(&self) -> Vec<Payload> {
        self.slots
            .iter()
            .filter_map(Slot::asset)
            .map(|asset| asset.submitted().clone())
            .collect()
    }

    // =========================================================================
    // Pick protocol
    // =========================================================================

    /// The slot's file input changed: start a read.
    ///
    /// Returns `None` unless `slot` is the enabled empty slot. Starting a new
    /// read on the same slot invalidates any earlier ticket.
    pub fn begin_pick(&mut self, slot: SlotId) -> Option<ReadTicket> {
        let target = self.slots.get_mut(slot.index())?;
        if !target.is_enabled() || target.is_filled() {
            log::warn!("Slot {} is not accepting picks", slot);
            return None;
        }
        let ticket = target.next_generation();
        log::debug!("Slot {} read started (generation {})", slot, ticket.generation);
        Some(ticket)
    }

    /// The file read for `ticket` completed with `payload`.
    ///
    /// Stale tickets are ignored. Otherwise the payload becomes the slot's
    /// source asset, `select` fires, and the next slot is enabled.
    pub fn finish_pick(&mut self, ticket: ReadTicket, payload: Payload) -> bool {
        let Some(target) = self.slots.get_mut(ticket.slot.index()) else {
            return false;
        };
        if !target.accepts(ticket) || !target.is_enabled() || target.is_filled() {
            log::debug!(
                "Discarding stale read for slot {} (generation {})",
                ticket.slot,
                ticket.generation
            );
            return false;
        }

        target.set_asset(Asset::new(payload.clone()));
        // Consume the ticket so it cannot land again after compaction.
        target.next_generation();
        self.handlers.fire(&GridEvent::Select {
            slot: ticket.slot,
            payload,
        });

        self.fill_count += 1;
        self.refresh_enabled();
        log::debug!("Slot {} filled, fill count {}", ticket.slot, self.fill_count);
        true
    }

    /// Install a processed replacement payload on a filled slot.
    pub fn set_processed(&mut self, slot: SlotId, payload: Payload) -> bool {
        match self.slots.get_mut(slot.index()) {
            Some(target) => {
                let applied = target.set_processed(payload);
                if !applied {
                    log::warn!("Cannot set processed payload on empty slot {}", slot);
                }
                applied
            }
            None => false,
        }
    }

    // =========================================================================
    // Clear protocol
    // =========================================================================

    /// The user removed the asset in `slot`.
    ///
    /// Fires `clear` with the removed asset, then shifts every later asset
    /// down by one position so the filled slots stay contiguous. Clearing an
    /// empty slot is a no-op.
    pub fn clear_slot(&mut self, slot: SlotId) -> bool {
        let Some(asset) = self.slot(slot).and_then(Slot::asset).cloned() else {
            return false;
        };

        self.handlers.fire(&GridEvent::Clear { slot, asset });

        self.slots[slot.index()].clear();
        for i in slot.index() + 1..self.slots.len() {
            let moved = self.slots[i].replace_asset(None);
            if moved.is_none() {
                break;
            }
            self.slots[i - 1].replace_asset(moved);
        }

        // The old pick target is no longer enabled; reads started on it are stale.
        if let Some(old_target) = self.slots.get_mut(self.fill_count) {
            old_target.next_generation();
        }
        self.fill_count -= 1;
        // Positions shifted under any active drag.
        if let Some(source) = self.drag.stop_drag() {
            log::debug!("Drag of slot {} cancelled by compaction", source);
        }
        self.refresh_enabled();
        log::debug!("Slot {} cleared, fill count {}", slot, self.fill_count);
        true
    }

    // =========================================================================
    // Bulk operations
    // =========================================================================

    /// Reset every slot to empty. Slot 0 becomes the pick target.
    pub fn clear(&mut self) {
        self.reset_slots();
        self.refresh_enabled();
        log::debug!("Asset grid cleared");
    }

    /// Load existing assets into slots `0..len` in order.
    ///
    /// Anything already in the grid is discarded. Payloads beyond the grid's
    /// capacity are dropped.
    pub fn set_images<I>(&mut self, payloads: I)
    where
        I: IntoIterator<Item = Payload>,
    {
        self.reset_slots();

        let mut dropped = 0;
        for payload in payloads {
            match self.slots.get_mut(self.fill_count) {
                Some(slot) => {
                    slot.set_asset(Asset::new(payload));
                    self.fill_count += 1;
                }
                None => dropped += 1,
            }
        }
        if dropped > 0 {
            log::warn!(
                "Asset grid holds {} slots, {} images were not loaded",
                self.slots.len(),
                dropped
            );
        }

        self.refresh_enabled();
        log::debug!("Loaded {} images into asset grid", self.fill_count);
    }

    fn reset_slots(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
            slot.set_hovered(false);
            slot.next_generation();
        }
        self.fill_count = 0;
        self.drag.stop_drag();
    }

    /// Only the slot at `fill_count` accepts picks.
    fn refresh_enabled(&mut self) {
        let fill_count = self.fill_count;
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.set_enabled(i == fill_count);
        }
    }
}
