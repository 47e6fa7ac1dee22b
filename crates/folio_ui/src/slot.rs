//! A single fixed position in an asset grid.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::payload::{Asset, Payload};

/// Position of a slot in its grid. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(pub usize);

impl SlotId {
    /// The 0-based position.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle for an in-flight file read started on a slot.
///
/// A read result is only honoured while the ticket's generation matches the
/// slot's current generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadTicket {
    /// The slot the file was picked on
    pub slot: SlotId,
    /// Slot generation at the time the read started
    pub generation: u64,
}

/// One fillable position of the grid.
#[derive(Debug, Clone)]
pub struct Slot {
    id: SlotId,
    asset: Option<Asset>,
    enabled: bool,
    hovered: bool,
    generation: u64,
}

impl Slot {
    /// Create an empty, disabled slot.
    pub fn new(id: SlotId) -> Self {
        Self {
            id,
            asset: None,
            enabled: false,
            hovered: false,
            generation: 0,
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    /// True iff an asset is currently stored.
    pub fn is_filled(&self) -> bool {
        self.asset.is_some()
    }

    /// Whether the slot's file input accepts new picks.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a drag is hovering over this slot.
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn asset(&self) -> Option<&Asset> {
        self.asset.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Store an asset and mark the slot filled. Other slots are untouched.
    pub fn set_asset(&mut self, asset: Asset) {
        self.asset = Some(asset);
    }

    /// Attach a replacement payload to the stored asset.
    ///
    /// Returns `false` if the slot is empty.
    pub fn set_processed(&mut self, payload: Payload) -> bool {
        match self.asset.as_mut() {
            Some(asset) => {
                asset.processed = Some(payload);
                true
            }
            None => false,
        }
    }

    /// Remove and return the stored asset. Does not change `enabled`.
    pub fn clear(&mut self) -> Option<Asset> {
        self.asset.take()
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    pub(crate) fn replace_asset(&mut self, asset: Option<Asset>) -> Option<Asset> {
        std::mem::replace(&mut self.asset, asset)
    }

    /// Start a new read generation, invalidating older tickets.
    pub(crate) fn next_generation(&mut self) -> ReadTicket {
        self.generation += 1;
        ReadTicket {
            slot: self.id,
            generation: self.generation,
        }
    }

    pub(crate) fn accepts(&self, ticket: ReadTicket) -> bool {
        ticket.slot == self.id && ticket.generation == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear() {
        let mut slot = Slot::new(SlotId(2));
        assert!(!slot.is_filled());

        slot.set_asset(Asset::new(Payload::remote("/uploads/x.jpg")));
        assert!(slot.is_filled());
        assert!(!slot.is_enabled(), "set_asset must not touch enabled");

        let removed = slot.clear();
        assert_eq!(removed, Some(Asset::new(Payload::remote("/uploads/x.jpg"))));
        assert!(!slot.is_filled());
    }

    #[test]
    fn test_set_processed_requires_asset() {
        let mut slot = Slot::new(SlotId(0));
        assert!(!slot.set_processed(Payload::remote("/uploads/late.png")));
        assert!(slot.asset().is_none());

        slot.set_asset(Asset::new(Payload::remote("/uploads/a.png")));
        assert!(slot.set_processed(Payload::remote("/uploads/b.png")));
        assert_eq!(
            slot.asset().map(|a| a.submitted().clone()),
            Some(Payload::remote("/uploads/b.png"))
        );
    }

    #[test]
    fn test_generations_invalidate_old_tickets() {
        let mut slot = Slot::new(SlotId(1));
        let first = slot.next_generation();
        let second = slot.next_generation();

        assert!(!slot.accepts(first));
        assert!(slot.accepts(second));
        assert!(!slot.accepts(ReadTicket {
            slot: SlotId(0),
            generation: second.generation,
        }));
    }
}
