//! Asset editor controller.
//!
//! Owns an [`AssetGrid`] the way the portfolio and blog editor pages do:
//! freshly picked images are queued for the crop dialog, cropped results are
//! written back as processed payloads, and the grid value is turned into a
//! [`Submission`] when the form is sent.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use folio_ui::{AssetGrid, DropBehavior, GridEvent, GridEventKind, Payload, ReadTicket, SlotId};
use thiserror::Error;

use crate::config::EditorConfig;
use crate::crop::{self, CropError, CropRequest};
use crate::loader::{AssetLoader, ImageLoader, LoadError};
use crate::submission::{ProjectRecord, Submission};

/// Errors that can occur during editor operations.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Crop(#[from] CropError),

    /// The slot is not the grid's pick target
    #[error("Slot {0} is not accepting picks")]
    SlotUnavailable(SlotId),

    /// No crop is pending for the slot
    #[error("No crop pending for slot {0}")]
    NotPendingCrop(SlotId),
}

/// Slots waiting for the crop dialog, kept in pick order.
///
/// Positions are remapped on every move and clear so each entry keeps
/// pointing at the asset it was queued for.
#[derive(Debug, Default)]
struct PendingCrops {
    queue: VecDeque<SlotId>,
}

impl PendingCrops {
    fn push(&mut self, slot: SlotId) {
        if !self.queue.contains(&slot) {
            self.queue.push_back(slot);
        }
    }

    fn remove(&mut self, slot: SlotId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|&pending| pending != slot);
        self.queue.len() != before
    }

    fn on_move(&mut self, source: SlotId, target: SlotId, behavior: DropBehavior) {
        let (from, to) = (source.index(), target.index());
        for pending in &mut self.queue {
            let i = pending.index();
            let moved = match behavior {
                DropBehavior::Swap if i == from => to,
                DropBehavior::Swap if i == to => from,
                DropBehavior::Swap => i,
                DropBehavior::ShiftInsert if i == from => to,
                DropBehavior::ShiftInsert if from < to && i > from && i <= to => i - 1,
                DropBehavior::ShiftInsert if to < from && i >= to && i < from => i + 1,
                DropBehavior::ShiftInsert => i,
            };
            *pending = SlotId(moved);
        }
    }

    fn on_clear(&mut self, cleared: SlotId) {
        self.remove(cleared);
        for pending in &mut self.queue {
            if pending.index() > cleared.index() {
                *pending = SlotId(pending.index() - 1);
            }
        }
    }
}

/// Controller binding an asset grid to the crop and submit flows.
#[derive(Debug)]
pub struct AssetEditor {
    grid: AssetGrid,
    loader: ImageLoader,
    pending: Rc<RefCell<PendingCrops>>,
    record: Option<ProjectRecord>,
    min_crop_width: u32,
    uploads_prefix: String,
    files_field: String,
}

impl AssetEditor {
    pub fn new(config: &EditorConfig) -> Self {
        let mut grid = AssetGrid::with_behavior(config.slot_count, config.drop_behavior);
        let pending = Rc::new(RefCell::new(PendingCrops::default()));

        let on_select = pending.clone();
        let on_move = pending.clone();
        let on_clear = pending.clone();
        let behavior = config.drop_behavior;

        grid.on(GridEventKind::Select, move |event| {
            if let GridEvent::Select { slot, .. } = event {
                on_select.borrow_mut().push(*slot);
            }
        })
        .on(GridEventKind::Move, move |event| {
            if let GridEvent::Move { source, target } = event {
                on_move.borrow_mut().on_move(*source, *target, behavior);
            }
        })
        .on(GridEventKind::Clear, move |event| {
            if let GridEvent::Clear { slot, asset } = event {
                log::info!("Removed asset {:?} from slot {}", asset.source.as_remote(), slot);
                on_clear.borrow_mut().on_clear(*slot);
            }
        });

        Self {
            grid,
            loader: ImageLoader,
            pending,
            record: None,
            min_crop_width: config.min_crop_width,
            uploads_prefix: config.uploads_prefix.clone(),
            files_field: config.files_field.clone(),
        }
    }

    pub fn grid(&self) -> &AssetGrid {
        &self.grid
    }

    // =========================================================================
    // Grid gestures
    // =========================================================================

    pub fn drag_start(&mut self, slot: SlotId) -> bool {
        self.grid.drag_start(slot)
    }

    pub fn drag_over(&mut self, slot: SlotId) -> bool {
        self.grid.drag_over(slot)
    }

    pub fn drag_leave(&mut self, slot: SlotId) {
        self.grid.drag_leave(slot);
    }

    /// Drop onto `target`; pending crops follow their assets.
    pub fn drop(&mut self, target: SlotId) -> bool {
        self.grid.drop(target)
    }

    pub fn drag_end(&mut self) {
        self.grid.drag_end();
    }

    /// Remove the asset in `slot` and compact the grid.
    pub fn clear_slot(&mut self, slot: SlotId) -> bool {
        self.grid.clear_slot(slot)
    }

    /// Replace the grid content with existing assets.
    ///
    /// Crops queued for the previous content are dropped.
    pub fn set_images<I>(&mut self, payloads: I)
    where
        I: IntoIterator<Item = Payload>,
    {
        let dropped = std::mem::take(&mut self.pending.borrow_mut().queue);
        if !dropped.is_empty() {
            log::debug!("Dropping {} pending crops", dropped.len());
        }
        self.grid.set_images(payloads);
    }

    /// The record being edited, `None` when creating a new one.
    pub fn record(&self) -> Option<&ProjectRecord> {
        self.record.as_ref()
    }

    /// Fill the grid from preview URLs of pre-rendered placeholders.
    ///
    /// Empty URLs mark empty placeholders and are skipped; the rest are
    /// loaded in order. Returns the resulting fill count.
    pub fn seed_from_previews<I>(&mut self, previews: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let existing: Vec<Payload> = previews
            .into_iter()
            .filter(|url| !url.trim().is_empty())
            .map(Payload::Remote)
            .collect();
        if !existing.is_empty() {
            self.set_images(existing);
        }
        self.grid.fill_count()
    }

    /// Start editing an existing record.
    pub fn load_project(&mut self, record: ProjectRecord) {
        self.set_images(record.asset_payloads(&self.uploads_prefix));
        log::info!(
            "Editing record {} '{}' with {} assets",
            record.id,
            record.name,
            record.assets.len()
        );
        self.record = Some(record);
    }

    /// Close the editor: empty the grid and forget the record.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.pending.borrow_mut().queue.clear();
        self.record = None;
    }

    /// A file input changed; returns the ticket for the read.
    pub fn begin_pick(&mut self, slot: SlotId) -> Result<ReadTicket, EditorError> {
        self.grid
            .begin_pick(slot)
            .ok_or(EditorError::SlotUnavailable(slot))
    }

    /// A file read finished.
    ///
    /// Returns `Ok(false)` when the read was stale and got discarded.
    pub fn finish_pick(
        &mut self,
        ticket: ReadTicket,
        name: &str,
        bytes: Vec<u8>,
    ) -> Result<bool, EditorError> {
        let data = self.loader.load(name, bytes).inspect_err(|e| {
            log::warn!("Rejected file for slot {}: {}", ticket.slot, e);
        })?;
        Ok(self.grid.finish_pick(ticket, Payload::Data(data)))
    }

    /// Pick a file into `slot` with a read that completes immediately.
    pub fn pick(&mut self, slot: SlotId, name: &str, bytes: Vec<u8>) -> Result<bool, EditorError> {
        let ticket = self.begin_pick(slot)?;
        self.finish_pick(ticket, name, bytes)
    }

    /// Pick a file into the next free slot.
    pub fn pick_next(&mut self, name: &str, bytes: Vec<u8>) -> Result<bool, EditorError> {
        let slot = self
            .grid
            .next_available()
            .ok_or(EditorError::SlotUnavailable(SlotId(self.grid.len())))?;
        self.pick(slot, name, bytes)
    }

    /// Pick a file from disk into the next free slot.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn pick_path(&mut self, path: &std::path::Path) -> Result<bool, EditorError> {
        let data = crate::loader::read_path(&self.loader, path)?;
        let slot = self
            .grid
            .next_available()
            .ok_or(EditorError::SlotUnavailable(SlotId(self.grid.len())))?;
        let ticket = self.begin_pick(slot)?;
        Ok(self.grid.finish_pick(ticket, Payload::Data(data)))
    }

    /// The next slot waiting for the crop dialog.
    pub fn next_crop(&self) -> Option<SlotId> {
        self.pending.borrow().queue.front().copied()
    }

    /// Slots waiting for the crop dialog, in pick order.
    pub fn pending_crops(&self) -> Vec<SlotId> {
        self.pending.borrow().queue.iter().copied().collect()
    }

    /// Crop the slot's source image and install the result.
    pub fn apply_crop(&mut self, slot: SlotId, request: &CropRequest) -> Result<(), EditorError> {
        if !self.pending.borrow().queue.contains(&slot) {
            return Err(EditorError::NotPendingCrop(slot));
        }
        let source = self
            .grid
            .slot(slot)
            .and_then(|s| s.asset())
            .map(|asset| asset.source.clone())
            .ok_or(EditorError::NotPendingCrop(slot))?;

        let processed = crop::crop(&source, request, self.min_crop_width)?;
        self.grid.set_processed(slot, processed);
        self.pending.borrow_mut().remove(slot);
        Ok(())
    }

    /// Keep the picked image as is.
    pub fn skip_crop(&mut self, slot: SlotId) -> bool {
        self.pending.borrow_mut().remove(slot)
    }

    /// Build the submission for the current grid value.
    pub fn submission(&self) -> Submission {
        let value = self.grid.value();
        match &self.record {
            Some(record) => {
                Submission::for_existing(record, &value, &self.uploads_prefix, &self.files_field)
            }
            None => Submission::for_new(&value, &self.files_field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::tests::png_bytes;
    use crate::submission::ServerAsset;

    fn config(slot_count: usize, behavior: DropBehavior) -> EditorConfig {
        EditorConfig {
            slot_count,
            drop_behavior: behavior,
            min_crop_width: 0,
            ..EditorConfig::default()
        }
    }

    fn editor_with_picks(count: usize, behavior: DropBehavior) -> AssetEditor {
        let mut editor = AssetEditor::new(&config(5, behavior));
        for i in 0..count {
            assert!(editor
                .pick_next(&format!("img{}.png", i), png_bytes(10 + i as u32, 10))
                .unwrap());
        }
        editor
    }

    fn record() -> ProjectRecord {
        ProjectRecord {
            id: 3,
            name: "Dunes".to_string(),
            assets: vec![
                ServerAsset {
                    id: 10,
                    path: "x.jpg".to_string(),
                    order: 0,
                },
                ServerAsset {
                    id: 11,
                    path: "y.jpg".to_string(),
                    order: 1,
                },
            ],
        }
    }

    #[test]
    fn test_pick_queues_crop() {
        let editor = editor_with_picks(2, DropBehavior::Swap);
        assert_eq!(editor.grid().fill_count(), 2);
        assert_eq!(editor.pending_crops(), vec![SlotId(0), SlotId(1)]);
        assert_eq!(editor.next_crop(), Some(SlotId(0)));
    }

    #[test]
    fn test_rejected_file_keeps_slot_open() {
        let mut editor = AssetEditor::new(&config(3, DropBehavior::Swap));
        let err = editor.pick(SlotId(0), "notes.txt", b"hello".to_vec()).unwrap_err();
        assert!(matches!(err, EditorError::Load(_)));
        assert_eq!(editor.grid().fill_count(), 0);
        assert_eq!(editor.grid().next_available(), Some(SlotId(0)));
    }

    #[test]
    fn test_pick_on_wrong_slot() {
        let mut editor = AssetEditor::new(&config(3, DropBehavior::Swap));
        assert!(matches!(
            editor.pick(SlotId(2), "a.png", png_bytes(4, 4)),
            Err(EditorError::SlotUnavailable(SlotId(2)))
        ));
    }

    #[test]
    fn test_apply_crop_installs_processed_payload() {
        let mut editor = editor_with_picks(1, DropBehavior::Swap);
        let request = CropRequest {
            width: 4,
            height: 3,
            ..CropRequest::default()
        };
        editor.apply_crop(SlotId(0), &request).unwrap();

        assert_eq!(editor.next_crop(), None);
        let value = editor.grid().value();
        let data = value[0].as_data().unwrap();
        let img = image::load_from_memory(&data.bytes).unwrap();
        assert_eq!((img.width(), img.height()), (4, 3));

        assert!(matches!(
            editor.apply_crop(SlotId(0), &request),
            Err(EditorError::NotPendingCrop(_))
        ));
    }

    #[test]
    fn test_pending_crop_follows_swap() {
        let mut editor = editor_with_picks(3, DropBehavior::Swap);
        editor.skip_crop(SlotId(1));
        editor.skip_crop(SlotId(2));

        editor.drag_start(SlotId(2));
        editor.drop(SlotId(0));

        // img0 now lives in slot 2
        assert_eq!(editor.pending_crops(), vec![SlotId(2)]);
        let source = editor.grid().slot(SlotId(2)).and_then(|s| s.asset()).unwrap();
        assert_eq!(source.source.as_data().unwrap().name, "img0.png");
    }

    #[test]
    fn test_pending_crop_follows_shift_insert() {
        let mut editor = editor_with_picks(4, DropBehavior::ShiftInsert);
        editor.drag_start(SlotId(0));
        editor.drop(SlotId(2));

        assert_eq!(
            editor.pending_crops(),
            vec![SlotId(2), SlotId(0), SlotId(1), SlotId(3)]
        );
        let names: Vec<_> = editor
            .pending_crops()
            .into_iter()
            .map(|slot| {
                let asset = editor.grid().slot(slot).and_then(|s| s.asset()).unwrap();
                asset.source.as_data().unwrap().name.clone()
            })
            .collect();
        assert_eq!(names, vec!["img0.png", "img1.png", "img2.png", "img3.png"]);
    }

    #[test]
    fn test_pending_crop_follows_compaction() {
        let mut editor = editor_with_picks(3, DropBehavior::Swap);
        editor.clear_slot(SlotId(0));
        assert_eq!(editor.pending_crops(), vec![SlotId(0), SlotId(1)]);
    }

    #[test]
    fn test_pick_path_fills_next_slot() {
        let dir = std::env::temp_dir().join(format!("folio-editor-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cover.png");
        std::fs::write(&path, png_bytes(5, 5)).unwrap();

        let mut editor = editor_with_picks(1, DropBehavior::Swap);
        assert!(editor.pick_path(&path).unwrap());
        assert_eq!(editor.grid().fill_count(), 2);
        assert_eq!(editor.pending_crops(), vec![SlotId(0), SlotId(1)]);

        assert!(matches!(
            editor.pick_path(&dir.join("gone.png")),
            Err(EditorError::Load(LoadError::Io { .. }))
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_set_images_drops_pending_crops() {
        let mut editor = editor_with_picks(1, DropBehavior::Swap);
        assert_eq!(editor.next_crop(), Some(SlotId(0)));

        editor.set_images(vec![Payload::remote("/uploads/x.jpg")]);
        assert_eq!(editor.next_crop(), None);
        assert!(matches!(
            editor.apply_crop(SlotId(0), &CropRequest::default()),
            Err(EditorError::NotPendingCrop(SlotId(0)))
        ));
        assert_eq!(editor.grid().value(), vec![Payload::remote("/uploads/x.jpg")]);

        // New picks after the reload are queued as usual
        editor.pick_next("b.png", png_bytes(4, 4)).unwrap();
        assert_eq!(editor.pending_crops(), vec![SlotId(1)]);
    }

    #[test]
    fn test_seed_from_previews() {
        let mut editor = AssetEditor::new(&config(5, DropBehavior::Swap));
        let previews = ["", "/uploads/a.jpg", " ", "/uploads/b.jpg", ""].map(String::from);

        assert_eq!(editor.seed_from_previews(previews), 2);
        assert_eq!(
            editor.grid().value(),
            vec![Payload::remote("/uploads/a.jpg"), Payload::remote("/uploads/b.jpg")]
        );
        assert_eq!(editor.grid().next_available(), Some(SlotId(2)));
        assert!(editor.next_crop().is_none());

        // Nothing pre-rendered: the grid starts empty
        let mut editor = AssetEditor::new(&config(3, DropBehavior::Swap));
        assert_eq!(editor.seed_from_previews(vec![String::new(); 3]), 0);
        assert_eq!(editor.grid().next_available(), Some(SlotId(0)));
    }

    #[test]
    fn test_new_record_submission() {
        let editor = editor_with_picks(2, DropBehavior::Swap);
        let submission = editor.submission();
        assert!(submission.changes.is_empty());
        assert_eq!(submission.uploads.len(), 2);
        assert_eq!(submission.uploads[0].file.name, "img0.png");
    }

    #[test]
    fn test_existing_record_flow() {
        let mut editor = AssetEditor::new(&config(4, DropBehavior::Swap));
        editor.load_project(record());
        assert_eq!(
            editor.grid().value(),
            vec![Payload::remote("/uploads/x.jpg"), Payload::remote("/uploads/y.jpg")]
        );
        assert!(editor.next_crop().is_none());

        editor.clear_slot(SlotId(0));
        editor.pick_next("new.png", png_bytes(6, 6)).unwrap();

        let submission = editor.submission();
        assert_eq!(submission.changes[0].id, 10);
        assert!(submission.changes[0].to_delete);
        assert_eq!(submission.changes[1].order, Some(0));
        assert_eq!(submission.uploads[0].order, 1);
        assert!(submission.has_changes(editor.record()));

        editor.reset();
        assert!(editor.record().is_none());
        assert_eq!(editor.grid().fill_count(), 0);
    }
}
