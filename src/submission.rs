//! Building the server payload from the grid value.
//!
//! New records upload every grid payload as a file part. Existing records
//! additionally reconcile the assets the server already stores: each one is
//! either given its new position or marked for deletion.

use folio_ui::{FileData, Payload};
use serde::{Deserialize, Serialize};

/// An asset the server already stores for a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerAsset {
    pub id: u64,
    /// Path relative to the uploads prefix
    pub path: String,
    #[serde(default)]
    pub order: usize,
}

/// A record (portfolio project or blog article) being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub assets: Vec<ServerAsset>,
}

impl ProjectRecord {
    /// Grid payloads for the record's assets, in stored order.
    pub fn asset_payloads(&self, uploads_prefix: &str) -> Vec<Payload> {
        let mut assets: Vec<&ServerAsset> = self.assets.iter().collect();
        assets.sort_by_key(|asset| asset.order);
        assets
            .into_iter()
            .map(|asset| Payload::remote(format!("{}{}", uploads_prefix, asset.path)))
            .collect()
    }
}

/// New position or deletion of an existing server asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetChange {
    pub id: u64,
    pub path: String,
    /// Position in the grid value, `None` when removed
    pub order: Option<usize>,
    pub to_delete: bool,
}

/// A file to upload as a multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Multipart field name
    pub field: String,
    /// Position in the grid value
    pub order: usize,
    pub file: FileData,
}

/// Everything the editor sends for its asset grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub uploads: Vec<FilePart>,
    pub changes: Vec<AssetChange>,
}

impl Submission {
    /// Submission for a record that does not exist on the server yet.
    pub fn for_new(value: &[Payload], files_field: &str) -> Self {
        Self {
            uploads: upload_parts(value, files_field),
            changes: Vec::new(),
        }
    }

    /// Submission for an existing record.
    pub fn for_existing(
        record: &ProjectRecord,
        value: &[Payload],
        uploads_prefix: &str,
        files_field: &str,
    ) -> Self {
        let changes = record
            .assets
            .iter()
            .map(|asset| {
                let url = format!("{}{}", uploads_prefix, asset.path);
                let order = value
                    .iter()
                    .position(|payload| payload.as_remote() == Some(url.as_str()));
                if order.is_none() {
                    log::debug!("Asset {} ({}) removed from record {}", asset.id, asset.path, record.id);
                }
                AssetChange {
                    id: asset.id,
                    path: asset.path.clone(),
                    order,
                    to_delete: order.is_none(),
                }
            })
            .collect();

        Self {
            uploads: upload_parts(value, files_field),
            changes,
        }
    }

    /// True if anything about the stored assets changes.
    pub fn has_changes(&self, record: Option<&ProjectRecord>) -> bool {
        if !self.uploads.is_empty() {
            return true;
        }
        let Some(record) = record else {
            return false;
        };
        self.changes.iter().any(|change| {
            change.to_delete
                || record
                    .assets
                    .iter()
                    .find(|asset| asset.id == change.id)
                    .is_some_and(|asset| Some(asset.order) != change.order)
        })
    }

    /// Serialize the asset changes for the request body.
    pub fn changes_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.changes)
    }
}

fn upload_parts(value: &[Payload], files_field: &str) -> Vec<FilePart> {
    value
        .iter()
        .enumerate()
        .filter_map(|(order, payload)| {
            payload.as_data().map(|file| FilePart {
                field: files_field.to_string(),
                order,
                file: file.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ProjectRecord {
        ProjectRecord {
            id: 7,
            name: "Harbour".to_string(),
            assets: vec![
                ServerAsset {
                    id: 1,
                    path: "a.jpg".to_string(),
                    order: 0,
                },
                ServerAsset {
                    id: 2,
                    path: "b.jpg".to_string(),
                    order: 1,
                },
                ServerAsset {
                    id: 3,
                    path: "c.jpg".to_string(),
                    order: 2,
                },
            ],
        }
    }

    fn file(name: &str) -> Payload {
        Payload::Data(FileData::new(name, "image/png", vec![0u8; 4]))
    }

    #[test]
    fn test_asset_payloads_sorted_by_order() {
        let mut record = record();
        record.assets.reverse();
        assert_eq!(
            record.asset_payloads("/uploads/"),
            vec![
                Payload::remote("/uploads/a.jpg"),
                Payload::remote("/uploads/b.jpg"),
                Payload::remote("/uploads/c.jpg"),
            ]
        );
    }

    #[test]
    fn test_new_record_uploads_in_order() {
        let value = vec![file("one.png"), file("two.png")];
        let submission = Submission::for_new(&value, "files[]");

        assert!(submission.changes.is_empty());
        let names: Vec<_> = submission.uploads.iter().map(|p| p.file.name.as_str()).collect();
        assert_eq!(names, vec!["one.png", "two.png"]);
        assert_eq!(submission.uploads[1].order, 1);
        assert_eq!(submission.uploads[0].field, "files[]");
    }

    #[test]
    fn test_existing_record_reconciles() {
        let value = vec![
            Payload::remote("/uploads/c.jpg"),
            file("new.png"),
            Payload::remote("/uploads/a.jpg"),
        ];
        let submission = Submission::for_existing(&record(), &value, "/uploads/", "files[]");

        assert_eq!(
            submission.changes,
            vec![
                AssetChange {
                    id: 1,
                    path: "a.jpg".to_string(),
                    order: Some(2),
                    to_delete: false,
                },
                AssetChange {
                    id: 2,
                    path: "b.jpg".to_string(),
                    order: None,
                    to_delete: true,
                },
                AssetChange {
                    id: 3,
                    path: "c.jpg".to_string(),
                    order: Some(0),
                    to_delete: false,
                },
            ]
        );
        assert_eq!(submission.uploads.len(), 1);
        assert_eq!(submission.uploads[0].order, 1);
        assert!(submission.has_changes(Some(&record())));
    }

    #[test]
    fn test_unchanged_record_has_no_changes() {
        let record = record();
        let value = record.asset_payloads("/uploads/");
        let submission = Submission::for_existing(&record, &value, "/uploads/", "files[]");
        assert!(!submission.has_changes(Some(&record)));
    }

    #[test]
    fn test_changes_json() {
        let value = vec![Payload::remote("/uploads/a.jpg")];
        let json = Submission::for_existing(&record(), &value, "/uploads/", "files[]")
            .changes_json()
            .unwrap();
        let parsed: Vec<AssetChange> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 3);
        assert!(json.contains("\"to_delete\":true"));
    }
}
