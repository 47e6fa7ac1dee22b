//! Asset payload types held by grid slots.

use std::fmt;
use std::sync::Arc;

/// Decoded contents of a locally picked file.
#[derive(Clone, PartialEq, Eq)]
pub struct FileData {
    /// Original file name
    pub name: String,
    /// MIME type detected while decoding (e.g. `image/png`)
    pub mime: String,
    /// Raw file bytes, shared between clones
    pub bytes: Arc<[u8]>,
}

impl FileData {
    /// Create file data from a name, MIME type and raw bytes.
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// Size of the file contents in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the file has no contents.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for FileData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileData")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// The in-memory representation of an attached asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Reference to an asset that already exists on the server
    Remote(String),
    /// Locally picked or processed file data
    Data(FileData),
}

impl Payload {
    /// Shorthand for a remote payload.
    pub fn remote(url: impl Into<String>) -> Self {
        Payload::Remote(url.into())
    }

    /// The server URL, if this payload references an existing asset.
    pub fn as_remote(&self) -> Option<&str> {
        match self {
            Payload::Remote(url) => Some(url),
            Payload::Data(_) => None,
        }
    }

    /// The file data, if this payload holds local bytes.
    pub fn as_data(&self) -> Option<&FileData> {
        match self {
            Payload::Data(data) => Some(data),
            Payload::Remote(_) => None,
        }
    }
}

/// What a filled slot holds.
///
/// `source` is displayed as soon as the asset lands in the slot. `processed`
/// is the replacement the controller writes back after post-processing
/// (cropping); it takes precedence when the grid value is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Payload shown as the slot preview
    pub source: Payload,
    /// Replacement payload installed by the controller
    pub processed: Option<Payload>,
}

impl Asset {
    /// Create an asset with no processed replacement.
    pub fn new(source: Payload) -> Self {
        Self {
            source,
            processed: None,
        }
    }

    /// The payload that should be submitted for this asset.
    pub fn submitted(&self) -> &Payload {
        self.processed.as_ref().unwrap_or(&self.source)
    }

    /// The payload that should be displayed as preview.
    pub fn preview(&self) -> &Payload {
        self.submitted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submitted_prefers_processed() {
        let mut asset = Asset::new(Payload::remote("/uploads/a.png"));
        assert_eq!(asset.submitted(), &Payload::remote("/uploads/a.png"));

        let cropped = Payload::Data(FileData::new("a.png", "image/png", vec![1u8, 2, 3]));
        asset.processed = Some(cropped.clone());
        assert_eq!(asset.submitted(), &cropped);
        assert_eq!(asset.source, Payload::remote("/uploads/a.png"));
    }

    #[test]
    fn test_file_data_debug_hides_bytes() {
        let data = FileData::new("big.jpg", "image/jpeg", vec![0u8; 4096]);
        let debug = format!("{:?}", data);
        assert!(debug.contains("len: 4096"));
        assert!(!debug.contains("[0, 0"));
    }
}
