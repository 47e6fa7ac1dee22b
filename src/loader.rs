//! Decoding of picked files into grid payloads.
//!
//! File inputs only accept images. A loader checks the bytes it is handed,
//! reads enough of the header to reject corrupt files, and wraps the raw
//! bytes in [`FileData`] with the detected MIME type. Full decoding happens
//! later, in the crop pipeline.

use std::io::Cursor;

use folio_ui::FileData;
use image::{ImageFormat, ImageReader};
use thiserror::Error;

/// Errors that can occur while loading a picked file.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The bytes are not in a supported image format
    #[error("Unsupported file '{name}'")]
    Unsupported {
        /// Name of the rejected file
        name: String,
    },

    /// The image header could not be read
    #[error("Failed to decode '{name}': {source}")]
    Decode {
        /// Name of the file
        name: String,
        /// Underlying decoder error
        source: image::ImageError,
    },

    /// The image reports zero width or height
    #[error("Image '{name}' is empty")]
    Empty {
        /// Name of the file
        name: String,
    },

    /// Reading the file from disk failed
    #[error("Failed to read '{name}': {source}")]
    Io {
        name: String,
        source: std::io::Error,
    },
}

/// Trait for loaders that turn picked file bytes into payload data.
pub trait AssetLoader {
    /// File extensions this loader handles (lowercase, without dots).
    fn extensions(&self) -> &'static [&'static str];

    /// Load a picked file.
    fn load(&self, name: &str, data: Vec<u8>) -> Result<FileData, LoadError>;
}

/// Raster formats accepted by the asset inputs.
const SUPPORTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Bmp,
];

/// Loader for standard raster images.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageLoader;

impl AssetLoader for ImageLoader {
    fn extensions(&self) -> &'static [&'static str] {
        &["png", "jpg", "jpeg", "gif", "webp", "bmp"]
    }

    fn load(&self, name: &str, data: Vec<u8>) -> Result<FileData, LoadError> {
        let format = match image::guess_format(&data) {
            Ok(format) if SUPPORTED_FORMATS.contains(&format) => format,
            _ => {
                return Err(LoadError::Unsupported {
                    name: name.to_string(),
                });
            }
        };

        let (width, height) = ImageReader::with_format(Cursor::new(&data), format)
            .into_dimensions()
            .map_err(|source| LoadError::Decode {
                name: name.to_string(),
                source,
            })?;
        if width == 0 || height == 0 {
            return Err(LoadError::Empty {
                name: name.to_string(),
            });
        }

        log::info!(
            "Loaded '{}': {}x{} {:?}, {} bytes",
            name,
            width,
            height,
            format,
            data.len()
        );
        Ok(FileData::new(name, format.to_mime_type(), data))
    }
}

/// Read a file from disk and load it with `loader`.
#[cfg(not(target_arch = "wasm32"))]
pub fn read_path(loader: &impl AssetLoader, path: &std::path::Path) -> Result<FileData, LoadError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let data = std::fs::read(path).map_err(|source| LoadError::Io {
        name: name.clone(),
        source,
    })?;
    loader.load(&name, data)
}

/// Check if a file name has a supported image extension.
pub fn is_image_file(name: &str) -> bool {
    std::path::Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .is_some_and(|ext| ImageLoader.extensions().contains(&ext.as_str()))
}
