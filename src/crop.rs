//! Crop and rotate pipeline for freshly picked images.
//!
//! A picked image is shown in the crop dialog before it is accepted. The
//! result of the dialog is a [`CropRequest`]; [`crop`] turns the slot's source
//! payload into the processed PNG payload written back into the grid.

use std::io::Cursor;
use std::path::Path;

use folio_ui::{FileData, Payload};
use image::{DynamicImage, ImageFormat};
use thiserror::Error;

use crate::constants::MAX_ROTATION_DEGREES;

/// Errors that can occur while cropping.
#[derive(Error, Debug)]
pub enum CropError {
    /// Existing server assets are not re-cropped
    #[error("Cannot crop remote asset '{0}'")]
    RemoteSource(String),

    /// Decoding or encoding failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// The crop rectangle lies outside the image
    #[error("Crop rectangle is empty")]
    EmptyCrop,
}

/// Rotation applied before cropping, in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Quarter,
    Half,
    ThreeQuarter,
}

impl Rotation {
    /// Snap a rotate input value to the nearest quarter turn.
    ///
    /// The input is clamped to `0..=360` first, like the dialog's input field.
    pub fn from_degrees(degrees: i32) -> Self {
        let clamped = degrees.clamp(0, MAX_ROTATION_DEGREES);
        match ((clamped + 45) / 90) % 4 {
            1 => Rotation::Quarter,
            2 => Rotation::Half,
            3 => Rotation::ThreeQuarter,
            _ => Rotation::None,
        }
    }

    fn apply(self, img: DynamicImage) -> DynamicImage {
        match self {
            Rotation::None => img,
            Rotation::Quarter => img.rotate90(),
            Rotation::Half => img.rotate180(),
            Rotation::ThreeQuarter => img.rotate270(),
        }
    }
}

/// Crop box chosen in the dialog, in pixels of the rotated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRequest {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub rotate_degrees: i32,
}

impl Default for CropRequest {
    /// The whole image, unrotated.
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: u32::MAX,
            height: u32::MAX,
            rotate_degrees: 0,
        }
    }
}

/// Crop `source` and re-encode it as PNG.
///
/// The crop width is raised to `min_width` where the image allows it; the
/// rectangle is clipped to the image bounds.
pub fn crop(source: &Payload, request: &CropRequest, min_width: u32) -> Result<Payload, CropError> {
    let data = match source {
        Payload::Data(data) => data,
        Payload::Remote(url) => return Err(CropError::RemoteSource(url.clone())),
    };

    let img = image::load_from_memory(&data.bytes)?;
    let img = Rotation::from_degrees(request.rotate_degrees).apply(img);
    let (img_width, img_height) = (img.width(), img.height());

    if request.x >= img_width || request.y >= img_height {
        return Err(CropError::EmptyCrop);
    }
    let width = request.width.max(min_width).min(img_width - request.x);
    let height = request.height.min(img_height - request.y);
    if width == 0 || height == 0 {
        return Err(CropError::EmptyCrop);
    }

    let cropped = img.crop_imm(request.x, request.y, width, height);
    let mut bytes = Vec::new();
    cropped.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

    let name = Path::new(&data.name)
        .with_extension("png")
        .to_string_lossy()
        .into_owned();
    log::debug!(
        "Cropped '{}' to {}x{} at ({}, {})",
        data.name,
        width,
        height,
        request.x,
        request.y
    );
    Ok(Payload::Data(FileData::new(name, "image/png", bytes)))
}
