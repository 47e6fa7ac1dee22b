//! Global constants for the folio editors

/// Default number of slots in an asset grid
pub const DEFAULT_SLOT_COUNT: usize = 6;

/// Minimum crop box width in pixels
pub const DEFAULT_MIN_CROP_WIDTH: u32 = 320;

/// URL prefix under which the server exposes stored assets
pub const DEFAULT_UPLOADS_PREFIX: &str = "/uploads/";

/// Multipart field name for uploaded files
pub const DEFAULT_FILES_FIELD: &str = "files[]";

/// Upper bound of the rotate input, in degrees
pub const MAX_ROTATION_DEGREES: i32 = 360;

/// Selector matching slot placeholders inside a grid container
pub const ITEM_SELECTOR: &str = ".assets__item";

/// Class set on a placeholder while its slot holds an asset
pub const FILLED_CLASS: &str = "assets__item--is-filled";

/// Class set on a placeholder while a drag hovers over it
pub const HOVER_CLASS: &str = "assets__item--hover";
