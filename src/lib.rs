//! folio - asset editing for the portfolio and blog admin
//!
//! Controller logic behind the admin editors' image grids: decoding picked
//! files, the crop pipeline, and building the payload sent to the server.
//! The grid component itself lives in `folio_ui`.

pub mod config;
pub mod constants;
pub mod crop;
pub mod editor;
pub mod loader;
pub mod logging;
pub mod submission;

pub use config::{EditorConfig, LogLevel};
pub use editor::{AssetEditor, EditorError};

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
