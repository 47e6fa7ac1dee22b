//! Configuration file support for the folio editors.
//!
//! Settings are stored as JSON: on disk under the user's config directory for
//! native builds, in `localStorage` for the browser build.

use folio_ui::DropBehavior;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_FILES_FIELD, DEFAULT_MIN_CROP_WIDTH, DEFAULT_SLOT_COUNT, DEFAULT_UPLOADS_PREFIX,
};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        self.to_level().to_level_filter()
    }

    /// Convert to log crate's Level.
    pub fn to_level(&self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Editor configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Number of slots in the asset grid
    #[serde(default = "default_slot_count")]
    pub slot_count: usize,

    /// What dropping one slot onto another does
    #[serde(default)]
    pub drop_behavior: DropBehavior,

    /// Minimum crop box width in pixels
    #[serde(default = "default_min_crop_width")]
    pub min_crop_width: u32,

    /// URL prefix for existing server assets
    #[serde(default = "default_uploads_prefix")]
    pub uploads_prefix: String,

    /// Multipart field name for uploaded files
    #[serde(default = "default_files_field")]
    pub files_field: String,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_slot_count() -> usize {
    DEFAULT_SLOT_COUNT
}

fn default_min_crop_width() -> u32 {
    DEFAULT_MIN_CROP_WIDTH
}

fn default_uploads_prefix() -> String {
    DEFAULT_UPLOADS_PREFIX.to_string()
}

fn default_files_field() -> String {
    DEFAULT_FILES_FIELD.to_string()
}

impl EditorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            slot_count: default_slot_count(),
            drop_behavior: DropBehavior::default(),
            min_crop_width: default_min_crop_width(),
            uploads_prefix: default_uploads_prefix(),
            files_field: default_files_field(),
            log_level: LogLevel::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize and validate configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }
        if config.slot_count == 0 {
            return Err(ConfigError::Invalid("slot_count must be at least 1".to_string()));
        }
        if !config.uploads_prefix.ends_with('/') {
            return Err(ConfigError::Invalid(format!(
                "uploads_prefix '{}' must end with '/'",
                config.uploads_prefix
            )));
        }
        Ok(config)
    }

    /// Parse stored JSON, logging instead of failing so callers fall back to defaults.
    fn from_stored(json: &str, origin: &dyn std::fmt::Display) -> Option<Self> {
        match Self::from_json(json) {
            Ok(config) => {
                log::info!("Loaded editor configuration from {}", origin);
                Some(config)
            }
            Err(e) => {
                log::warn!("Ignoring editor configuration from {}: {}", origin, e);
                None
            }
        }
    }

    pub fn default_filename() -> &'static str {
        "folio-config.json"
    }

    /// `<config dir>/folio/folio-config.json`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|dir| dir.join("folio").join(Self::default_filename()))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        Self::load_from_path(&Self::default_path()?)
    }

    /// Load configuration from `path`; `None` if missing or invalid.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Option<Self> {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_stored(&json, &path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No editor configuration at {}", path.display());
                None
            }
            Err(e) => {
                log::warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Write the configuration to the default path and return where it went.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<std::path::PathBuf, ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::Storage("no config directory on this platform".to_string())
        })?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("Saved editor configuration to {}", path.display());
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "folio-config";

    #[cfg(target_arch = "wasm32")]
    fn local_storage() -> Result<web_sys::Storage, ConfigError> {
        web_sys::window()
            .ok_or_else(|| ConfigError::Storage("no window".to_string()))?
            .local_storage()
            .map_err(|e| ConfigError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| ConfigError::Storage("localStorage unavailable".to_string()))
    }

    /// Load configuration saved in `localStorage`; `None` if missing or invalid.
    #[cfg(target_arch = "wasm32")]
    pub fn load_from_local_storage() -> Option<Self> {
        let storage = Self::local_storage()
            .inspect_err(|e| log::warn!("{}", e))
            .ok()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => Self::from_stored(&json, &"localStorage"),
            Ok(None) => None,
            Err(e) => {
                log::warn!("Failed to read localStorage: {:?}", e);
                None
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save_to_local_storage(&self) -> Result<(), ConfigError> {
        Self::local_storage()?
            .set_item(Self::STORAGE_KEY, &self.to_json()?)
            .map_err(|e| ConfigError::Storage(format!("{:?}", e)))?;
        log::info!("Saved editor configuration to localStorage");
        Ok(())
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// A setting the editor cannot work with
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// localStorage or config directory unavailable
    #[error("Storage error: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.slot_count, 6);
        assert_eq!(config.drop_behavior, DropBehavior::Swap);
        assert_eq!(config.min_crop_width, 320);
        assert_eq!(config.uploads_prefix, "/uploads/");
        assert_eq!(config.files_field, "files[]");
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = EditorConfig::new();
        config.slot_count = 9;
        config.drop_behavior = DropBehavior::ShiftInsert;
        config.log_level = LogLevel::Debug;

        let json = config.to_json().unwrap();
        assert!(json.contains("\"shift_insert\""));
        assert!(json.contains("\"debug\""));
        assert_eq!(EditorConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = EditorConfig::from_json(r#"{ "version": 1, "slot_count": 3 }"#).unwrap();
        assert_eq!(config.slot_count, 3);
        assert_eq!(config.min_crop_width, DEFAULT_MIN_CROP_WIDTH);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_newer_version_rejected() {
        let err = EditorConfig::from_json(r#"{ "version": 99 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::VersionTooNew {
                file_version: 99,
                supported_version: CONFIG_VERSION
            }
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            EditorConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert!(matches!(
            EditorConfig::from_json(r#"{ "version": 1, "slot_count": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{ "version": 1, "uploads_prefix": "/media" }"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_save_and_load_path() {
        let path = std::env::temp_dir()
            .join(format!("folio-config-test-{}", std::process::id()))
            .join(EditorConfig::default_filename());

        let mut config = EditorConfig::new();
        config.slot_count = 4;
        config.save_to_path(&path).unwrap();

        let loaded = EditorConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.slot_count, 4);

        std::fs::write(&path, r#"{ "version": 1, "slot_count": 0 }"#).unwrap();
        assert_eq!(EditorConfig::load_from_path(&path), None);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
        assert_eq!(EditorConfig::load_from_path(&path), None);
    }

    #[test]
    fn test_log_level_filter() {
        assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::Trace.to_level(), log::Level::Trace);
    }
}
