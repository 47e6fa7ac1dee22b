//! Logger setup for native and browser builds.

use crate::config::LogLevel;

/// Install the global logger at `level`.
///
/// Uses `env_logger` natively (so `RUST_LOG` still overrides the level) and
/// the browser console on WASM. Calling this twice keeps the first logger.
pub fn init(level: LogLevel) {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let result = env_logger::Builder::new()
            .filter_level(level.to_level_filter())
            .parse_default_env()
            .try_init();
        if result.is_err() {
            log::debug!("Logger already initialized");
        }
    }

    #[cfg(target_arch = "wasm32")]
    {
        if console_log::init_with_level(level.to_level()).is_err() {
            log::debug!("Logger already initialized");
        }
    }
}
