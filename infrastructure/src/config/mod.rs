//! Configuration: option storage and config-directory discovery.

mod store;

pub use store::OptionStore;

use std::path::PathBuf;

/// Platform config directory for vellum (`~/.config/vellum` on Linux).
///
/// Falls back to the current directory when the platform reports no
/// config location.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vellum")
}
