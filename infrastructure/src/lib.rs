//! Infrastructure layer for vellum
//!
//! This crate contains the adapters behind the application-layer ports:
//! the Lua scripting engine (a dedicated thread owning the interpreter),
//! the plugin loader, the host bindings injected into scripts, the
//! embedded built-in plugin bundles, and the option store.

pub mod assets;
pub mod config;
pub mod scripting;

// Re-export commonly used types
pub use assets::{DEFAULT_BUILTIN_PLUGINS, EmbeddedAssets};
pub use config::{OptionStore, default_config_dir};
pub use scripting::{
    CommandEntry, EngineError, EngineOptions, KeymapEntry, ScriptingHandle,
    adapter::{command_for, key_binding_for},
    spawn_engine,
};
