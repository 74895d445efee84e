//! Lua scripting platform
//!
//! One dedicated engine thread owns the Lua interpreter for the life of
//! the process; every other thread talks to it through [`ScriptingHandle`].
//!
//! # Modules
//!
//! - `engine` — `EngineOptions` + `spawn_engine`
//! - `worker` — the engine thread: bootstrap, plugin loading, serve loop
//! - `handle` — sync/async call submission, registry snapshots, shutdown
//! - `request` — the call request flowing to the engine thread
//! - `loader` — external + built-in plugin loading
//! - `options_api` / `keymap_api` / `command_api` / `editor_api` — host
//!   bindings injected into the Lua global namespace
//! - `sandbox` — C module blocking
//! - `adapter` — key-handler / command-handler factories over sync calls

pub mod adapter;
mod command_api;
mod editor_api;
mod engine;
mod handle;
mod keymap_api;
mod loader;
mod options_api;
mod request;
mod sandbox;
mod worker;

pub use command_api::CommandEntry;
pub use engine::{EngineError, EngineOptions, spawn_engine};
pub use handle::ScriptingHandle;
pub use keymap_api::KeymapEntry;
