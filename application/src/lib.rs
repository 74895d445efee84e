//! Application layer for vellum
//!
//! This crate contains the port definitions for the scripting platform.
//! It depends only on the domain layer. Infrastructure adapters implement
//! these ports; scripts never see them directly — the host bindings in the
//! infrastructure layer translate between Lua and the ports.

pub mod ports;

// Re-export commonly used types
pub use ports::asset_store::PluginAssetStore;
pub use ports::editor_accessor::{EditorAccessorPort, EditorState};
pub use ports::messenger::MessengerPort;
pub use ports::options::{OptionStorePort, OptionValue};
pub use ports::redraw::RedrawPort;
pub use ports::script_caller::{CallError, ScriptCallerPort};
