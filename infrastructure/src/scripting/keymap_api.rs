//! `BindKey` host binding — key-to-script-function registration.
//!
//! ```lua
//! BindKey("F7", "lintCurrentFile")
//! ```
//!
//! Bindings name the target script function; they are stored as plain
//! strings and materialized into key-handler callables by the adapter
//! factories. Key descriptors are opaque here — the host's input layer
//! parses them.

use mlua::prelude::*;
use std::sync::{Arc, Mutex};

/// A key binding registered from a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeymapEntry {
    pub key: String,
    /// Name of the script function the key dispatches to.
    pub function: String,
}

/// Storage for script-registered key bindings.
pub(crate) struct KeymapRegistry {
    entries: Vec<KeymapEntry>,
}

impl KeymapRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a binding; an existing binding for the same key is
    /// replaced (last write wins).
    pub fn register(&mut self, entry: KeymapEntry) {
        self.entries.retain(|e| e.key != entry.key);
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[KeymapEntry] {
        &self.entries
    }
}

/// Register the `BindKey` global.
pub(crate) fn register_keymap_api(
    lua: &Lua,
    registry: Arc<Mutex<KeymapRegistry>>,
) -> LuaResult<()> {
    let bind_fn = lua.create_function(move |_lua, (key, function): (String, String)| {
        if key.is_empty() {
            return Err(LuaError::external("key descriptor cannot be empty"));
        }
        if function.is_empty() {
            return Err(LuaError::external("function name cannot be empty"));
        }

        let mut registry = registry
            .lock()
            .map_err(|e| LuaError::external(format!("keymap registry lock poisoned: {e}")))?;
        registry.register(KeymapEntry { key, function });
        Ok(())
    })?;
    lua.globals().set("BindKey", bind_fn)?;

    Ok(())
}
