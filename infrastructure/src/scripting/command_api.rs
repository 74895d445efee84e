//! `MakeCommand` host binding — command-name-to-script-function registration.
//!
//! ```lua
//! MakeCommand("lint", "lintCurrentFile")
//! ```
//!
//! Commands, like key bindings, name their target function; the host's
//! command dispatcher materializes them through the adapter factories and
//! passes the user's arguments along.

use mlua::prelude::*;
use std::sync::{Arc, Mutex};

/// A command registered from a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEntry {
    pub name: String,
    /// Name of the script function the command dispatches to.
    pub function: String,
}

/// Storage for script-registered commands.
pub(crate) struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a command; an existing command with the same name is
    /// replaced (last write wins).
    pub fn register(&mut self, entry: CommandEntry) {
        self.entries.retain(|e| e.name != entry.name);
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }
}

/// Register the `MakeCommand` global.
pub(crate) fn register_command_api(
    lua: &Lua,
    registry: Arc<Mutex<CommandRegistry>>,
) -> LuaResult<()> {
    let make_fn = lua.create_function(move |_lua, (name, function): (String, String)| {
        if name.is_empty() {
            return Err(LuaError::external("command name cannot be empty"));
        }
        if name.contains(' ') {
            return Err(LuaError::external("command name cannot contain spaces"));
        }
        if function.is_empty() {
            return Err(LuaError::external("function name cannot be empty"));
        }

        let mut registry = registry
            .lock()
            .map_err(|e| LuaError::external(format!("command registry lock poisoned: {e}")))?;
        registry.register(CommandEntry { name, function });
        Ok(())
    })?;
    lua.globals().set("MakeCommand", make_fn)?;

    Ok(())
}
