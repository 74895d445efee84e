//! `GetOption` / `AddOption` host bindings.
//!
//! Bridges scripts to `OptionStorePort`:
//!
//! ```lua
//! GetOption("tabsize")          --> 4
//! GetOption("no_such_option")   --> nil
//! AddOption("linter", true)
//! ```
//!
//! `GetOption` of an unknown key returns `nil` rather than raising, since
//! plugins probe for their options before registering defaults.

use mlua::prelude::*;
use std::sync::{Arc, Mutex};

use vellum_application::{OptionStorePort, OptionValue};

/// Register the option bindings as Lua globals.
pub(crate) fn register_options_api(
    lua: &Lua,
    options: Arc<Mutex<dyn OptionStorePort>>,
) -> LuaResult<()> {
    // GetOption(key) -> value | nil
    {
        let store = Arc::clone(&options);
        let get_fn = lua.create_function(move |lua, key: String| {
            let guard = store
                .lock()
                .map_err(|e| LuaError::external(format!("option store lock poisoned: {e}")))?;
            match guard.option_get(&key) {
                Some(value) => push_option_value(lua, value),
                None => Ok(LuaValue::Nil),
            }
        })?;
        lua.globals().set("GetOption", get_fn)?;
    }

    // AddOption(key, value)
    {
        let store = Arc::clone(&options);
        let add_fn = lua.create_function(move |_lua, (key, value): (String, LuaValue)| {
            let value = lua_to_option_value(value)?;
            let mut guard = store
                .lock()
                .map_err(|e| LuaError::external(format!("option store lock poisoned: {e}")))?;
            guard.option_add(&key, value);
            Ok(())
        })?;
        lua.globals().set("AddOption", add_fn)?;
    }

    Ok(())
}

/// Convert an `OptionValue` into a Lua value within a Lua context.
fn push_option_value(lua: &Lua, value: OptionValue) -> LuaResult<LuaValue> {
    match value {
        OptionValue::String(s) => Ok(LuaValue::String(lua.create_string(&s)?)),
        OptionValue::Integer(n) => Ok(LuaValue::Integer(n)),
        OptionValue::Boolean(b) => Ok(LuaValue::Boolean(b)),
    }
}

/// Convert a Lua value to an `OptionValue`.
fn lua_to_option_value(value: LuaValue) -> LuaResult<OptionValue> {
    match value {
        LuaValue::String(s) => Ok(OptionValue::String(s.to_str()?.to_string())),
        LuaValue::Integer(n) => Ok(OptionValue::Integer(n)),
        LuaValue::Number(n) => Ok(OptionValue::Integer(n as i64)),
        LuaValue::Boolean(b) => Ok(OptionValue::Boolean(b)),
        other => Err(LuaError::external(format!(
            "unsupported option value type: {}",
            other.type_name()
        ))),
    }
}
