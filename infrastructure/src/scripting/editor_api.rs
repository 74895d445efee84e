//! Editor host bindings: `OS`, `tabs`, `curTab`, `CurView`, `messenger`.
//!
//! ```lua
//! OS                       --> "linux"
//! #tabs()                  --> 2
//! curTab().label           --> "notes"
//! CurView().path           --> "notes.md" | nil
//! messenger:message("hi")
//! messenger:error("no")
//! ```
//!
//! `tabs`, `curTab` and `CurView` are accessors rather than live
//! references: each call takes a fresh snapshot through the editor port,
//! so scripts always observe current state without holding any of it.

use mlua::prelude::*;
use std::sync::{Arc, Mutex};

use vellum_application::{EditorAccessorPort, MessengerPort};
use vellum_domain::{Tab, View};

/// `messenger` userdata: the user message surface exposed to scripts.
struct MessengerBinding(Arc<dyn MessengerPort>);

impl LuaUserData for MessengerBinding {
    fn add_methods<M: LuaUserDataMethods<Self>>(methods: &mut M) {
        methods.add_method("message", |_, this, text: String| {
            this.0.message(&text);
            Ok(())
        });
        methods.add_method("error", |_, this, text: String| {
            this.0.error(&text);
            Ok(())
        });
    }
}

fn tab_to_lua(lua: &Lua, tab: &Tab) -> LuaResult<LuaTable> {
    let table = lua.create_table()?;
    // Lua-side indices are 1-based, matching sequence iteration.
    table.set("index", tab.index + 1)?;
    table.set("label", tab.label.as_str())?;
    table.set("view_count", tab.views.len())?;
    Ok(table)
}

fn view_to_lua(lua: &Lua, view: &View) -> LuaResult<LuaTable> {
    let table = lua.create_table()?;
    table.set("id", view.id.0)?;
    match &view.path {
        Some(path) => table.set("path", path.as_str())?,
        None => table.set("path", LuaValue::Nil)?,
    }
    table.set("lines", view.line_count)?;
    Ok(table)
}

/// Register the editor bindings as Lua globals.
pub(crate) fn register_editor_api(
    lua: &Lua,
    editor: Arc<Mutex<dyn EditorAccessorPort>>,
    messenger: Arc<dyn MessengerPort>,
) -> LuaResult<()> {
    lua.globals().set("OS", std::env::consts::OS)?;

    // tabs() -> sequence of tab tables
    {
        let editor = Arc::clone(&editor);
        let tabs_fn = lua.create_function(move |lua, ()| {
            let guard = editor
                .lock()
                .map_err(|e| LuaError::external(format!("editor lock poisoned: {e}")))?;
            let table = lua.create_table()?;
            for (i, tab) in guard.tabs().iter().enumerate() {
                table.set(i + 1, tab_to_lua(lua, tab)?)?;
            }
            Ok(table)
        })?;
        lua.globals().set("tabs", tabs_fn)?;
    }

    // curTab() -> tab table | nil
    {
        let editor = Arc::clone(&editor);
        let cur_tab_fn = lua.create_function(move |lua, ()| {
            let guard = editor
                .lock()
                .map_err(|e| LuaError::external(format!("editor lock poisoned: {e}")))?;
            match guard.active_tab() {
                Some(tab) => Ok(LuaValue::Table(tab_to_lua(lua, &tab)?)),
                None => Ok(LuaValue::Nil),
            }
        })?;
        lua.globals().set("curTab", cur_tab_fn)?;
    }

    // CurView() -> view table | nil
    {
        let editor = Arc::clone(&editor);
        let cur_view_fn = lua.create_function(move |lua, ()| {
            let guard = editor
                .lock()
                .map_err(|e| LuaError::external(format!("editor lock poisoned: {e}")))?;
            match guard.active_view() {
                Some(view) => Ok(LuaValue::Table(view_to_lua(lua, &view)?)),
                None => Ok(LuaValue::Nil),
            }
        })?;
        lua.globals().set("CurView", cur_view_fn)?;
    }

    lua.globals().set("messenger", MessengerBinding(messenger))?;

    Ok(())
}
