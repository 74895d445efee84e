//! Lua sandbox — blocks C module loading.
//!
//! Plugin code is trusted (the user installed it), but C extension
//! modules are blocked: a native module compiled against a different Lua
//! ABI crashes the whole editor. Pure-Lua `require` keeps working.

use mlua::prelude::*;

/// Apply sandbox restrictions to the interpreter.
///
/// Blocks `package.loadlib` and empties `package.cpath`, so no `.so` /
/// `.dll` can be pulled in. The standard library stays available.
pub(crate) fn apply_sandbox(lua: &Lua) -> LuaResult<()> {
    lua.load(
        r#"
        package.loadlib = nil
        package.cpath = ''
    "#,
    )
    .exec()
}
