//! Adapter factories: script function names as host-shaped callables.
//!
//! The host's input layer wants `Fn(ViewId) -> bool` key handlers and its
//! command dispatcher wants `Fn(&[String])` command handlers. These
//! factories wrap a script function name in the matching shape, backed by
//! synchronous submission. Failures go to the messenger; nothing
//! propagates to the caller.

use std::sync::Arc;

use vellum_application::{MessengerPort, ScriptCallerPort};
use vellum_domain::ViewId;

/// Key-handler-shaped callable for a script function.
///
/// Submits synchronously with no arguments. Always answers "not handled"
/// (`false`) so the host's own binding for the key still runs; the script
/// side effect is the whole point.
pub fn key_binding_for(
    caller: Arc<dyn ScriptCallerPort>,
    messenger: Arc<dyn MessengerPort>,
    function: impl Into<String>,
) -> impl Fn(ViewId) -> bool + Send + Sync + 'static {
    let function = function.into();
    move |_view| {
        if let Err(err) = caller.call_sync(&function, Vec::new()) {
            messenger.error(&err.to_string());
        }
        false
    }
}

/// Command-handler-shaped callable for a script function.
///
/// Submits synchronously with the command's arguments.
pub fn command_for(
    caller: Arc<dyn ScriptCallerPort>,
    messenger: Arc<dyn MessengerPort>,
    function: impl Into<String>,
) -> impl Fn(&[String]) + Send + Sync + 'static {
    let function = function.into();
    move |args| {
        if let Err(err) = caller.call_sync(&function, args.to_vec()) {
            messenger.error(&err.to_string());
        }
    }
}
