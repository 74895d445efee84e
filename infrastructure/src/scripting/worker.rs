//! The engine thread: bootstrap, plugin loading, and the serve loop.
//!
//! Everything in this module runs on the dedicated scripting thread. The
//! `Lua` value never crosses the module boundary; callers only ever see
//! completion signals.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use mlua::prelude::*;
use tokio::sync::{mpsc, watch};

use vellum_application::{
    CallError, EditorAccessorPort, MessengerPort, OptionStorePort, PluginAssetStore,
};
use vellum_domain::LoadedPlugin;

use super::command_api::{CommandRegistry, register_command_api};
use super::editor_api::register_editor_api;
use super::keymap_api::{KeymapRegistry, register_keymap_api};
use super::loader::PluginLoader;
use super::options_api::register_options_api;
use super::request::ScriptCall;
use super::sandbox::apply_sandbox;

/// State shared between the spawner, the handle, and the engine thread.
pub(crate) struct WorkerContext {
    pub config_dir: PathBuf,
    pub builtin_plugins: Vec<String>,
    pub assets: Arc<dyn PluginAssetStore>,
    pub options: Arc<Mutex<dyn OptionStorePort>>,
    pub editor: Arc<Mutex<dyn EditorAccessorPort>>,
    pub messenger: Arc<dyn MessengerPort>,
    pub loaded_plugins: Arc<Mutex<Vec<LoadedPlugin>>>,
    pub keymaps: Arc<Mutex<KeymapRegistry>>,
    pub commands: Arc<Mutex<CommandRegistry>>,
}

/// The engine thread body: create the interpreter, bind the host
/// capabilities, load plugins, then serve calls until shutdown.
pub(crate) async fn run_worker(
    ctx: WorkerContext,
    mut call_rx: mpsc::Receiver<ScriptCall>,
    mut shutdown_rx: watch::Receiver<bool>,
    init_tx: std::sync::mpsc::SyncSender<Result<(), String>>,
) {
    let lua = Lua::new();

    if let Err(e) = bootstrap(&lua, &ctx) {
        let _ = init_tx.send(Err(e.to_string()));
        return;
    }

    let loader = PluginLoader::new(
        &ctx.config_dir,
        ctx.builtin_plugins.clone(),
        Arc::clone(&ctx.assets),
        Arc::clone(&ctx.messenger),
    );
    if let Ok(mut registry) = ctx.loaded_plugins.lock() {
        loader.load_all(&lua, &mut registry);
    }

    let _ = init_tx.send(Ok(()));
    tracing::debug!("scripting engine serving");

    loop {
        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
            call = call_rx.recv() => {
                match call {
                    Some(call) => {
                        let outcome = invoke(&lua, &call.function, &call.args);
                        if let Err(err) = &outcome {
                            tracing::debug!(function = %call.function, %err, "script call failed");
                        }
                        // A sender that stopped listening is not our problem.
                        let _ = call.reply.send(outcome);
                    }
                    None => break,
                }
            }
        }
    }

    tracing::debug!("scripting engine stopped, releasing interpreter");
}

/// Register the host capability bindings into the Lua global namespace.
fn bootstrap(lua: &Lua, ctx: &WorkerContext) -> LuaResult<()> {
    apply_sandbox(lua)?;
    register_editor_api(lua, Arc::clone(&ctx.editor), Arc::clone(&ctx.messenger))?;
    register_options_api(lua, Arc::clone(&ctx.options))?;
    register_keymap_api(lua, Arc::clone(&ctx.keymaps))?;
    register_command_api(lua, Arc::clone(&ctx.commands))?;
    Ok(())
}

/// Invoke a named script function with the arguments packed into a single
/// sequence table.
///
/// An absent global is `FunctionNotFound` and nothing is invoked. mlua's
/// protected call turns any runtime error inside the function body into an
/// `Execution` outcome, so a misbehaving script never takes the engine
/// thread down with it.
pub(crate) fn invoke(lua: &Lua, function: &str, args: &[String]) -> Result<(), CallError> {
    let execution = |e: LuaError| CallError::Execution(e.to_string());

    let value: LuaValue = lua.globals().get(function).map_err(execution)?;
    match value {
        LuaValue::Nil => Err(CallError::FunctionNotFound(function.to_string())),
        LuaValue::Function(callee) => {
            let packed = lua.create_table().map_err(execution)?;
            for (i, arg) in args.iter().enumerate() {
                packed.set(i + 1, arg.as_str()).map_err(execution)?;
            }
            callee.call::<()>(packed).map_err(execution)
        }
        other => Err(CallError::Execution(format!(
            "global '{}' is not callable (got {})",
            function,
            other.type_name()
        ))),
    }
}
