//! Engine spawn: brings the interpreter thread up and hands back a handle.
//!
//! The interpreter is created *inside* the spawned thread and never leaves
//! it. `spawn_engine` blocks until the thread has finished bootstrapping
//! (host bindings registered, plugins loaded) so callers get a handle that
//! is immediately serviceable.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::thread;

use tokio::sync::{mpsc, watch};

use vellum_application::{
    EditorAccessorPort, MessengerPort, OptionStorePort, PluginAssetStore, RedrawPort,
};

use super::command_api::CommandRegistry;
use super::handle::ScriptingHandle;
use super::keymap_api::KeymapRegistry;
use super::worker::{WorkerContext, run_worker};

/// Request queue bound. A producer blocks when a burst fills the queue.
const CALL_QUEUE_CAPACITY: usize = 100;

/// Errors from spawning the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to spawn engine thread: {0}")]
    SpawnFailed(#[from] std::io::Error),

    #[error("engine bootstrap failed: {0}")]
    Bootstrap(String),

    #[error("engine channel closed")]
    ChannelClosed,
}

/// Everything the engine thread needs, injected at spawn time.
pub struct EngineOptions {
    /// Directory holding `plugins/` and `settings.toml`.
    pub config_dir: std::path::PathBuf,
    /// Ordered built-in plugin identifiers, loaded after external plugins.
    pub builtin_plugins: Vec<String>,
    pub assets: Arc<dyn PluginAssetStore>,
    pub options: Arc<Mutex<dyn OptionStorePort>>,
    pub editor: Arc<Mutex<dyn EditorAccessorPort>>,
    pub messenger: Arc<dyn MessengerPort>,
    pub redraw: Arc<dyn RedrawPort>,
}

/// Spawn the scripting engine thread and wait for it to finish bootstrap.
///
/// Plugin load failures are non-fatal (reported through the messenger);
/// only a failure to stand the interpreter itself up is an error here.
pub fn spawn_engine(options: EngineOptions) -> Result<ScriptingHandle, EngineError> {
    let (call_tx, call_rx) = mpsc::channel(CALL_QUEUE_CAPACITY);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (init_tx, init_rx) = std::sync::mpsc::sync_channel::<Result<(), String>>(1);

    let loaded_plugins = Arc::new(Mutex::new(Vec::new()));
    let keymaps = Arc::new(Mutex::new(KeymapRegistry::new()));
    let commands = Arc::new(Mutex::new(CommandRegistry::new()));

    let ctx = WorkerContext {
        config_dir: options.config_dir,
        builtin_plugins: options.builtin_plugins,
        assets: options.assets,
        options: options.options,
        editor: options.editor,
        messenger: options.messenger,
        loaded_plugins: Arc::clone(&loaded_plugins),
        keymaps: Arc::clone(&keymaps),
        commands: Arc::clone(&commands),
    };

    let thread_handle = thread::Builder::new()
        .name("vellum-scripting".to_string())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    let _ = init_tx.send(Err(format!("failed to build engine runtime: {e}")));
                    return;
                }
            };
            rt.block_on(run_worker(ctx, call_rx, shutdown_rx, init_tx));
        })?;

    match init_rx.recv() {
        Ok(Ok(())) => {}
        Ok(Err(message)) => {
            let _ = thread_handle.join();
            return Err(EngineError::Bootstrap(message));
        }
        Err(_) => {
            let _ = thread_handle.join();
            return Err(EngineError::ChannelClosed);
        }
    }

    tracing::debug!("scripting engine ready");
    Ok(ScriptingHandle {
        call_tx,
        shutdown_tx,
        terminated: AtomicBool::new(false),
        thread_handle: Mutex::new(Some(thread_handle)),
        redraw: options.redraw,
        loaded_plugins,
        keymaps,
        commands,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    use vellum_application::{CallError, OptionValue};
    use vellum_domain::PluginOrigin;

    use crate::assets::{DEFAULT_BUILTIN_PLUGINS, EmbeddedAssets};
    use crate::config::OptionStore;
    use vellum_application::EditorState;

    struct RecordingMessenger(Mutex<Vec<String>>);

    impl RecordingMessenger {
        fn new() -> Self {
            Self(Mutex::new(Vec::new()))
        }

        fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    impl MessengerPort for RecordingMessenger {
        fn message(&self, text: &str) {
            self.0.lock().unwrap().push(format!("message: {text}"));
        }

        fn error(&self, text: &str) {
            self.0.lock().unwrap().push(format!("error: {text}"));
        }
    }

    struct CountingRedraw(AtomicUsize);

    impl CountingRedraw {
        fn new() -> Self {
            Self(AtomicUsize::new(0))
        }

        fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl RedrawPort for CountingRedraw {
        fn request_redraw(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct StubAssets(HashMap<String, String>);

    impl PluginAssetStore for StubAssets {
        fn resolve(&self, name: &str) -> Option<String> {
            self.0.get(name).cloned()
        }
    }

    struct TestEngine {
        handle: ScriptingHandle,
        options: Arc<Mutex<OptionStore>>,
        messenger: Arc<RecordingMessenger>,
        redraw: Arc<CountingRedraw>,
    }

    fn spawn_test_engine(config_dir: &Path) -> TestEngine {
        spawn_test_engine_with_builtins(config_dir, Vec::new(), StubAssets(HashMap::new()))
    }

    fn spawn_test_engine_with_builtins(
        config_dir: &Path,
        builtins: Vec<String>,
        assets: StubAssets,
    ) -> TestEngine {
        let options = Arc::new(Mutex::new(OptionStore::with_defaults()));
        let messenger = Arc::new(RecordingMessenger::new());
        let redraw = Arc::new(CountingRedraw::new());

        let handle = spawn_engine(EngineOptions {
            config_dir: config_dir.to_path_buf(),
            builtin_plugins: builtins,
            assets: Arc::new(assets),
            options: Arc::clone(&options) as Arc<Mutex<dyn OptionStorePort>>,
            editor: Arc::new(Mutex::new(EditorState::with_scratch())),
            messenger: Arc::clone(&messenger) as Arc<dyn MessengerPort>,
            redraw: Arc::clone(&redraw) as Arc<dyn RedrawPort>,
        })
        .unwrap();

        TestEngine {
            handle,
            options,
            messenger,
            redraw,
        }
    }

    fn write_plugin(config_dir: &Path, name: &str, source: &str) {
        let dir = config_dir.join("plugins").join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("{name}.lua")), source).unwrap();
    }

    #[test]
    fn test_sync_call_succeeds_and_redraws_once() {
        let dir = tempfile::tempdir().unwrap();
        write_plugin(dir.path(), "hello", "function greet() end");

        let engine = spawn_test_engine(dir.path());
        engine.handle.call_sync("greet", Vec::new()).unwrap();
        assert_eq!(engine.redraw.count(), 1);
    }

    #[test]
    fn test_sync_call_unknown_function_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let engine = spawn_test_engine(dir.path());

        let err = engine.handle.call_sync("missing", Vec::new()).unwrap_err();
        assert_eq!(err, CallError::FunctionNotFound("missing".to_string()));
        // The completed (failed) submission still requests a redraw.
        assert_eq!(engine.redraw.count(), 1);
    }

    #[test]
    fn test_args_arrive_as_one_sequence() {
        let dir = tempfile::tempdir().unwrap();
        write_plugin(
            dir.path(),
            "args",
            r#"
function remember(args)
    AddOption("last_call", args[1] .. ":" .. tostring(#args))
end
"#,
        );

        let engine = spawn_test_engine(dir.path());
        engine
            .handle
            .call_sync("remember", vec!["alpha".to_string(), "beta".to_string()])
            .unwrap();

        let value = engine.options.lock().unwrap().option_get("last_call");
        assert_eq!(value, Some(OptionValue::String("alpha:2".to_string())));
    }

    #[test]
    fn test_script_error_becomes_execution_failure() {
        let dir = tempfile::tempdir().unwrap();
        write_plugin(dir.path(), "boom", r#"function boom() error("kaboom") end"#);

        let engine = spawn_test_engine(dir.path());
        let err = engine.handle.call_sync("boom", Vec::new()).unwrap_err();
        match err {
            CallError::Execution(message) => assert!(message.contains("kaboom")),
            other => panic!("expected execution failure, got {other:?}"),
        }

        // The engine keeps serving on the same interpreter afterwards.
        let err = engine.handle.call_sync("boom", Vec::new()).unwrap_err();
        assert!(matches!(err, CallError::Execution(_)));
    }

    #[test]
    fn test_non_function_global_is_a_failure_not_a_crash() {
        let dir = tempfile::tempdir().unwrap();
        write_plugin(dir.path(), "data", "answer = 42");

        let engine = spawn_test_engine(dir.path());
        let err = engine.handle.call_sync("answer", Vec::new()).unwrap_err();
        assert!(matches!(err, CallError::Execution(_)));
    }

    #[test]
    fn test_sequential_callers_each_get_their_own_outcome() {
        let dir = tempfile::tempdir().unwrap();
        write_plugin(
            dir.path(),
            "mixed",
            r#"
function ok() end
function bad() error("expected failure") end
"#,
        );

        let engine = spawn_test_engine(dir.path());
        let handle = Arc::new(engine.handle);

        let expectations = ["ok", "bad", "ok", "bad", "ok"];
        for function in expectations {
            let handle = Arc::clone(&handle);
            let outcome = std::thread::spawn(move || handle.call_sync(function, Vec::new()))
                .join()
                .unwrap();
            match function {
                "ok" => assert!(outcome.is_ok()),
                _ => assert!(matches!(outcome, Err(CallError::Execution(_)))),
            }
        }
    }

    #[test]
    fn test_async_call_returns_before_completion_then_redraws() {
        let dir = tempfile::tempdir().unwrap();
        write_plugin(
            dir.path(),
            "slow",
            r#"
function slow()
    local deadline = os.clock() + 0.2
    while os.clock() < deadline do end
end
"#,
        );

        let engine = spawn_test_engine(dir.path());
        engine.handle.call_async("slow", Vec::new()).unwrap();
        // Accepted immediately; the call is still queued or running, so no
        // completion redraw can have fired yet.
        assert_eq!(engine.redraw.count(), 0);

        let deadline = Instant::now() + Duration::from_secs(5);
        while engine.redraw.count() == 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(engine.redraw.count(), 1);
    }

    #[test]
    fn test_async_failure_outcome_is_discarded_but_redraws() {
        let dir = tempfile::tempdir().unwrap();
        let engine = spawn_test_engine(dir.path());

        // Unknown function: accepted anyway, failure observed by the
        // detached waiter and dropped.
        engine.handle.call_async("missing", Vec::new()).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while engine.redraw.count() == 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(engine.redraw.count(), 1);
    }

    #[test]
    fn test_calls_after_shutdown_fail_fast() {
        let dir = tempfile::tempdir().unwrap();
        write_plugin(dir.path(), "hello", "function greet() end");

        let engine = spawn_test_engine(dir.path());
        engine.handle.call_sync("greet", Vec::new()).unwrap();

        engine.handle.shutdown();
        assert!(engine.handle.is_closed());
        assert_eq!(
            engine.handle.call_sync("greet", Vec::new()),
            Err(CallError::EngineClosed)
        );
        assert_eq!(
            engine.handle.call_async("greet", Vec::new()),
            Err(CallError::EngineClosed)
        );
    }

    #[test]
    fn test_broken_plugin_reported_good_plugin_served() {
        let dir = tempfile::tempdir().unwrap();
        write_plugin(dir.path(), "broken", "this is not lua {{{{");
        write_plugin(dir.path(), "working", "function ping() end");

        let engine = spawn_test_engine(dir.path());

        let loaded = engine.handle.loaded_plugins();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "working");
        assert!(
            engine
                .messenger
                .entries()
                .iter()
                .any(|m| m.contains("broken")),
            "load failure should reach the messenger"
        );

        engine.handle.call_sync("ping", Vec::new()).unwrap();
    }

    #[test]
    fn test_builtin_bundles_register_commands_and_bindings() {
        let dir = tempfile::tempdir().unwrap();
        let options = Arc::new(Mutex::new(OptionStore::with_defaults()));
        let messenger = Arc::new(RecordingMessenger::new());

        let handle = spawn_engine(EngineOptions {
            config_dir: dir.path().to_path_buf(),
            builtin_plugins: DEFAULT_BUILTIN_PLUGINS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            assets: Arc::new(EmbeddedAssets),
            options: Arc::clone(&options) as Arc<Mutex<dyn OptionStorePort>>,
            editor: Arc::new(Mutex::new(EditorState::with_scratch())),
            messenger: messenger as Arc<dyn MessengerPort>,
            redraw: Arc::new(CountingRedraw::new()),
        })
        .unwrap();

        let loaded: Vec<_> = handle
            .loaded_plugins()
            .into_iter()
            .map(|p| (p.name, p.origin))
            .collect();
        assert_eq!(
            loaded,
            vec![
                ("syntax".to_string(), PluginOrigin::Builtin),
                ("linter".to_string(), PluginOrigin::Builtin),
            ]
        );

        let commands: Vec<_> = handle.commands().into_iter().map(|c| c.name).collect();
        assert!(commands.contains(&"syntax".to_string()));
        assert!(commands.contains(&"lint".to_string()));

        let bindings = handle.key_bindings();
        assert!(bindings.iter().any(|b| b.key == "F7"));

        // The bundles register their option defaults on load.
        assert_eq!(
            options.lock().unwrap().option_get("linter"),
            Some(OptionValue::Boolean(true))
        );
    }
}
