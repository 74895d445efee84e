//! CLI entrypoint for the vellum scripting host harness.
//!
//! Wires the real adapters to the application ports, spawns the scripting
//! engine (which loads external and built-in plugins), and exposes the
//! platform for inspection and invocation from the command line.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vellum_application::{
    EditorAccessorPort, EditorState, MessengerPort, RedrawPort, ScriptCallerPort,
};
use vellum_domain::ViewId;
use vellum_infrastructure::{
    DEFAULT_BUILTIN_PLUGINS, EmbeddedAssets, EngineOptions, OptionStore, ScriptingHandle,
    command_for, default_config_dir, key_binding_for, spawn_engine,
};

#[derive(Parser)]
#[command(name = "vellum", about = "Scripting host harness for the vellum editor")]
struct Cli {
    /// Configuration directory (defaults to the platform config dir)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List the plugins loaded at startup
    Plugins {
        /// Emit JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Call a script function by name
    Call {
        function: String,
        args: Vec<String>,
        /// Fire-and-forget: return once the call is accepted (the harness
        /// may exit before the call runs)
        #[arg(long)]
        detach: bool,
    },
    /// Run a script-registered command with arguments
    Run { name: String, args: Vec<String> },
    /// Press a key binding and dispatch its script handler
    Key { descriptor: String },
}

/// Messages go straight to the terminal in the harness.
struct ConsoleMessenger;

impl MessengerPort for ConsoleMessenger {
    fn message(&self, text: &str) {
        println!("{text}");
    }

    fn error(&self, text: &str) {
        eprintln!("error: {text}");
    }
}

/// The harness has no screen to refresh; log the signal instead.
struct LogRedraw;

impl RedrawPort for LogRedraw {
    fn request_redraw(&self) {
        tracing::trace!("redraw requested");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config_dir = cli.config_dir.unwrap_or_else(default_config_dir);
    info!("using config dir {}", config_dir.display());

    // === Dependency injection ===
    let messenger: Arc<dyn MessengerPort> = Arc::new(ConsoleMessenger);
    let editor = Arc::new(Mutex::new(EditorState::with_scratch()));
    let options = Arc::new(Mutex::new(OptionStore::load(&config_dir)));

    let handle = spawn_engine(EngineOptions {
        config_dir,
        builtin_plugins: DEFAULT_BUILTIN_PLUGINS
            .iter()
            .map(|s| s.to_string())
            .collect(),
        assets: Arc::new(EmbeddedAssets),
        options,
        editor: Arc::clone(&editor) as Arc<Mutex<dyn EditorAccessorPort>>,
        messenger: Arc::clone(&messenger),
        redraw: Arc::new(LogRedraw),
    })?;
    let handle = Arc::new(handle);

    match cli.command {
        None => print_summary(&handle),
        Some(Command::Plugins { json }) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&handle.loaded_plugins())?);
            } else {
                for plugin in handle.loaded_plugins() {
                    println!("{plugin}");
                }
            }
        }
        Some(Command::Call {
            function,
            args,
            detach,
        }) => {
            if detach {
                handle.call_async(&function, args)?;
            } else if let Err(err) = handle.call_sync(&function, args) {
                messenger.error(&err.to_string());
            }
        }
        Some(Command::Run { name, args }) => {
            match handle.commands().into_iter().find(|c| c.name == name) {
                Some(entry) => {
                    let run = command_for(
                        Arc::clone(&handle) as Arc<dyn ScriptCallerPort>,
                        Arc::clone(&messenger),
                        entry.function,
                    );
                    run(&args);
                }
                None => messenger.error(&format!("unknown command: {name}")),
            }
        }
        Some(Command::Key { descriptor }) => {
            match handle
                .key_bindings()
                .into_iter()
                .find(|b| b.key == descriptor)
            {
                Some(entry) => {
                    let view = editor
                        .lock()
                        .ok()
                        .and_then(|state| state.active_view())
                        .map(|v| v.id)
                        .unwrap_or(ViewId(0));
                    let handler = key_binding_for(
                        Arc::clone(&handle) as Arc<dyn ScriptCallerPort>,
                        Arc::clone(&messenger),
                        entry.function,
                    );
                    if !handler(view) {
                        info!("key {descriptor} left for the host's own bindings");
                    }
                }
                None => messenger.error(&format!("no binding for key: {descriptor}")),
            }
        }
    }

    // Explicit shutdown so the interpreter is released before exit; the
    // handle's Drop joins the engine thread.
    handle.shutdown();
    Ok(())
}

fn print_summary(handle: &ScriptingHandle) {
    let plugins = handle.loaded_plugins();
    println!("loaded plugins ({}):", plugins.len());
    for plugin in plugins {
        println!("  {plugin}");
    }

    let commands = handle.commands();
    println!("commands ({}):", commands.len());
    for command in commands {
        println!("  {} -> {}", command.name, command.function);
    }

    let bindings = handle.key_bindings();
    println!("key bindings ({}):", bindings.len());
    for binding in bindings {
        println!("  {} -> {}", binding.key, binding.function);
    }
}
