//! Plugin loading: external directory sweep plus built-in bundles.
//!
//! External plugins live at `<configDir>/plugins/<name>/<name>.lua` — one
//! recognized entry file per plugin directory, named after its directory;
//! anything else in the directory is ignored. Built-in plugins are
//! resolved through the injected asset store after all external plugins,
//! in list order.
//!
//! Every failure here is non-fatal: it is reported through the messenger
//! and loading moves on to the next candidate. Successful loads append to
//! the registry with no presence check, so loading a directory twice
//! records it twice.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mlua::prelude::*;
use thiserror::Error;

use vellum_application::{MessengerPort, PluginAssetStore};
use vellum_domain::LoadedPlugin;

/// Recognized script extension for plugin entry files.
const SCRIPT_EXT: &str = "lua";

/// Why a single plugin candidate failed to load.
#[derive(Debug, Error)]
enum PluginLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("{0}")]
    Script(#[from] LuaError),

    #[error("error loading built-in plugin: {0}")]
    MissingAsset(String),
}

/// Loads plugin sources into the interpreter during engine bootstrap.
///
/// Runs entirely on the engine thread before the serve loop starts, so
/// the `Lua` it receives needs no locking.
pub(crate) struct PluginLoader {
    plugins_dir: PathBuf,
    builtins: Vec<String>,
    assets: Arc<dyn PluginAssetStore>,
    messenger: Arc<dyn MessengerPort>,
}

impl PluginLoader {
    pub fn new(
        config_dir: &Path,
        builtins: Vec<String>,
        assets: Arc<dyn PluginAssetStore>,
        messenger: Arc<dyn MessengerPort>,
    ) -> Self {
        Self {
            plugins_dir: config_dir.join("plugins"),
            builtins,
            assets,
            messenger,
        }
    }

    /// Load all external plugins, then all built-ins.
    pub fn load_all(&self, lua: &Lua, registry: &mut Vec<LoadedPlugin>) {
        self.load_external(lua, registry);
        self.load_builtins(lua, registry);
    }

    fn load_external(&self, lua: &Lua, registry: &mut Vec<LoadedPlugin>) {
        let entries = match std::fs::read_dir(&self.plugins_dir) {
            Ok(entries) => entries,
            Err(_) => {
                tracing::debug!(dir = %self.plugins_dir.display(), "no plugin directory");
                return;
            }
        };

        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        candidates.sort();

        for dir in candidates {
            let Some(name) = dir.file_name().and_then(|n| n.to_str()).map(str::to_string)
            else {
                continue;
            };
            let entry_file = dir.join(format!("{name}.{SCRIPT_EXT}"));
            if !entry_file.is_file() {
                continue;
            }

            match self.load_file(lua, &entry_file) {
                Ok(()) => {
                    tracing::debug!(plugin = %name, "loaded external plugin");
                    registry.push(LoadedPlugin::external(name));
                }
                Err(e) => {
                    self.messenger
                        .error(&format!("failed to load plugin '{name}': {e}"));
                }
            }
        }
    }

    fn load_builtins(&self, lua: &Lua, registry: &mut Vec<LoadedPlugin>) {
        for name in &self.builtins {
            match self.load_bundle(lua, name) {
                Ok(()) => {
                    tracing::debug!(plugin = %name, "loaded built-in plugin");
                    registry.push(LoadedPlugin::builtin(name.clone()));
                }
                Err(e @ PluginLoadError::MissingAsset(_)) => {
                    self.messenger.error(&e.to_string());
                }
                Err(e) => {
                    self.messenger
                        .error(&format!("failed to load built-in plugin '{name}': {e}"));
                }
            }
        }
    }

    fn load_file(&self, lua: &Lua, path: &Path) -> Result<(), PluginLoadError> {
        let source = std::fs::read_to_string(path).map_err(|source| PluginLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        lua.load(&source)
            .set_name(path.to_string_lossy())
            .exec()?;
        Ok(())
    }

    fn load_bundle(&self, lua: &Lua, name: &str) -> Result<(), PluginLoadError> {
        let source = self
            .assets
            .resolve(name)
            .ok_or_else(|| PluginLoadError::MissingAsset(name.to_string()))?;
        lua.load(&source)
            .set_name(format!("runtime/plugins/{name}/{name}.{SCRIPT_EXT}"))
            .exec()?;
        Ok(())
    }
}
