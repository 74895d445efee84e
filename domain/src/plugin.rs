//! Loaded-plugin records
//!
//! The plugin loader appends one record per successfully loaded plugin to
//! an ordered registry. The registry is introspection-only: it is never
//! consulted to decide whether a plugin may load again, so a second loader
//! pass over the same directory produces duplicate records.

use serde::Serialize;

/// Where a plugin's source came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginOrigin {
    /// Discovered under `<configDir>/plugins/`.
    External,
    /// Resolved from the embedded `runtime/plugins/` bundles.
    Builtin,
}

/// Record of one successfully loaded plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedPlugin {
    pub name: String,
    pub origin: PluginOrigin,
}

impl LoadedPlugin {
    pub fn external(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: PluginOrigin::External,
        }
    }

    pub fn builtin(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: PluginOrigin::Builtin,
        }
    }
}

impl std::fmt::Display for LoadedPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.origin {
            PluginOrigin::External => write!(f, "{}", self.name),
            PluginOrigin::Builtin => write!(f, "{} (built-in)", self.name),
        }
    }
}
