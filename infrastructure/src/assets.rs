//! Embedded built-in plugin bundles.
//!
//! Built-in plugins ship inside the binary; their sources live under
//! `runtime/plugins/<name>/<name>.lua` in the repository and are embedded
//! at compile time. The loader reaches them through [`PluginAssetStore`],
//! so tests can substitute their own bundles (or deliberately missing
//! ones).

use vellum_application::PluginAssetStore;

/// Built-in plugins loaded after external ones, in this order.
pub const DEFAULT_BUILTIN_PLUGINS: &[&str] = &["syntax", "linter"];

/// Asset store serving the bundles compiled into the binary.
pub struct EmbeddedAssets;

impl PluginAssetStore for EmbeddedAssets {
    fn resolve(&self, name: &str) -> Option<String> {
        match name {
            "syntax" => Some(include_str!("../../runtime/plugins/syntax/syntax.lua").to_string()),
            "linter" => Some(include_str!("../../runtime/plugins/linter/linter.lua").to_string()),
            _ => None,
        }
    }
}
