//! Built-in plugin asset resolution port.
//!
//! The built-in plugin list is configuration; resolving an identifier to
//! its bundled source is a capability injected into the plugin loader.
//! The production implementation serves sources embedded in the binary.

/// Port for resolving built-in plugin identifiers to source text.
pub trait PluginAssetStore: Send + Sync {
    /// Source of the bundle for `name`, or `None` if no such bundle ships.
    fn resolve(&self, name: &str) -> Option<String>;
}
