//! Option store: editor defaults layered with `settings.toml`.
//!
//! Options resolve in three layers, later wins: built-in defaults, the
//! user's `<configDir>/settings.toml`, and runtime `AddOption` calls from
//! scripts. A malformed settings file is reported and ignored rather than
//! aborting startup.

use std::collections::BTreeMap;
use std::path::Path;

use vellum_application::{OptionStorePort, OptionValue};

/// In-memory option storage behind [`OptionStorePort`].
#[derive(Debug)]
pub struct OptionStore {
    values: BTreeMap<String, OptionValue>,
}

impl OptionStore {
    /// Store holding only the built-in editor defaults.
    pub fn with_defaults() -> Self {
        let mut values = BTreeMap::new();
        values.insert("autoindent".to_string(), OptionValue::Boolean(true));
        values.insert(
            "colorscheme".to_string(),
            OptionValue::String("default".to_string()),
        );
        values.insert("ruler".to_string(), OptionValue::Boolean(true));
        values.insert("syntax".to_string(), OptionValue::Boolean(true));
        values.insert("tabsize".to_string(), OptionValue::Integer(4));
        Self { values }
    }

    /// Defaults overlaid with `<config_dir>/settings.toml`, if present.
    pub fn load(config_dir: &Path) -> Self {
        let mut store = Self::with_defaults();
        let settings_path = config_dir.join("settings.toml");
        let source = match std::fs::read_to_string(&settings_path) {
            Ok(source) => source,
            Err(_) => return store,
        };

        let table: toml::Table = match source.parse() {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(
                    path = %settings_path.display(),
                    "ignoring malformed settings file: {e}"
                );
                return store;
            }
        };

        for (key, value) in table {
            match toml_to_option(&value) {
                Some(value) => {
                    store.values.insert(key, value);
                }
                None => {
                    tracing::warn!(key, "ignoring setting with unsupported value type");
                }
            }
        }
        store
    }
}

impl OptionStorePort for OptionStore {
    fn option_get(&self, key: &str) -> Option<OptionValue> {
        self.values.get(key).cloned()
    }

    fn option_add(&mut self, key: &str, value: OptionValue) {
        self.values.insert(key.to_string(), value);
    }

    fn option_keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}

fn toml_to_option(value: &toml::Value) -> Option<OptionValue> {
    match value {
        toml::Value::String(s) => Some(OptionValue::String(s.clone())),
        toml::Value::Integer(n) => Some(OptionValue::Integer(*n)),
        toml::Value::Boolean(b) => Some(OptionValue::Boolean(*b)),
        _ => None,
    }
}
