//! Process-wide configuration store.
//!
//! Configuration is a flat map of keys to JSON values. It is installed once at
//! startup with [`init`] and read through `get_*(key, fallback)` lookups
//! afterwards. Components layer their own lookups on top (instance value, then
//! a specific key, then a general key, then a hard default).

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use serde_json::Value;

use crate::error::ConfigError;

/// Well-known configuration keys.
pub mod keys {
    /// Platform style (`"ios"` or `"md"`).
    pub const MODE: &str = "mode";
    /// Whether overlays animate at all.
    pub const ANIMATED: &str = "animated";
    /// Whether message strings are interpreted as (sanitized) markup.
    pub const HTML_CONTENT_ENABLED: &str = "html_content_enabled";
    /// General spinner name used by every component.
    pub const SPINNER: &str = "spinner";
    /// Spinner used by the loading indicator.
    pub const LOADING_SPINNER: &str = "loading_spinner";
    /// Pulling icon of the refresher content.
    pub const REFRESHING_ICON: &str = "refreshing_icon";
    /// Refreshing spinner of the refresher content.
    pub const REFRESHING_SPINNER: &str = "refreshing_spinner";
}

/// Default for [`keys::HTML_CONTENT_ENABLED`].
pub const HTML_CONTENT_ENABLED_DEFAULT: bool = true;

static GLOBAL: OnceLock<Config> = OnceLock::new();

/// Read-only key/value configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    values: HashMap<String, Value>,
}

impl Config {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value (builder style, used before installation).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Parse a config from a JSON object.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(map) => Ok(Self {
                values: map.into_iter().collect(),
            }),
            _ => Err(ConfigError::NotAnObject),
        }
    }

    /// Load a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::debug!("Loaded {} config keys from {}", config.values.len(), path.display());
        Ok(config)
    }

    /// Check whether a key is present (an explicit `null` counts).
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Raw value lookup.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Boolean lookup with fallback. Non-boolean values yield the fallback.
    pub fn get_bool(&self, key: &str, fallback: bool) -> bool {
        match self.values.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) if s == "true" => true,
            Some(Value::String(s)) if s == "false" => false,
            _ => fallback,
        }
    }

    /// String lookup with fallback.
    pub fn get_str<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        match self.values.get(key) {
            Some(Value::String(s)) => s,
            _ => fallback,
        }
    }

    /// Numeric lookup with fallback.
    pub fn get_number(&self, key: &str, fallback: f64) -> f64 {
        self.values
            .get(key)
            .and_then(Value::as_f64)
            .unwrap_or(fallback)
    }
}

/// Install the process-wide config.
///
/// May be called once; later calls fail and leave the first config in place.
pub fn init(config: Config) -> Result<(), ConfigError> {
    GLOBAL
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)
}

/// The process-wide config, or an empty one if [`init`] was never called.
pub fn global() -> &'static Config {
    GLOBAL.get_or_init(Config::default)
}
