//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (HOWPOPULAR_*)
//! 2. TOML config file (if HOWPOPULAR_CONFIG_FILE set)
//! 3. Built-in defaults

use std::collections::BTreeMap;
use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cache::CACHE_VERSION;

mod toggle;
mod validation;

pub use validation::{ConfigError, QUERY_SLOT};

/// Name of the provider used when none is configured or the configured one is unknown.
pub const DEFAULT_SEARCH_ENGINE: &str = "google";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (HOWPOPULAR_*)
/// 2. TOML config file (if HOWPOPULAR_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Use plain HTTP and skip certificate verification.
    ///
    /// Set via HOWPOPULAR_DISABLE_SSL environment variable.
    #[serde(default, deserialize_with = "toggle::deserialize")]
    pub disable_ssl: bool,

    /// Bypass the on-disk response cache entirely.
    ///
    /// Set via HOWPOPULAR_DISABLE_CACHE environment variable.
    #[serde(default, deserialize_with = "toggle::deserialize")]
    pub disable_cache: bool,

    /// Search provider name.
    ///
    /// Set via HOWPOPULAR_SEARCH_ENGINE environment variable.
    #[serde(default = "default_search_engine")]
    pub search_engine: String,

    /// Base cache directory; the cache lives in a `howpopular` folder inside it.
    ///
    /// Set via HOWPOPULAR_CACHE_DIR environment variable.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Additional provider URL templates keyed by name.
    ///
    /// Each template holds one `{query}` slot and no scheme, e.g.
    /// `"www.bing.com/search?q={query}"`. Set in the config file under
    /// `[providers]` or via HOWPOPULAR_PROVIDERS__<NAME>.
    #[serde(default)]
    pub providers: BTreeMap<String, String>,
}

fn default_search_engine() -> String {
    DEFAULT_SEARCH_ENGINE.into()
}

/// `$XDG_CACHE_HOME`, falling back to `~/.cache`.
fn default_cache_dir() -> PathBuf {
    match std::env::var_os("XDG_CACHE_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()
            .map(|home| home.join(".cache"))
            .unwrap_or_else(|| PathBuf::from(".cache")),
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            disable_ssl: false,
            disable_cache: false,
            search_engine: default_search_engine(),
            cache_dir: default_cache_dir(),
            providers: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// URL scheme prefix for search requests.
    pub fn scheme(&self) -> &'static str {
        if self.disable_ssl { "http://" } else { "https://" }
    }

    /// Whether TLS certificates are verified.
    pub fn verify_tls(&self) -> bool {
        !self.disable_ssl
    }

    /// Cache path without extension; every cache file starts with this name.
    pub fn cache_base_path(&self) -> PathBuf {
        self.cache_dir
            .join("howpopular")
            .join(format!("cache{CACHE_VERSION}"))
    }

    /// Path of the SQLite cache database.
    pub fn cache_file(&self) -> PathBuf {
        self.cache_base_path().with_extension("sqlite")
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `HOWPOPULAR_`
    /// 2. TOML file from `HOWPOPULAR_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::load_unvalidated()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from all sources without running `validate()`.
    ///
    /// For paths that only need the cache location, such as clearing the cache.
    pub fn load_unvalidated() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("HOWPOPULAR_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("HOWPOPULAR_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))
    }
}
