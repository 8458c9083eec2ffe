//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Placeholder a provider template substitutes the escaped query into.
pub const QUERY_SLOT: &str = "{query}";

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `search_engine` is empty
    /// - a provider name is empty
    /// - a provider template does not contain exactly one `{query}` slot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_engine.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "search_engine".into(), reason: "must not be empty".into() });
        }

        for (name, template) in &self.providers {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid { field: "providers".into(), reason: "names must not be empty".into() });
            }
            let slots = template.matches(QUERY_SLOT).count();
            if slots != 1 {
                return Err(ConfigError::Invalid {
                    field: format!("providers.{name}"),
                    reason: format!("template must contain exactly one {QUERY_SLOT} slot, found {slots}"),
                });
            }
        }

        Ok(())
    }
}
