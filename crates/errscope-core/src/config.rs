//! Scope configuration
//!
//! [`ScopeConfig`] controls the defaults a scope starts from and returns to
//! on `clear`.

use crate::error::ConfigError;
use errscope_event::{Level, DEFAULT_MAX_BREADCRUMBS};
use serde::{Deserialize, Serialize};

/// Scope defaults and limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScopeConfig {
    /// Capacity of each breadcrumb log
    pub max_breadcrumbs: usize,
    /// Level applied to events that carry none
    pub default_level: Level,
    /// Retained transaction names; `None` keeps every pushed name
    pub max_transaction_names: Option<usize>,
}

impl ScopeConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With breadcrumb capacity
    #[inline]
    #[must_use]
    pub fn with_max_breadcrumbs(mut self, max: usize) -> Self {
        self.max_breadcrumbs = max;
        self
    }

    /// With default level
    #[inline]
    #[must_use]
    pub fn with_default_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// With transaction stack cap
    #[inline]
    #[must_use]
    pub fn with_max_transaction_names(mut self, max: usize) -> Self {
        self.max_transaction_names = Some(max);
        self
    }

    /// Check limits
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for zero capacities
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_breadcrumbs == 0 {
            return Err(ConfigError::Invalid("max_breadcrumbs must be > 0".into()));
        }
        if self.max_transaction_names == Some(0) {
            return Err(ConfigError::Invalid(
                "max_transaction_names must be > 0 when set".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// Returns [`ConfigError`] on syntax errors, unknown keys or bad limits
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            max_breadcrumbs: DEFAULT_MAX_BREADCRUMBS,
            default_level: Level::Error,
            max_transaction_names: None,
        }
    }
}
