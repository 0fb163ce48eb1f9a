//! Error types for scope operations
//!
//! Covers:
//! - Setter argument validation (container type checks)
//! - Event processor failures during enrichment
//! - Configuration parsing

use serde_json::Value;

/// Errors raised by [`crate::Scope`]
#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
    /// Setter received the wrong container type
    #[error("{field}: expected the argument to be {expected}, got {actual} ({value})")]
    TypeMismatch {
        /// Scope field being set
        field: &'static str,
        /// Required JSON type
        expected: &'static str,
        /// JSON type actually supplied
        actual: &'static str,
        /// Offending value, rendered as JSON
        value: String,
    },

    /// A registered event processor failed; later processors did not run
    #[error("event processor '{processor}' failed: {source}")]
    Processor {
        /// Name of the failing processor
        processor: String,
        /// Error returned by the processor
        #[source]
        source: ProcessorError,
    },
}

impl ScopeError {
    /// Create type mismatch error for `value`
    #[must_use]
    pub fn type_mismatch(field: &'static str, expected: &'static str, value: &Value) -> Self {
        Self::TypeMismatch {
            field,
            expected,
            actual: errscope_event::value::type_name(value),
            value: value.to_string(),
        }
    }

    /// Create processor failure error
    #[must_use]
    pub fn processor(processor: impl Into<String>, source: ProcessorError) -> Self {
        Self::Processor {
            processor: processor.into(),
            source,
        }
    }
}

/// Errors returned by [`crate::EventProcessor`] implementations
#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    /// Processor refused the event with a reason
    #[error("rejected: {0}")]
    Rejected(String),

    /// Any other failure
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProcessorError {
    /// Create rejection error
    #[inline]
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }
}

/// Errors loading a [`crate::ScopeConfig`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML could not be parsed
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type alias for scope operations
pub type ScopeResult<T> = Result<T, ScopeError>;
