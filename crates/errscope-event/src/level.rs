//! Event severity levels
//!
//! Provides [`Level`], the severity attached to events and breadcrumbs.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Severity of an event or breadcrumb
///
/// Serialized in lowercase (`"warning"`, `"error"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Diagnostic noise
    Debug,

    /// Informational message
    Info,

    /// Something unexpected that did not fail
    #[serde(alias = "warn")]
    Warning,

    /// A failure (default for captured errors)
    #[default]
    Error,

    /// An unrecoverable failure
    Fatal,
}

impl Level {
    /// All levels, lowest severity first
    pub const ALL: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Fatal,
    ];

    /// Lowercase wire name
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Unknown level name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown level: '{0}'")]
pub struct ParseLevelError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_error() {
        assert_eq!(Level::default(), Level::Error);
    }

    #[test]
    fn parse_accepts_warn_alias() {
        assert_eq!("warn".parse::<Level>().unwrap(), Level::Warning);
        assert_eq!("WARNING".parse::<Level>().unwrap(), Level::Warning);
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "loud".parse::<Level>().unwrap_err();
        assert_eq!(err.to_string(), "unknown level: 'loud'");
    }

    #[test]
    fn display_matches_parse() {
        for level in Level::ALL {
            assert_eq!(level.to_string().parse::<Level>().unwrap(), level);
        }
    }

    #[test]
    fn serde_lowercase() {
        let json = serde_json::to_string(&Level::Fatal).unwrap();
        assert_eq!(json, "\"fatal\"");

        let level: Level = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(level, Level::Warning);
    }

    #[test]
    fn ordering_by_severity() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Warning < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }
}
