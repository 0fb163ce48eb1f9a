//! Event record
//!
//! [`Event`] is a single reportable error or message. Every field a scope
//! writes during enrichment is public and mutable.

use crate::level::Level;
use crate::log::BreadcrumbLog;
use crate::value::Map;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A single reportable error or message
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    /// Unique id (hyphen-less on the wire)
    #[serde(serialize_with = "serialize_event_id")]
    pub event_id: Uuid,

    /// Capture time
    pub timestamp: DateTime<Utc>,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Severity; `None` lets the scope decide
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,

    /// Indexed key/value tags
    pub tags: Map,

    /// User identity
    pub user: Map,

    /// Arbitrary extra data
    pub extra: Map,

    /// Named structured contexts (`os`, `runtime`, ...)
    pub contexts: Map,

    /// Grouping key
    pub fingerprint: Vec<String>,

    /// Transaction name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<String>,

    /// Breadcrumb trail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breadcrumbs: Option<BreadcrumbLog>,

    /// Request environment
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub rack_env: Map,
}

impl Event {
    /// Create empty event with a fresh id and the current time
    #[must_use]
    pub fn new() -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            message: None,
            level: None,
            tags: Map::new(),
            user: Map::new(),
            extra: Map::new(),
            contexts: Map::new(),
            fingerprint: Vec::new(),
            transaction: None,
            breadcrumbs: None,
            rack_env: Map::new(),
        }
    }

    /// Set message
    #[inline]
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set level
    #[inline]
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Insert a tag
    #[inline]
    #[must_use]
    pub fn with_tag(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Insert an extra entry
    #[inline]
    #[must_use]
    pub fn with_extra(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Set fingerprint
    #[inline]
    #[must_use]
    pub fn with_fingerprint<I, S>(mut self, parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fingerprint = parts.into_iter().map(Into::into).collect();
        self
    }

    /// JSON payload for transport
    ///
    /// # Errors
    /// Returns error if a map holds a value serde cannot represent
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::new()
    }
}

fn serialize_event_id<S: serde::Serializer>(id: &Uuid, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&id.simple())
}
