//! Breadcrumbs and the bounded breadcrumb buffer
//!
//! A [`Breadcrumb`] records one step of the trail leading up to an event.
//! [`BreadcrumbBuffer`] keeps the most recent breadcrumbs in insertion order
//! and evicts the oldest once full.

use crate::level::Level;
use crate::value::{deep_copy_map, Map};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of breadcrumbs retained per buffer
pub const DEFAULT_MAX_BREADCRUMBS: usize = 100;

/// Single diagnostic trail entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Dotted category (e.g. `http.request`, `db.query`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Human-readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Severity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,

    /// Breadcrumb type (`default`, `http`, `navigation`, ...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,

    /// Arbitrary structured data
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map,

    /// When the breadcrumb was recorded
    pub timestamp: DateTime<Utc>,
}

impl Breadcrumb {
    /// Create empty breadcrumb stamped with the current time
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            category: None,
            message: None,
            level: None,
            ty: None,
            data: Map::new(),
            timestamp: Utc::now(),
        }
    }

    /// Set message
    #[inline]
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set category
    #[inline]
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set level
    #[inline]
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Set type
    #[inline]
    #[must_use]
    pub fn with_type(mut self, ty: impl Into<String>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    /// Insert a data entry
    #[inline]
    #[must_use]
    pub fn with_data(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Set timestamp
    #[inline]
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    fn deep_copy(&self) -> Self {
        Self {
            category: self.category.clone(),
            message: self.message.clone(),
            level: self.level,
            ty: self.ty.clone(),
            data: deep_copy_map(&self.data),
            timestamp: self.timestamp,
        }
    }
}

impl Default for Breadcrumb {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounded FIFO of breadcrumbs
#[derive(Debug, Clone, PartialEq)]
pub struct BreadcrumbBuffer {
    capacity: usize,
    buffer: VecDeque<Breadcrumb>,
}

impl BreadcrumbBuffer {
    /// Create buffer holding at most `capacity` breadcrumbs
    ///
    /// A capacity of zero is raised to one.
    #[inline]
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            buffer: VecDeque::with_capacity(capacity.min(DEFAULT_MAX_BREADCRUMBS)),
        }
    }

    /// Append a breadcrumb, evicting the oldest when full
    pub fn record(&mut self, breadcrumb: Breadcrumb) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(breadcrumb);
    }

    /// Most recent breadcrumb
    #[inline]
    #[must_use]
    pub fn peek(&self) -> Option<&Breadcrumb> {
        self.buffer.back()
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Breadcrumb> {
        self.buffer.iter()
    }

    /// Number of stored breadcrumbs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if buffer is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Maximum number of retained breadcrumbs
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Copy with independent storage
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            capacity: self.capacity,
            buffer: self.buffer.iter().map(Breadcrumb::deep_copy).collect(),
        }
    }

    /// JSON form: `{"values": [...]}`
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({ "values": self.buffer })
    }
}

impl Default for BreadcrumbBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BREADCRUMBS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn crumb(message: &str) -> Breadcrumb {
        Breadcrumb::new().with_message(message)
    }

    #[test]
    fn record_keeps_insertion_order() {
        let mut buffer = BreadcrumbBuffer::new(10);
        buffer.record(crumb("one"));
        buffer.record(crumb("two"));

        let messages: Vec<_> = buffer.iter().filter_map(|b| b.message.as_deref()).collect();
        assert_eq!(messages, vec!["one", "two"]);
        assert_eq!(buffer.peek().and_then(|b| b.message.as_deref()), Some("two"));
    }

    #[test]
    fn full_buffer_evicts_oldest() {
        let mut buffer = BreadcrumbBuffer::new(2);
        buffer.record(crumb("one"));
        buffer.record(crumb("two"));
        buffer.record(crumb("three"));

        assert_eq!(buffer.len(), 2);
        let messages: Vec<_> = buffer.iter().filter_map(|b| b.message.as_deref()).collect();
        assert_eq!(messages, vec!["two", "three"]);
    }

    #[test]
    fn zero_capacity_is_raised() {
        let mut buffer = BreadcrumbBuffer::new(0);
        assert_eq!(buffer.capacity(), 1);
        buffer.record(crumb("only"));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn duplicate_is_independent() {
        let mut original = BreadcrumbBuffer::new(5);
        original.record(crumb("shared"));

        let mut copy = original.duplicate();
        copy.record(crumb("copy only"));

        assert_eq!(original.len(), 1);
        assert_eq!(copy.len(), 2);
        assert_eq!(copy.capacity(), 5);
    }

    #[test]
    fn breadcrumb_serializes_type_field() {
        let b = Breadcrumb::new()
            .with_type("http")
            .with_category("request")
            .with_level(Level::Info)
            .with_data("status", 200);

        let value = serde_json::to_value(&b).unwrap();
        assert_eq!(value["type"], json!("http"));
        assert_eq!(value["category"], json!("request"));
        assert_eq!(value["level"], json!("info"));
        assert_eq!(value["data"]["status"], json!(200));
        assert!(value.get("message").is_none());
    }

    #[test]
    fn buffer_to_value_wraps_values() {
        let mut buffer = BreadcrumbBuffer::default();
        buffer.record(crumb("hello"));

        let value = buffer.to_value();
        assert_eq!(value["values"][0]["message"], json!("hello"));
        assert_eq!(buffer.capacity(), DEFAULT_MAX_BREADCRUMBS);
    }
}
