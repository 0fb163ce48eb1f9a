//! Shared breadcrumb log handle
//!
//! [`BreadcrumbLog`] is a cheap-to-clone handle to a [`BreadcrumbBuffer`].
//! Cloning the handle shares the storage, so a scope and the events it
//! enriched see the same log. [`BreadcrumbLog::duplicate`] creates new storage.

use crate::breadcrumb::{Breadcrumb, BreadcrumbBuffer, DEFAULT_MAX_BREADCRUMBS};
use parking_lot::Mutex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Handle to a bounded breadcrumb log
#[derive(Clone)]
pub struct BreadcrumbLog {
    inner: Arc<Mutex<BreadcrumbBuffer>>,
}

impl BreadcrumbLog {
    /// Create a fresh, empty log
    #[inline]
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::from_buffer(BreadcrumbBuffer::new(capacity))
    }

    /// Wrap an existing buffer
    #[inline]
    #[must_use]
    pub fn from_buffer(buffer: BreadcrumbBuffer) -> Self {
        Self {
            inner: Arc::new(Mutex::new(buffer)),
        }
    }

    /// Append a breadcrumb
    #[inline]
    pub fn record(&self, breadcrumb: Breadcrumb) {
        self.inner.lock().record(breadcrumb);
    }

    /// New log with the same contents and capacity but separate storage
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self::from_buffer(self.inner.lock().duplicate())
    }

    /// Check whether both handles point at the same log
    #[inline]
    #[must_use]
    pub fn same_log(&self, other: &BreadcrumbLog) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Copy of the stored breadcrumbs, oldest first
    #[must_use]
    pub fn snapshot(&self) -> Vec<Breadcrumb> {
        self.inner.lock().iter().cloned().collect()
    }

    /// Most recent breadcrumb
    #[must_use]
    pub fn peek(&self) -> Option<Breadcrumb> {
        self.inner.lock().peek().cloned()
    }

    /// Number of stored breadcrumbs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if log is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Maximum number of retained breadcrumbs
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// JSON form: `{"values": [...]}`
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        self.inner.lock().to_value()
    }
}

impl Default for BreadcrumbLog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BREADCRUMBS)
    }
}

impl fmt::Debug for BreadcrumbLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.inner.lock();
        f.debug_struct("BreadcrumbLog")
            .field("len", &guard.len())
            .field("capacity", &guard.capacity())
            .finish()
    }
}

impl Serialize for BreadcrumbLog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_storage() {
        let log = BreadcrumbLog::new(10);
        let handle = log.clone();

        handle.record(Breadcrumb::new().with_message("via handle"));

        assert_eq!(log.len(), 1);
        assert!(log.same_log(&handle));
    }

    #[test]
    fn duplicate_detaches_storage() {
        let log = BreadcrumbLog::new(10);
        log.record(Breadcrumb::new().with_message("before"));

        let copy = log.duplicate();
        copy.record(Breadcrumb::new().with_message("after"));

        assert!(!log.same_log(&copy));
        assert_eq!(log.len(), 1);
        assert_eq!(copy.len(), 2);
        assert_eq!(copy.capacity(), 10);
    }

    #[test]
    fn peek_returns_latest() {
        let log = BreadcrumbLog::default();
        assert!(log.peek().is_none());

        log.record(Breadcrumb::new().with_message("first"));
        log.record(Breadcrumb::new().with_message("second"));

        assert_eq!(log.peek().and_then(|b| b.message), Some("second".to_string()));
    }

    #[test]
    fn serializes_as_values() {
        let log = BreadcrumbLog::new(3);
        log.record(Breadcrumb::new().with_category("auth"));

        let value = serde_json::to_value(&log).unwrap();
        assert_eq!(value["values"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["values"][0]["category"], "auth");
    }
}
