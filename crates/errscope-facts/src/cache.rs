//! Memoized fact cache and the process-wide instance
//!
//! [`FactCache`] computes each descriptor at most once. The process-wide
//! cache is created on first use of [`global`], or earlier via [`install`].

use crate::error::FactsError;
use crate::provider::{FactProvider, SystemFacts};
use errscope_event::Map;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

static GLOBAL: OnceCell<Arc<FactCache>> = OnceCell::new();

/// Memoizing wrapper around a [`FactProvider`]
pub struct FactCache {
    provider: Box<dyn FactProvider>,
    os: OnceCell<Map>,
    runtime: OnceCell<Map>,
}

impl FactCache {
    /// Create cache over `provider`; nothing is computed yet
    #[must_use]
    pub fn new(provider: impl FactProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            os: OnceCell::new(),
            runtime: OnceCell::new(),
        }
    }

    /// OS descriptor, computed on first access
    pub fn os_context(&self) -> &Map {
        self.os.get_or_init(|| {
            let os = self.provider.os_context();
            tracing::debug!(keys = os.len(), "computed os context");
            os
        })
    }

    /// Runtime descriptor, computed on first access
    pub fn runtime_context(&self) -> &Map {
        self.runtime.get_or_init(|| {
            let runtime = self.provider.runtime_context();
            tracing::debug!(keys = runtime.len(), "computed runtime context");
            runtime
        })
    }

    /// Default `contexts` map: `{"os": ..., "runtime": ...}`
    #[must_use]
    pub fn default_contexts(&self) -> Map {
        let mut contexts = Map::new();
        contexts.insert("os".into(), self.os_context().clone().into());
        contexts.insert("runtime".into(), self.runtime_context().clone().into());
        contexts
    }

    /// Check whether both descriptors have been computed
    #[inline]
    #[must_use]
    pub fn is_primed(&self) -> bool {
        self.os.get().is_some() && self.runtime.get().is_some()
    }
}

impl fmt::Debug for FactCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactCache")
            .field("os", &self.os.get())
            .field("runtime", &self.runtime.get())
            .finish_non_exhaustive()
    }
}

/// Process-wide cache, backed by [`SystemFacts`] unless [`install`] ran first
pub fn global() -> Arc<FactCache> {
    Arc::clone(GLOBAL.get_or_init(|| Arc::new(FactCache::new(SystemFacts::new()))))
}

/// Install the process-wide provider
///
/// # Errors
/// Returns [`FactsError::AlreadyInitialized`] if the global cache exists
pub fn install(provider: impl FactProvider + 'static) -> Result<Arc<FactCache>, FactsError> {
    let cache = Arc::new(FactCache::new(provider));
    GLOBAL
        .set(Arc::clone(&cache))
        .map_err(|_| FactsError::AlreadyInitialized)?;
    Ok(cache)
}

/// OS descriptor from the process-wide cache
#[must_use]
pub fn os_context() -> Map {
    global().os_context().clone()
}

/// Runtime descriptor from the process-wide cache
#[must_use]
pub fn runtime_context() -> Map {
    global().runtime_context().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingFacts {
        calls: Arc<AtomicUsize>,
    }

    impl FactProvider for CountingFacts {
        fn os_context(&self) -> Map {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut os = Map::new();
            os.insert("name".into(), json!("testos"));
            os
        }

        fn runtime_context(&self) -> Map {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut runtime = Map::new();
            runtime.insert("name".into(), json!("rust"));
            runtime
        }
    }

    #[test]
    fn computes_each_context_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = FactCache::new(CountingFacts {
            calls: Arc::clone(&calls),
        });
        assert!(!cache.is_primed());

        for _ in 0..3 {
            assert_eq!(cache.os_context()["name"], json!("testos"));
            assert_eq!(cache.runtime_context()["name"], json!("rust"));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(cache.is_primed());
    }

    #[test]
    fn concurrent_first_access_is_consistent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = Arc::new(FactCache::new(CountingFacts {
            calls: Arc::clone(&calls),
        }));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.default_contexts())
            })
            .collect();

        let results: Vec<Map> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn default_contexts_has_os_and_runtime() {
        let cache = FactCache::new(CountingFacts::default());
        let contexts = cache.default_contexts();

        assert_eq!(contexts.len(), 2);
        assert_eq!(contexts["os"]["name"], json!("testos"));
        assert_eq!(contexts["runtime"]["name"], json!("rust"));
    }

    #[test]
    fn global_is_shared_and_install_fails_afterwards() {
        let first = global();
        let second = global();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(os_context().contains_key("name"));
        assert!(runtime_context().contains_key("version"));

        let err = install(CountingFacts::default()).unwrap_err();
        assert!(matches!(err, FactsError::AlreadyInitialized));
    }
}
