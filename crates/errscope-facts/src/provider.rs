//! Fact providers
//!
//! A [`FactProvider`] describes the host OS and the language runtime.
//! Results are memoized by [`crate::FactCache`], so providers are free to do
//! expensive work on each call.

use errscope_event::Map;
use serde_json::json;
use sysinfo::System;

/// Source of static OS and runtime descriptors
pub trait FactProvider: Send + Sync {
    /// OS descriptor with `name`, `version`, `build` and `kernel_version`
    fn os_context(&self) -> Map;

    /// Runtime descriptor with `name` and `version`
    fn runtime_context(&self) -> Map;
}

/// Facts read from the running host
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFacts;

impl SystemFacts {
    /// Create provider
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl FactProvider for SystemFacts {
    fn os_context(&self) -> Map {
        let name = System::name().unwrap_or_else(|| std::env::consts::OS.to_string());
        let kernel = System::kernel_version();

        let mut os = Map::new();
        os.insert("name".into(), json!(name));
        os.insert("version".into(), json!(System::long_os_version().or_else(System::os_version)));
        os.insert("build".into(), json!(kernel));
        os.insert("kernel_version".into(), json!(kernel));
        os
    }

    fn runtime_context(&self) -> Map {
        let mut runtime = Map::new();
        runtime.insert("name".into(), json!("rust"));
        runtime.insert("version".into(), json!(env!("ERRSCOPE_RUSTC_VERSION")));
        runtime
    }
}

/// Fixed facts, for tests and embedders that know their environment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticFacts {
    os: Map,
    runtime: Map,
}

impl StaticFacts {
    /// Create provider returning the given maps
    #[inline]
    #[must_use]
    pub fn new(os: Map, runtime: Map) -> Self {
        Self { os, runtime }
    }
}

impl FactProvider for StaticFacts {
    fn os_context(&self) -> Map {
        self.os.clone()
    }

    fn runtime_context(&self) -> Map {
        self.runtime.clone()
    }
}
