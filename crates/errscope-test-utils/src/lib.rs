//! Testing utilities for errscope workspace
//!
//! Shared test helpers, fixtures, and processors.

#![allow(missing_docs)]

use errscope_core::{EventProcessor, ProcessorError, Scope, ScopeConfig};
use errscope_event::{Breadcrumb, Event, Map};
use errscope_facts::{FactCache, StaticFacts};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber writing to the test harness; safe to call repeatedly
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("errscope_core=debug,errscope_facts=debug")
        }))
        .with_test_writer()
        .try_init();
}

pub fn test_os_context() -> Map {
    let mut os = Map::new();
    os.insert("name".into(), json!("testos"));
    os.insert("version".into(), json!("1.0"));
    os.insert("build".into(), json!("42"));
    os.insert("kernel_version".into(), json!("6.1.0-test"));
    os
}

pub fn test_runtime_context() -> Map {
    let mut runtime = Map::new();
    runtime.insert("name".into(), json!("rust"));
    runtime.insert("version".into(), json!("rustc 1.80.0"));
    runtime
}

pub fn test_facts() -> Arc<FactCache> {
    Arc::new(FactCache::new(StaticFacts::new(
        test_os_context(),
        test_runtime_context(),
    )))
}

pub fn test_scope_with(config: ScopeConfig) -> Scope {
    Scope::with_facts(config, test_facts())
}

pub fn test_scope() -> Scope {
    test_scope_with(ScopeConfig::default())
}

pub fn breadcrumb(message: &str) -> Breadcrumb {
    Breadcrumb::new().with_category("test").with_message(message)
}

pub fn map(value: Value) -> Map {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

/// Markers appended to `extra["markers"]` by [`MarkerProcessor`]s, in order
pub fn markers(event: &Event) -> Vec<String> {
    event
        .extra
        .get("markers")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Appends its marker to `extra["markers"]`
#[derive(Debug, Clone)]
pub struct MarkerProcessor {
    pub marker: String,
}

impl MarkerProcessor {
    pub fn new(marker: &str) -> Self {
        Self {
            marker: marker.to_string(),
        }
    }
}

impl EventProcessor for MarkerProcessor {
    fn name(&self) -> &str {
        &self.marker
    }

    fn process(&self, mut event: Event) -> Result<Option<Event>, ProcessorError> {
        let mut trail = markers(&event);
        trail.push(self.marker.clone());
        event.extra.insert("markers".into(), json!(trail));
        Ok(Some(event))
    }
}

/// Always fails
#[derive(Debug, Clone)]
pub struct FailingProcessor {
    pub reason: String,
}

impl FailingProcessor {
    pub fn new(reason: &str) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

impl EventProcessor for FailingProcessor {
    fn name(&self) -> &str {
        "failing"
    }

    fn process(&self, _event: Event) -> Result<Option<Event>, ProcessorError> {
        Err(anyhow::anyhow!("{}", self.reason).into())
    }
}

/// Always drops the event
#[derive(Debug, Clone, Copy)]
pub struct DroppingProcessor;

impl EventProcessor for DroppingProcessor {
    fn name(&self) -> &str {
        "dropping"
    }

    fn process(&self, _event: Event) -> Result<Option<Event>, ProcessorError> {
        Ok(None)
    }
}

/// Replaces the event with a new instance keeping only message and extra
#[derive(Debug, Clone, Copy)]
pub struct ReplacingProcessor;

impl EventProcessor for ReplacingProcessor {
    fn name(&self) -> &str {
        "replacing"
    }

    fn process(&self, event: Event) -> Result<Option<Event>, ProcessorError> {
        let mut replacement = Event::new();
        replacement.message = event.message;
        replacement.extra = event.extra;
        Ok(Some(replacement))
    }
}
