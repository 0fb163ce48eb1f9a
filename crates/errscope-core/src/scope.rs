//! Scope - per-context diagnostic metadata
//!
//! A [`Scope`] collects tags, user identity, extra data, contexts,
//! breadcrumbs, fingerprint, level, transaction names and event processors
//! over the lifetime of a request or job, and merges them into events with
//! [`Scope::apply_to_event`].
//!
//! Scopes carry no internal synchronization. A child context that needs its
//! own mutable state forks with [`Scope::dup`].

use crate::config::ScopeConfig;
use crate::error::{ProcessorError, ScopeError, ScopeResult};
use crate::processor::{EventProcessor, FnProcessor, ProcessorChain};
use errscope_event::value::{deep_copy_map, deep_copy_strings, merge_maps};
use errscope_event::{Breadcrumb, BreadcrumbLog, Event, Level, Map};
use errscope_facts::FactCache;
use serde_json::Value;
use std::sync::Arc;

/// Mutable bag of diagnostic metadata for one execution context
///
/// # Invariants
/// - `tags`, `user`, `extra`, `contexts` and `rack_env` are always maps
/// - a scope always owns a live breadcrumb log
/// - a fresh or cleared scope has `os` and `runtime` contexts
#[derive(Debug)]
pub struct Scope {
    config: ScopeConfig,
    facts: Arc<FactCache>,
    transaction_names: Vec<String>,
    contexts: Map,
    extra: Map,
    tags: Map,
    user: Map,
    level: Level,
    breadcrumbs: BreadcrumbLog,
    fingerprint: Vec<String>,
    event_processors: ProcessorChain,
    rack_env: Map,
}

impl Scope {
    /// Create scope with default config and the process-wide facts
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ScopeConfig::default())
    }

    /// Create scope with `config` and the process-wide facts
    #[inline]
    #[must_use]
    pub fn with_config(config: ScopeConfig) -> Self {
        Self::with_facts(config, errscope_facts::global())
    }

    /// Create scope seeding `contexts` from `facts`
    #[must_use]
    pub fn with_facts(config: ScopeConfig, facts: Arc<FactCache>) -> Self {
        let contexts = facts.default_contexts();
        Self {
            breadcrumbs: BreadcrumbLog::new(config.max_breadcrumbs),
            level: config.default_level,
            contexts,
            config,
            facts,
            transaction_names: Vec::new(),
            extra: Map::new(),
            tags: Map::new(),
            user: Map::new(),
            fingerprint: Vec::new(),
            event_processors: ProcessorChain::new(),
            rack_env: Map::new(),
        }
    }

    /// Reset to the freshly constructed state
    ///
    /// Config and fact source are kept. A new breadcrumb log is installed;
    /// the old one is left as is for anyone still holding it.
    pub fn clear(&mut self) {
        tracing::trace!("clearing scope");
        *self = Self::with_facts(self.config.clone(), Arc::clone(&self.facts));
    }

    /// Merge this scope into `event` and run the event processors
    ///
    /// Maps are merged with the event's own keys winning. Fingerprint,
    /// transaction, breadcrumbs and request environment are replaced. The
    /// level is only filled in when the event has none.
    ///
    /// # Returns
    /// - `Ok(Some(event))` with the enriched event
    /// - `Ok(None)` if a processor dropped the event
    ///
    /// # Errors
    /// Returns [`ScopeError::Processor`] if a processor fails; later
    /// processors do not run
    pub fn apply_to_event(&self, mut event: Event) -> Result<Option<Event>, ScopeError> {
        tracing::debug!(
            event_id = %event.event_id,
            processors = self.event_processors.len(),
            "applying scope to event"
        );

        event.tags = merge_maps(&self.tags, std::mem::take(&mut event.tags));
        event.user = merge_maps(&self.user, std::mem::take(&mut event.user));
        event.extra = merge_maps(&self.extra, std::mem::take(&mut event.extra));
        event.contexts = merge_maps(&self.contexts, std::mem::take(&mut event.contexts));
        event.fingerprint = deep_copy_strings(&self.fingerprint);
        if event.level.is_none() {
            event.level = Some(self.level);
        }
        event.transaction = self.transaction_name().map(str::to_owned);
        event.breadcrumbs = Some(self.breadcrumbs.clone());
        event.rack_env = deep_copy_map(&self.rack_env);

        self.event_processors.run(event)
    }

    /// Fork into an independent scope
    ///
    /// Maps and sequences are deep-copied and the breadcrumb log is
    /// duplicated, so neither scope observes the other's later mutations.
    #[must_use]
    pub fn dup(&self) -> Self {
        tracing::trace!(breadcrumbs = self.breadcrumbs.len(), "forking scope");
        self.fork_from()
    }

    fn fork_from(&self) -> Self {
        Self {
            config: self.config.clone(),
            facts: Arc::clone(&self.facts),
            transaction_names: deep_copy_strings(&self.transaction_names),
            contexts: deep_copy_map(&self.contexts),
            extra: deep_copy_map(&self.extra),
            tags: deep_copy_map(&self.tags),
            user: deep_copy_map(&self.user),
            level: self.level,
            breadcrumbs: self.breadcrumbs.duplicate(),
            fingerprint: deep_copy_strings(&self.fingerprint),
            event_processors: self.event_processors.clone(),
            rack_env: deep_copy_map(&self.rack_env),
        }
    }

    // ----- mutation -----

    /// Replace user identity
    ///
    /// # Errors
    /// Returns [`ScopeError::TypeMismatch`] unless `user` is an object
    pub fn set_user(&mut self, user: impl Into<Value>) -> ScopeResult<()> {
        self.user = expect_object("user", user.into())?;
        Ok(())
    }

    /// Replace extra data
    ///
    /// # Errors
    /// Returns [`ScopeError::TypeMismatch`] unless `extras` is an object
    pub fn set_extras(&mut self, extras: impl Into<Value>) -> ScopeResult<()> {
        self.extra = expect_object("extra", extras.into())?;
        Ok(())
    }

    /// Upsert one extra entry
    pub fn set_extra(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.extra.insert(key.into(), value.into());
    }

    /// Replace tags
    ///
    /// # Errors
    /// Returns [`ScopeError::TypeMismatch`] unless `tags` is an object
    pub fn set_tags(&mut self, tags: impl Into<Value>) -> ScopeResult<()> {
        self.tags = expect_object("tags", tags.into())?;
        Ok(())
    }

    /// Upsert one tag
    pub fn set_tag(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.tags.insert(key.into(), value.into());
    }

    /// Replace contexts, including `os` and `runtime`
    ///
    /// # Errors
    /// Returns [`ScopeError::TypeMismatch`] unless `contexts` is an object
    pub fn set_contexts(&mut self, contexts: impl Into<Value>) -> ScopeResult<()> {
        self.contexts = expect_object("contexts", contexts.into())?;
        Ok(())
    }

    /// Upsert one named context
    pub fn set_context(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.contexts.insert(key.into(), value.into());
    }

    /// Replace level
    #[inline]
    pub fn set_level(&mut self, level: Level) {
        self.level = level;
    }

    /// Push a transaction name
    ///
    /// The stack only grows, unless `max_transaction_names` is configured,
    /// in which case the oldest names beyond the cap are discarded.
    pub fn set_transaction_name(&mut self, name: impl Into<String>) {
        self.transaction_names.push(name.into());
        if let Some(max) = self.config.max_transaction_names {
            let excess = self.transaction_names.len().saturating_sub(max.max(1));
            self.transaction_names.drain(..excess);
        }
    }

    /// Replace fingerprint
    ///
    /// String elements are kept verbatim; other elements are stored as
    /// their JSON text.
    ///
    /// # Errors
    /// Returns [`ScopeError::TypeMismatch`] unless `fingerprint` is an array
    pub fn set_fingerprint(&mut self, fingerprint: impl Into<Value>) -> ScopeResult<()> {
        match fingerprint.into() {
            Value::Array(parts) => {
                self.fingerprint = parts
                    .into_iter()
                    .map(|part| match part {
                        Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect();
                Ok(())
            }
            other => Err(ScopeError::type_mismatch("fingerprint", "array", &other)),
        }
    }

    /// Replace request environment; `None` clears it
    pub fn set_rack_env(&mut self, env: Option<Map>) {
        self.rack_env = env.unwrap_or_default();
    }

    /// Record a breadcrumb in the current log
    #[inline]
    pub fn add_breadcrumb(&mut self, breadcrumb: Breadcrumb) {
        self.breadcrumbs.record(breadcrumb);
    }

    /// Install a fresh, empty breadcrumb log
    pub fn clear_breadcrumbs(&mut self) {
        self.breadcrumbs = BreadcrumbLog::new(self.config.max_breadcrumbs);
    }

    /// Register an event processor
    pub fn add_event_processor(&mut self, processor: impl EventProcessor + 'static) {
        self.event_processors.push(Arc::new(processor));
    }

    /// Register a closure as a named event processor
    pub fn add_event_processor_fn<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(Event) -> Result<Option<Event>, ProcessorError> + Send + Sync + 'static,
    {
        self.add_event_processor(FnProcessor::new(name, f));
    }

    // ----- accessors -----

    /// Tags
    #[inline]
    #[must_use]
    pub fn tags(&self) -> &Map {
        &self.tags
    }

    /// User identity
    #[inline]
    #[must_use]
    pub fn user(&self) -> &Map {
        &self.user
    }

    /// Extra data
    #[inline]
    #[must_use]
    pub fn extra(&self) -> &Map {
        &self.extra
    }

    /// Named contexts
    #[inline]
    #[must_use]
    pub fn contexts(&self) -> &Map {
        &self.contexts
    }

    /// Fingerprint
    #[inline]
    #[must_use]
    pub fn fingerprint(&self) -> &[String] {
        &self.fingerprint
    }

    /// Level applied to events without one
    #[inline]
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Every retained transaction name, oldest first
    #[inline]
    #[must_use]
    pub fn transaction_names(&self) -> &[String] {
        &self.transaction_names
    }

    /// Most recently pushed transaction name
    #[inline]
    #[must_use]
    pub fn transaction_name(&self) -> Option<&str> {
        self.transaction_names.last().map(String::as_str)
    }

    /// Current breadcrumb log
    #[inline]
    #[must_use]
    pub fn breadcrumbs(&self) -> &BreadcrumbLog {
        &self.breadcrumbs
    }

    /// Request environment
    #[inline]
    #[must_use]
    pub fn rack_env(&self) -> &Map {
        &self.rack_env
    }

    /// Registered processors
    #[inline]
    #[must_use]
    pub fn event_processors(&self) -> &ProcessorChain {
        &self.event_processors
    }

    /// Number of registered processors
    #[inline]
    #[must_use]
    pub fn event_processor_count(&self) -> usize {
        self.event_processors.len()
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Scope {
    /// Same as [`Scope::dup`]; never aliases mutable state
    fn clone(&self) -> Self {
        self.dup()
    }
}

fn expect_object(field: &'static str, value: Value) -> Result<Map, ScopeError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ScopeError::type_mismatch(field, "object", &other)),
    }
}
