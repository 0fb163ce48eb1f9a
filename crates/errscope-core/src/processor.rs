//! Event processors
//!
//! Provides the [`EventProcessor`] capability and [`ProcessorChain`], the
//! ordered sequence a scope runs at the end of enrichment.

use crate::error::{ProcessorError, ScopeError};
use errscope_event::Event;
use std::fmt;
use std::sync::Arc;

/// Transform applied to an event during enrichment
///
/// # Contract
/// - `Ok(Some(event))` passes `event` (the same or a new instance) to the
///   next processor
/// - `Ok(None)` drops the event; later processors do not run
/// - `Err(_)` aborts enrichment; later processors do not run
pub trait EventProcessor: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Transform the event
    ///
    /// # Errors
    /// Any failure; it reaches the caller of `apply_to_event` unchanged
    fn process(&self, event: Event) -> Result<Option<Event>, ProcessorError>;
}

/// Adapter turning a closure into a named [`EventProcessor`]
pub struct FnProcessor<F> {
    name: String,
    f: F,
}

impl<F> FnProcessor<F>
where
    F: Fn(Event) -> Result<Option<Event>, ProcessorError> + Send + Sync,
{
    /// Wrap `f` under `name`
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> EventProcessor for FnProcessor<F>
where
    F: Fn(Event) -> Result<Option<Event>, ProcessorError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, event: Event) -> Result<Option<Event>, ProcessorError> {
        (self.f)(event)
    }
}

impl<F> fmt::Debug for FnProcessor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProcessor").field("name", &self.name).finish()
    }
}

/// Ordered sequence of processors
///
/// Processors are shared immutable capabilities; cloning the chain copies
/// the sequence, not the processors.
#[derive(Clone, Default)]
pub struct ProcessorChain {
    processors: Vec<Arc<dyn EventProcessor>>,
}

impl ProcessorChain {
    /// Create empty chain
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
        }
    }

    /// Append a processor; registration order is invocation order
    #[inline]
    pub fn push(&mut self, processor: Arc<dyn EventProcessor>) {
        self.processors.push(processor);
    }

    /// Number of registered processors
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// Check if chain is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Processor names in invocation order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    /// Run every processor in order
    ///
    /// # Errors
    /// Returns [`ScopeError::Processor`] for the first failing processor
    pub fn run(&self, mut event: Event) -> Result<Option<Event>, ScopeError> {
        for processor in &self.processors {
            let event_id = event.event_id;
            match processor.process(event) {
                Ok(Some(next)) => event = next,
                Ok(None) => {
                    tracing::debug!(
                        processor = processor.name(),
                        %event_id,
                        "event dropped by processor"
                    );
                    return Ok(None);
                }
                Err(source) => {
                    tracing::warn!(
                        processor = processor.name(),
                        %event_id,
                        error = %source,
                        "event processor failed"
                    );
                    return Err(ScopeError::processor(processor.name(), source));
                }
            }
        }
        Ok(Some(event))
    }
}

impl fmt::Debug for ProcessorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
