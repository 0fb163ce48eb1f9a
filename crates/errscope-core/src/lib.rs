//! errscope Core
//!
//! Per-execution-context diagnostic scope for error reporting clients.
//!
//! # Core Concepts
//!
//! - [`Scope`]: Mutable bag of tags, user, extra, contexts, breadcrumbs,
//!   fingerprint, level and transaction names
//! - [`Scope::apply_to_event`]: Deterministic merge of scope state into an [`Event`]
//! - [`Scope::dup`]: Fork with no shared mutable state
//! - [`EventProcessor`]: Transform run at the end of enrichment
//! - [`ScopeConfig`]: Defaults and limits
//!
//! # Example
//!
//! ```rust
//! use errscope_core::{Event, Level, Scope};
//! use serde_json::json;
//!
//! let mut scope = Scope::new();
//! scope.set_tag("region", "eu-west-1");
//! scope.set_user(json!({"id": 42})).unwrap();
//! scope.set_transaction_name("GET /orders");
//!
//! let event = scope
//!     .apply_to_event(Event::new().with_message("timeout"))
//!     .unwrap()
//!     .expect("no processor drops the event");
//!
//! assert_eq!(event.level, Some(Level::Error));
//! assert_eq!(event.transaction.as_deref(), Some("GET /orders"));
//! assert!(event.contexts.contains_key("os"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod error;
mod processor;
mod scope;

// Re-exports
pub use config::ScopeConfig;
pub use error::{ConfigError, ProcessorError, ScopeError, ScopeResult};
pub use processor::{EventProcessor, FnProcessor, ProcessorChain};
pub use scope::Scope;

pub use errscope_event::{Breadcrumb, BreadcrumbLog, Event, Level, Map};
pub use errscope_facts::{FactCache, FactProvider, StaticFacts, SystemFacts};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for scope operations
    pub use crate::{
        Breadcrumb, Event, EventProcessor, Level, ProcessorError, Scope, ScopeConfig, ScopeError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
