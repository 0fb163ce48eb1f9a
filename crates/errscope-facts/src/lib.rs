//! errscope Facts
//!
//! Static OS and runtime descriptors seeded into every scope's `contexts`.
//!
//! # Overview
//!
//! - **FactProvider**: Source of the `os` and `runtime` descriptors
//! - **SystemFacts**: Reads the running host via `sysinfo`
//! - **FactCache**: Computes each descriptor once and keeps it
//! - **global / install**: The process-wide cache
//!
//! # Example
//!
//! ```rust
//! use errscope_facts::{FactCache, StaticFacts};
//! use serde_json::json;
//!
//! let mut os = errscope_event::Map::new();
//! os.insert("name".into(), json!("linux"));
//!
//! let cache = FactCache::new(StaticFacts::new(os, Default::default()));
//! assert_eq!(cache.default_contexts()["os"]["name"], "linux");
//! ```

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod provider;

// Re-exports
pub use cache::{global, install, os_context, runtime_context, FactCache};
pub use error::FactsError;
pub use provider::{FactProvider, StaticFacts, SystemFacts};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
