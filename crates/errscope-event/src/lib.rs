//! errscope Event Model
//!
//! The records a scope enriches and the breadcrumb trail it carries.
//!
//! # Core Concepts
//!
//! - [`Event`]: A single reportable error or message
//! - [`Level`]: Event severity (`debug` .. `fatal`)
//! - [`Breadcrumb`]: One step of the diagnostic trail
//! - [`BreadcrumbBuffer`]: Bounded FIFO of breadcrumbs
//! - [`BreadcrumbLog`]: Shared handle to a breadcrumb buffer
//! - [`value`]: JSON map helpers (deep copy, merge)
//!
//! # Example
//!
//! ```rust
//! use errscope_event::{Breadcrumb, BreadcrumbLog, Event, Level};
//!
//! let log = BreadcrumbLog::new(100);
//! log.record(Breadcrumb::new().with_category("http").with_message("GET /"));
//!
//! let mut event = Event::new().with_level(Level::Warning);
//! event.breadcrumbs = Some(log.clone());
//! assert_eq!(event.breadcrumbs.map(|b| b.len()), Some(1));
//! ```

#![warn(unreachable_pub)]

// Core modules
mod breadcrumb;
mod event;
mod level;
mod log;

/// JSON value helpers
pub mod value;

// Re-exports
pub use breadcrumb::{Breadcrumb, BreadcrumbBuffer, DEFAULT_MAX_BREADCRUMBS};
pub use event::Event;
pub use level::{Level, ParseLevelError};
pub use log::BreadcrumbLog;
pub use value::{Map, Value};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
