//! Error types for fact discovery

/// Errors from the process-wide fact cache
#[derive(Debug, thiserror::Error)]
pub enum FactsError {
    /// A provider was installed after the global cache was created
    #[error("fact cache already initialized")]
    AlreadyInitialized,
}
