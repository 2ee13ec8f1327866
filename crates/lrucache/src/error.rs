//! Error types for lrucache

use thiserror::Error;

/// Result type alias for lrucache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache operations
///
/// Misses, hits and evictions are outcomes, not errors. The only fallible
/// engine operation is resizing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A negative capacity was passed to `set_capacity`
    #[error("Invalid capacity: {0} (must be >= 0)")]
    NegativeCapacity(i64),
}
