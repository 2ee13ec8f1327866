//! Error types for ctorcache

use thiserror::Error;

/// Result type alias for ctorcache operations
pub type Result<T> = std::result::Result<T, FactoryError>;

/// Errors surfaced by the factory memoizers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// The signature is empty or has an unsupported number of types
    #[error("Invalid signature: {0}")]
    InvalidSignature(#[from] SignatureError),

    /// The selector index lies outside the signature
    #[error("Index {index} out of range for a signature of length {len}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Length of the signature
        len: usize,
    },

    /// An element did not have the type the signature names
    #[error("Type mismatch: expected a value of type {expected}")]
    TypeMismatch {
        /// Name of the expected type
        expected: &'static str,
    },

    /// Two entries handed to a map constructor share a key
    #[error("Duplicate key at position {0}")]
    DuplicateKey(usize),

    /// The compiler service failed; passed through as is
    #[error(transparent)]
    Compilation(#[from] CompileError),

    /// The underlying cache rejected an operation
    #[error(transparent)]
    Cache(#[from] lrucache::Error),
}

/// Reasons a type signature is rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// No types at all
    #[error("signature is empty")]
    Empty,

    /// More types than any constructor family supports
    #[error("too many type parameters ({len}), the maximum is {max}")]
    TooLong {
        /// Number of types given
        len: usize,
        /// Largest supported arity
        max: usize,
    },

    /// A length the target family cannot construct
    #[error("{len} type parameters given, expected {min} to {max}")]
    Arity {
        /// Number of types given
        len: usize,
        /// Smallest arity of the family
        min: usize,
        /// Largest arity of the family
        max: usize,
    },
}

/// Failures of the compiler service
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// No kernels are registered for the type
    #[error("Type {0} is not registered")]
    Unregistered(&'static str),

    /// No map kernel is registered for the key/value pair
    #[error("No map constructor registered for ({key}, {value})")]
    UnregisteredMap {
        /// Key type name
        key: &'static str,
        /// Value type name
        value: &'static str,
    },

    /// The family cannot build a shape with this many types
    #[error("{family} constructors cannot take {len} type parameters")]
    Unsupported {
        /// Constructor family
        family: &'static str,
        /// Number of types given
        len: usize,
    },

    /// Failure reported by a custom compiler
    #[error("Compilation failed: {0}")]
    Failed(String),
}
