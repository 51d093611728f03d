//! Error types for the billfold-core library.
//!
//! The extraction pipelines themselves are total functions and expose no
//! error type; these cover the outer surfaces: record construction,
//! configuration, and the categorization collaborator.

use thiserror::Error;

/// Main error type for the billfold library.
#[derive(Error, Debug)]
pub enum BillfoldError {
    /// Record constructor validation error.
    #[error("record error: {0}")]
    Record(#[from] RecordError),

    /// Categorization collaborator error.
    #[error("categorization error: {0}")]
    Categorize(#[from] CategorizeError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by record constructors when an invariant is violated.
#[derive(Error, Debug)]
pub enum RecordError {
    /// Monetary amounts are stored as non-negative magnitudes.
    #[error("negative amount: {value}")]
    NegativeAmount { value: String },

    /// Item quantities are positive integers.
    #[error("invalid quantity: {value}")]
    InvalidQuantity { value: u32 },
}

/// Errors from the downstream categorization collaborator. Callers fall back
/// to uncategorized defaults rather than propagating these.
#[derive(Error, Debug)]
pub enum CategorizeError {
    /// The collaborator could not be reached.
    #[error("categorizer unavailable: {0}")]
    Unavailable(String),

    /// The collaborator returned a response that does not match the
    /// contract.
    #[error("invalid categorizer response: {0}")]
    InvalidResponse(String),
}

/// Result type for the billfold library.
pub type Result<T> = std::result::Result<T, BillfoldError>;
