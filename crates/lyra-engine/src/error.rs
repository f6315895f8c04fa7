//! Engine error types.

/// Errors from engine operations.
///
/// The binding layer adds no retry or recovery logic around these —
/// engine failures surface to callers unmodified.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// An engine operation failed.
    #[error("engine error: {0}")]
    Internal(String),

    /// The engine connection could not be established.
    #[error("connection error: {0}")]
    Connection(String),

    /// The storage key is invalid.
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
