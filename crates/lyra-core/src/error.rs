//! Boundary error types.

use thiserror::Error;

/// A write attempted to cross the boundary with a value outside the
/// native union {boolean, number, string}.
///
/// Raised synchronously at the point of conversion; the store is left
/// unchanged. Never silently coerced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported value type: {kind} (expected boolean, number, or string)")]
pub struct UnsupportedTypeError {
    /// The offending shape (`"null"`, `"array"`, `"object"`, ...).
    pub kind: &'static str,
}

impl UnsupportedTypeError {
    /// Create an error naming the offending shape.
    #[must_use]
    pub fn new(kind: &'static str) -> Self {
        Self { kind }
    }
}

/// Store configuration was malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The store identifier is empty.
    #[error("store id must not be empty")]
    EmptyId,

    /// The encryption key exceeds the engine's fixed-size key slot.
    #[error("encryption key too long: {len} bytes (max {max})")]
    EncryptionKeyTooLong {
        /// Length of the rejected key in bytes.
        len: usize,
        /// The accepted maximum.
        max: usize,
    },
}
