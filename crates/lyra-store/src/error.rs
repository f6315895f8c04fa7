//! Store error types.

use lyra_core::{ConfigError, UnsupportedTypeError};
use lyra_engine::EngineError;

/// Errors from store operations.
///
/// Absence is never represented here — a read of an unset or
/// type-mismatched key yields `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A write attempted a value outside {boolean, number, string, absent}.
    /// Surfaced synchronously; the store is left unchanged.
    #[error(transparent)]
    UnsupportedType(#[from] UnsupportedTypeError),

    /// A stored string on the object channel failed to parse as JSON.
    #[error("decode failure for key \"{key}\": {source}")]
    Decode {
        /// The key whose stored string was malformed.
        key: String,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A value failed to serialize for the object channel.
    #[error("encode failure for key \"{key}\": {source}")]
    Encode {
        /// The key the value was being written under.
        key: String,
        /// The underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// The store configuration was malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The engine failed; passed through unmodified.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
