//! The storage engine trait.

use lyra_core::Value;

use crate::error::{EngineError, EngineResult};

/// Validate that a key is safe for storage.
///
/// Keys must be non-empty and must not contain the null byte (reserved
/// by native engines as an internal separator).
///
/// # Errors
///
/// Returns [`EngineError::InvalidKey`] for an empty key or a key
/// containing null bytes.
pub fn validate_key(key: &str) -> EngineResult<()> {
    if key.is_empty() {
        return Err(EngineError::InvalidKey("key must not be empty".into()));
    }
    if key.contains('\0') {
        return Err(EngineError::InvalidKey(
            "key must not contain null bytes".into(),
        ));
    }
    Ok(())
}

/// The contract the external storage engine is consumed through.
///
/// Implementations wrap one native engine connection. Every operation is
/// synchronous, individually atomic, and serializable with respect to
/// the other operations on the same connection; mutations are visible to
/// subsequent reads on the same connection as soon as the call returns.
///
/// The engine stores the closed [`Value`] union directly. Typed access
/// (absent on shape mismatch) is realized by the store layer above.
pub trait StorageEngine: Send + Sync {
    /// Get the value stored under `key`.
    ///
    /// Returns `None` if the key is unset — absence is not an error.
    ///
    /// # Errors
    ///
    /// Returns an engine failure, passed through unmodified.
    fn get(&self, key: &str) -> EngineResult<Option<Value>>;

    /// Store `value` under `key`, overwriting any existing value.
    ///
    /// # Errors
    ///
    /// Returns an engine failure, passed through unmodified.
    fn set(&self, key: &str, value: Value) -> EngineResult<()>;

    /// Remove `key`.
    ///
    /// Returns `true` if the key existed and was removed.
    ///
    /// # Errors
    ///
    /// Returns an engine failure, passed through unmodified.
    fn delete(&self, key: &str) -> EngineResult<bool>;

    /// Check whether `key` is set.
    ///
    /// # Errors
    ///
    /// Returns an engine failure, passed through unmodified.
    fn contains(&self, key: &str) -> EngineResult<bool>;

    /// All currently-set keys. Order is unspecified.
    ///
    /// # Errors
    ///
    /// Returns an engine failure, passed through unmodified.
    fn keys(&self) -> EngineResult<Vec<String>>;

    /// Remove every key. Returns the number of keys removed.
    ///
    /// # Errors
    ///
    /// Returns an engine failure, passed through unmodified.
    fn clear(&self) -> EngineResult<u64>;

    /// Rotate the encryption key, or decrypt to plaintext when `None`.
    ///
    /// Stored values are semantically unchanged by this operation.
    ///
    /// # Errors
    ///
    /// Returns an engine failure (e.g. key misuse), passed through
    /// unmodified.
    fn recrypt(&self, new_key: Option<&str>) -> EngineResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key_rejects_empty() {
        assert!(validate_key("").is_err());
    }

    #[test]
    fn test_validate_key_rejects_null_byte() {
        assert!(validate_key("k\0bad").is_err());
    }

    #[test]
    fn test_validate_key_accepts_dotted_keys() {
        validate_key("user.age").unwrap();
    }
}
