//! Store configuration.
//!
//! A configuration is the identity of a store. Two handles are
//! interchangeable iff their configurations compare equal — id, path,
//! and encryption key all equal, including both being absent. The store
//! crate keys its handle cache on this equality.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Identifier of the default store.
pub const DEFAULT_STORE_ID: &str = "lyra.default";

/// Longest accepted encryption key, in bytes.
///
/// The bound comes from the native engine's fixed-size key slot; longer
/// keys are rejected here rather than silently truncated there.
pub const MAX_ENCRYPTION_KEY_LEN: usize = 16;

/// Validate an encryption key against the engine's bound.
///
/// # Errors
///
/// Returns [`ConfigError::EncryptionKeyTooLong`] if the key exceeds
/// [`MAX_ENCRYPTION_KEY_LEN`] bytes.
pub fn validate_encryption_key(key: &str) -> Result<(), ConfigError> {
    if key.len() > MAX_ENCRYPTION_KEY_LEN {
        return Err(ConfigError::EncryptionKeyTooLong {
            len: key.len(),
            max: MAX_ENCRYPTION_KEY_LEN,
        });
    }
    Ok(())
}

/// Configuration for opening a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store identifier. Distinct ids are distinct stores.
    pub id: String,

    /// Optional root path for the engine's backing files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Optional encryption key, at most [`MAX_ENCRYPTION_KEY_LEN`] bytes.
    /// Absent means the store is plaintext.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_key: Option<String>,
}

impl StoreConfig {
    /// Configuration with the given id and no path or encryption key.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: None,
            encryption_key: None,
        }
    }

    /// Set the root path for the engine's backing files.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the encryption key. Validated by [`validate`](Self::validate).
    #[must_use]
    pub fn with_encryption_key(mut self, key: impl Into<String>) -> Self {
        self.encryption_key = Some(key.into());
        self
    }

    /// Check the configuration's invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyId`] for an empty id, or
    /// [`ConfigError::EncryptionKeyTooLong`] for an oversized key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.is_empty() {
            return Err(ConfigError::EmptyId);
        }
        if let Some(key) = &self.encryption_key {
            validate_encryption_key(key)?;
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_ID)
    }
}
