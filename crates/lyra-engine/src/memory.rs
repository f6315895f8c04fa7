//! In-memory engine implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use lyra_core::{StoreConfig, Value};
use tracing::debug;

use crate::engine::{StorageEngine, validate_key};
use crate::error::{EngineError, EngineResult};

/// In-memory storage engine for tests and ephemeral stores.
///
/// Holds the [`Value`] union directly in a `HashMap`. Each instance is
/// an independent store: two `MemoryEngine`s never share data, which is
/// what gives distinctly-configured handles their isolation.
///
/// `recrypt` records the active key but performs no transformation —
/// values are memory-resident and semantically unchanged, matching the
/// trait's contract.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    data: RwLock<HashMap<String, Value>>,
    crypt_key: RwLock<Option<String>>,
}

impl MemoryEngine {
    /// Create a new empty in-memory engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine for the given configuration.
    ///
    /// The configured encryption key becomes the active key; the path is
    /// ignored (nothing is memory-mapped from disk here).
    #[must_use]
    pub fn open(config: &StoreConfig) -> Self {
        debug!(store_id = %config.id, "Opening in-memory engine");
        Self {
            data: RwLock::new(HashMap::new()),
            crypt_key: RwLock::new(config.encryption_key.clone()),
        }
    }

    /// The currently-active encryption key, if any.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Internal`] if the internal lock is poisoned.
    pub fn active_encryption_key(&self) -> EngineResult<Option<String>> {
        let key = self
            .crypt_key
            .read()
            .map_err(|e| EngineError::Internal(e.to_string()))?;
        Ok(key.clone())
    }
}

impl StorageEngine for MemoryEngine {
    fn get(&self, key: &str) -> EngineResult<Option<Value>> {
        validate_key(key)?;
        let data = self
            .data
            .read()
            .map_err(|e| EngineError::Internal(e.to_string()))?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> EngineResult<()> {
        validate_key(key)?;
        let mut data = self
            .data
            .write()
            .map_err(|e| EngineError::Internal(e.to_string()))?;
        data.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> EngineResult<bool> {
        validate_key(key)?;
        let mut data = self
            .data
            .write()
            .map_err(|e| EngineError::Internal(e.to_string()))?;
        Ok(data.remove(key).is_some())
    }

    fn contains(&self, key: &str) -> EngineResult<bool> {
        validate_key(key)?;
        let data = self
            .data
            .read()
            .map_err(|e| EngineError::Internal(e.to_string()))?;
        Ok(data.contains_key(key))
    }

    fn keys(&self) -> EngineResult<Vec<String>> {
        let data = self
            .data
            .read()
            .map_err(|e| EngineError::Internal(e.to_string()))?;
        Ok(data.keys().cloned().collect())
    }

    fn clear(&self) -> EngineResult<u64> {
        let mut data = self
            .data
            .write()
            .map_err(|e| EngineError::Internal(e.to_string()))?;
        let count = data.len() as u64;
        data.clear();
        Ok(count)
    }

    fn recrypt(&self, new_key: Option<&str>) -> EngineResult<()> {
        let mut key = self
            .crypt_key
            .write()
            .map_err(|e| EngineError::Internal(e.to_string()))?;
        *key = new_key.map(String::from);
        debug!(encrypted = key.is_some(), "Engine rekeyed");
        Ok(())
    }
}
