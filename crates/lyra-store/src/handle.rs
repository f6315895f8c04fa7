//! Store handles.
//!
//! A [`StoreHandle`] owns exactly one engine connection and one
//! [`ChangeNotifier`]. Every mutation notifies the handle's listeners
//! for the affected key *after* the engine commit returns, so observers
//! that re-read always see the committed state.

use std::sync::Arc;

use lyra_core::{StoreConfig, Value, validate_encryption_key};
use lyra_engine::StorageEngine;
use lyra_events::{ChangeNotifier, ListenerGuard};
use tracing::{debug, trace};

use crate::error::{StoreError, StoreResult};
use crate::registry;

/// A typed, observable handle onto one configured store.
///
/// Obtain handles through [`open`](Self::open) (cached by configuration
/// equality), [`default_handle`](Self::default_handle) (the process-wide
/// default store), or [`with_engine`](Self::with_engine) (uncached, for
/// injected engines).
pub struct StoreHandle {
    config: StoreConfig,
    engine: Box<dyn StorageEngine>,
    notifier: ChangeNotifier,
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle")
            .field("config", &self.config)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

impl StoreHandle {
    pub(crate) fn new(config: StoreConfig, engine: Box<dyn StorageEngine>) -> Self {
        Self {
            config,
            engine,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Open the store described by `config`.
    ///
    /// Handles are cached process-wide by configuration equality: a
    /// config equal to one opened earlier (id, path, and encryption key
    /// all equal, including all absent) returns the same handle; any
    /// difference creates a fresh handle with a fresh engine connection.
    /// Abandoned handles are not implicitly closed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the configuration is invalid.
    pub fn open(config: StoreConfig) -> StoreResult<Arc<Self>> {
        registry::open(config)
    }

    /// The process-wide default store, created lazily on first use.
    ///
    /// Backed by [`StoreConfig::default`]. The instance lives for the
    /// rest of the process — there is no teardown.
    #[must_use]
    pub fn default_handle() -> Arc<Self> {
        registry::default_handle()
    }

    /// Create a handle over an injected engine, bypassing the cache.
    ///
    /// This is how embedders wire in their native engine, and how tests
    /// get stores isolated from process-wide state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the configuration is invalid.
    pub fn with_engine(
        config: StoreConfig,
        engine: Box<dyn StorageEngine>,
    ) -> StoreResult<Arc<Self>> {
        config.validate()?;
        debug!(store_id = %config.id, "Creating store handle with injected engine");
        Ok(Arc::new(Self::new(config, engine)))
    }

    /// This handle's configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // -- Reads --

    /// Get the raw value stored under `key`.
    ///
    /// `Ok(None)` when the key is unset; absence is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Engine`] on engine failure.
    pub fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.engine.get(key)?)
    }

    /// Get a boolean. `Ok(None)` when unset or not a boolean.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Engine`] on engine failure.
    pub fn get_bool(&self, key: &str) -> StoreResult<Option<bool>> {
        Ok(self.get(key)?.and_then(|v| v.as_bool()))
    }

    /// Get a number. `Ok(None)` when unset or not a number.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Engine`] on engine failure.
    pub fn get_number(&self, key: &str) -> StoreResult<Option<f64>> {
        Ok(self.get(key)?.and_then(|v| v.as_number()))
    }

    /// Get a string. `Ok(None)` when unset or not a string.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Engine`] on engine failure.
    pub fn get_string(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.get(key)?.and_then(Value::into_string))
    }

    /// Check whether `key` is set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Engine`] on engine failure.
    pub fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.engine.contains(key)?)
    }

    /// All currently-set keys. Order is unspecified.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Engine`] on engine failure.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.engine.keys()?)
    }

    // -- Writes --

    /// Store `value` under `key` and notify listeners for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Engine`] on engine failure; listeners are
    /// not notified in that case.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> StoreResult<()> {
        let value = value.into();
        trace!(key = %key, kind = value.kind(), "set");
        self.engine.set(key, value)?;
        self.notifier.notify(key);
        Ok(())
    }

    /// Write a dynamically-typed value: the boundary for callers that
    /// hold JSON.
    ///
    /// `Bool`/`Number`/`String` are stored; `Null` deletes the key;
    /// arrays and objects fail with [`StoreError::UnsupportedType`] and
    /// leave the store unchanged. Structured data belongs on the object
    /// channel ([`set_json`](Self::set_json)) instead.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnsupportedType`] for arrays and objects,
    /// or [`StoreError::Engine`] on engine failure.
    pub fn set_dynamic(&self, key: &str, value: serde_json::Value) -> StoreResult<()> {
        match value {
            serde_json::Value::Null => {
                self.delete(key)?;
                Ok(())
            }
            other => {
                let value = Value::from_json(other)?;
                self.set(key, value)
            }
        }
    }

    /// Remove `key` and notify listeners for `key`.
    ///
    /// Notification is unconditional; observers re-read and see the key
    /// absent. Returns whether the key existed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Engine`] on engine failure; listeners are
    /// not notified in that case.
    pub fn delete(&self, key: &str) -> StoreResult<bool> {
        trace!(key = %key, "delete");
        let existed = self.engine.delete(key)?;
        self.notifier.notify(key);
        Ok(existed)
    }

    /// Remove every key, then notify listeners **per key**: each key
    /// present before the wipe is reported changed exactly once.
    ///
    /// Returns the number of keys removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Engine`] on engine failure.
    pub fn clear_all(&self) -> StoreResult<u64> {
        let keys = self.engine.keys()?;
        let count = self.engine.clear()?;
        debug!(store_id = %self.config.id, removed = count, "Store cleared");
        for key in &keys {
            self.notifier.notify(key);
        }
        Ok(count)
    }

    /// Rotate the encryption key, or decrypt to plaintext when `None`.
    ///
    /// Pure delegation to the engine; stored values are semantically
    /// unchanged, so no notification is emitted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] for an oversized key, or
    /// [`StoreError::Engine`] on engine failure.
    pub fn recrypt(&self, new_key: Option<&str>) -> StoreResult<()> {
        if let Some(key) = new_key {
            validate_encryption_key(key).map_err(StoreError::Config)?;
        }
        debug!(store_id = %self.config.id, encrypted = new_key.is_some(), "Rekeying store");
        Ok(self.engine.recrypt(new_key)?)
    }

    // -- Typed convenience (JSON object channel) --

    /// Serialize `value` as JSON and store it on the string channel.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Encode`] if serialization fails, or
    /// [`StoreError::Engine`] on engine failure.
    pub fn set_json<T: serde::Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let encoded = serde_json::to_string(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.set(key, Value::String(encoded))
    }

    /// Read and deserialize a JSON value from the string channel.
    ///
    /// `Ok(None)` when the key is unset or not a string. A stored string
    /// that fails to parse is a hard [`StoreError::Decode`] — never
    /// silently treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Decode`] on malformed JSON, or
    /// [`StoreError::Engine`] on engine failure.
    pub fn get_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        let Some(encoded) = self.get_string(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&encoded)
            .map(Some)
            .map_err(|source| StoreError::Decode {
                key: key.to_string(),
                source,
            })
    }

    // -- Observation --

    /// Register a listener invoked with the key of every mutation on
    /// this handle. The returned guard keeps the subscription alive;
    /// dropping or cancelling it removes the listener.
    ///
    /// **WARNING:** the handle owns its listener registry. Capturing an
    /// `Arc` of this handle inside the callback creates a reference
    /// cycle that lives until the guard is cancelled or dropped; capture
    /// a `std::sync::Weak` for long-lived listeners instead.
    #[must_use]
    pub fn watch<F>(&self, callback: F) -> ListenerGuard
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.notifier.subscribe(callback)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use lyra_engine::MemoryEngine;

    use super::*;

    fn test_handle(id: &str) -> Arc<StoreHandle> {
        let config = StoreConfig::new(id);
        let engine = Box::new(MemoryEngine::open(&config));
        StoreHandle::with_engine(config, engine).unwrap()
    }

    #[test]
    fn test_round_trip_each_shape() {
        let handle = test_handle("rt");

        handle.set("flag", true).unwrap();
        handle.set("user.age", 30.0).unwrap();
        handle.set("name", "ada").unwrap();

        assert_eq!(handle.get_bool("flag").unwrap(), Some(true));
        assert_eq!(handle.get_number("user.age").unwrap(), Some(30.0));
        assert_eq!(handle.get_string("name").unwrap(), Some("ada".to_string()));
    }

    #[test]
    fn test_type_mismatch_reads_absent() {
        let handle = test_handle("mismatch");
        handle.set("k", 1.5).unwrap();

        assert_eq!(handle.get_bool("k").unwrap(), None);
        assert_eq!(handle.get_string("k").unwrap(), None);
        assert_eq!(handle.get_number("k").unwrap(), Some(1.5));
    }

    #[test]
    fn test_delete_then_reads_absent() {
        let handle = test_handle("del");
        handle.set("user.age", 30.0).unwrap();

        assert!(handle.delete("user.age").unwrap());
        assert_eq!(handle.get_number("user.age").unwrap(), None);
        assert!(!handle.contains("user.age").unwrap());
        assert!(!handle.keys().unwrap().contains(&"user.age".to_string()));
    }

    #[test]
    fn test_set_notifies_after_commit() {
        let handle = test_handle("notify");
        let observed = Arc::new(Mutex::new(Vec::new()));

        let observed_in = Arc::clone(&observed);
        let reader = Arc::clone(&handle);
        let _guard = handle.watch(move |key| {
            // The mutation is already visible when the listener runs.
            let value = reader.get_number(key).unwrap();
            observed_in.lock().unwrap().push((key.to_string(), value));
        });

        handle.set("k", 7.0).unwrap();
        assert_eq!(
            *observed.lock().unwrap(),
            vec![("k".to_string(), Some(7.0))]
        );
    }

    #[test]
    fn test_delete_notifies_unconditionally() {
        let handle = test_handle("delnotify");
        let count = Arc::new(AtomicUsize::new(0));

        let count_in = Arc::clone(&count);
        let _guard = handle.watch(move |_| {
            count_in.fetch_add(1, Ordering::SeqCst);
        });

        handle.delete("never.set").unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clear_all_notifies_each_key() {
        let handle = test_handle("clear");
        handle.set("a", 1.0).unwrap();
        handle.set("b", 2.0).unwrap();

        let notified = Arc::new(Mutex::new(Vec::new()));
        let notified_in = Arc::clone(&notified);
        let _guard = handle.watch(move |key| {
            notified_in.lock().unwrap().push(key.to_string());
        });

        assert_eq!(handle.clear_all().unwrap(), 2);

        let mut keys = notified.lock().unwrap().clone();
        keys.sort();
        assert_eq!(keys, vec!["a", "b"]);
        assert!(handle.keys().unwrap().is_empty());
    }

    #[test]
    fn test_set_dynamic_dispatch() {
        let handle = test_handle("dyn");

        handle.set_dynamic("b", serde_json::json!(true)).unwrap();
        handle.set_dynamic("n", serde_json::json!(3)).unwrap();
        handle.set_dynamic("s", serde_json::json!("x")).unwrap();
        assert_eq!(handle.get_bool("b").unwrap(), Some(true));
        assert_eq!(handle.get_number("n").unwrap(), Some(3.0));
        assert_eq!(handle.get_string("s").unwrap(), Some("x".to_string()));

        // Null deletes.
        handle.set_dynamic("n", serde_json::Value::Null).unwrap();
        assert!(!handle.contains("n").unwrap());
    }

    #[test]
    fn test_unsupported_type_leaves_store_unchanged() {
        let handle = test_handle("unsupported");
        handle.set("k", "prior").unwrap();

        let err = handle
            .set_dynamic("k", serde_json::json!({"nested": 1}))
            .unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedType(_)));

        assert_eq!(handle.get_string("k").unwrap(), Some("prior".to_string()));
    }

    #[test]
    fn test_json_channel_round_trip() {
        #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
        struct Profile {
            a: u32,
        }

        let handle = test_handle("json");
        handle.set_json("profile", &Profile { a: 1 }).unwrap();

        let loaded: Profile = handle.get_json("profile").unwrap().unwrap();
        assert_eq!(loaded, Profile { a: 1 });

        // The object rides the string channel.
        assert!(handle.get_string("profile").unwrap().is_some());
    }

    #[test]
    fn test_json_channel_malformed_is_hard_error() {
        let handle = test_handle("badjson");
        handle.set("payload", "{not json").unwrap();

        let err = handle.get_json::<serde_json::Value>("payload").unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
    }

    #[test]
    fn test_json_channel_missing_is_none() {
        let handle = test_handle("nojson");
        let loaded: Option<serde_json::Value> = handle.get_json("missing").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_recrypt_validates_key_length() {
        let handle = test_handle("recrypt");
        handle.recrypt(Some("shortkey")).unwrap();
        handle.recrypt(None).unwrap();

        let err = handle.recrypt(Some("0123456789abcdef0")).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn test_recrypt_does_not_notify() {
        let handle = test_handle("recryptsilent");
        let count = Arc::new(AtomicUsize::new(0));

        let count_in = Arc::clone(&count);
        let _guard = handle.watch(move |_| {
            count_in.fetch_add(1, Ordering::SeqCst);
        });

        handle.recrypt(Some("k")).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_listener_mutating_from_callback() {
        let handle = test_handle("reentrant");
        let writer = Arc::clone(&handle);
        let _guard = handle.watch(move |key| {
            if key == "trigger" {
                writer.set("derived", 1.0).unwrap();
            }
        });

        handle.set("trigger", 0.0).unwrap();
        // The secondary mutation committed and its notification fired.
        assert_eq!(handle.get_number("derived").unwrap(), Some(1.0));
    }
}
