//! Per-key bound values.

use std::sync::{Arc, RwLock, Weak};

use lyra_core::Value;
use lyra_events::ListenerGuard;
use lyra_store::{StoreHandle, StoreResult};
use tracing::warn;

/// The cached view shared between a binding and its listener closure.
type Cell = Arc<RwLock<Option<Value>>>;

/// A cached view of one key on one store handle, kept in sync by the
/// store's change notifications.
///
/// The cached value equals `get(key)` on the bound store whenever it is
/// observed; a local write closes its in-flight window before the write
/// call returns (the underlying engine commits synchronously). Dropping
/// the binding cancels its subscription.
pub struct BoundValue {
    handle: Arc<StoreHandle>,
    key: String,
    cell: Cell,
    guard: ListenerGuard,
}

impl std::fmt::Debug for BoundValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundValue")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Subscribe a fresh cell to `key` on `handle`, then load the initial
/// value. Subscribing first means a mutation racing the initial read is
/// re-read rather than missed.
///
/// The closure captures the handle weakly — the handle owns the listener
/// registry, and a strong capture would cycle.
fn bind(handle: &Arc<StoreHandle>, key: &str) -> StoreResult<(Cell, ListenerGuard)> {
    let cell: Cell = Arc::new(RwLock::new(None));
    let bound_key = key.to_string();
    let weak_handle = Arc::downgrade(handle);
    let cell_in_listener = Arc::clone(&cell);

    let guard = handle.watch(move |changed| {
        if changed != bound_key {
            return;
        }
        let Some(handle) = Weak::upgrade(&weak_handle) else {
            return;
        };
        match handle.get(&bound_key) {
            Ok(fresh) => {
                *cell_in_listener.write().expect("lock poisoned") = fresh;
            }
            Err(e) => {
                warn!(key = %bound_key, error = %e, "Re-read after change failed");
            }
        }
    });

    *cell.write().expect("lock poisoned") = handle.get(key)?;
    Ok((cell, guard))
}

impl BoundValue {
    /// Bind to `key` on `handle`.
    ///
    /// Performs one synchronous read to initialize the cache, then stays
    /// subscribed to the handle's change notifications.
    ///
    /// # Errors
    ///
    /// Returns [`lyra_store::StoreError::Engine`] if the initial read
    /// fails.
    pub fn new(handle: &Arc<StoreHandle>, key: impl Into<String>) -> StoreResult<Self> {
        let key = key.into();
        let (cell, guard) = bind(handle, &key)?;
        Ok(Self {
            handle: Arc::clone(handle),
            key,
            cell,
            guard,
        })
    }

    /// The bound key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The bound store handle.
    #[must_use]
    pub fn handle(&self) -> &Arc<StoreHandle> {
        &self.handle
    }

    /// The cached value. `None` when the key is absent.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn get(&self) -> Option<Value> {
        self.cell.read().expect("lock poisoned").clone()
    }

    /// Write through to the store.
    ///
    /// The change notification fired by the store re-reads the committed
    /// value into the cache before this returns, so the cache never
    /// trusts the locally-applied value.
    ///
    /// # Errors
    ///
    /// Returns [`lyra_store::StoreError::Engine`] on engine failure.
    pub fn set(&self, value: impl Into<Value>) -> StoreResult<()> {
        self.handle.set(&self.key, value)
    }

    /// Delete the bound key.
    ///
    /// # Errors
    ///
    /// Returns [`lyra_store::StoreError::Engine`] on engine failure.
    pub fn remove(&self) -> StoreResult<()> {
        self.handle.delete(&self.key)?;
        Ok(())
    }

    /// Write a dynamically-typed value: scalars are stored, `Null`
    /// deletes, arrays and objects fail with
    /// [`lyra_store::StoreError::UnsupportedType`], surfaced
    /// synchronously with store and cache unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`lyra_store::StoreError::UnsupportedType`] for
    /// structured shapes, or [`lyra_store::StoreError::Engine`] on
    /// engine failure.
    pub fn set_dynamic(&self, value: serde_json::Value) -> StoreResult<()> {
        self.handle.set_dynamic(&self.key, value)
    }

    /// Compute the next value from the cached one, then write through.
    ///
    /// The previous value is the binding's cache, not a fresh store
    /// read. Returning `None` deletes the key.
    ///
    /// # Errors
    ///
    /// Returns [`lyra_store::StoreError::Engine`] on engine failure.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn update_with<F>(&self, f: F) -> StoreResult<()>
    where
        F: FnOnce(Option<&Value>) -> Option<Value>,
    {
        let prev = self.cell.read().expect("lock poisoned").clone();
        match f(prev.as_ref()) {
            Some(next) => self.set(next),
            None => self.remove(),
        }
    }

    /// Rebind to a different key on the same handle.
    ///
    /// The old subscription is cancelled before the new one is created;
    /// a stale notification for the old key can never update the new
    /// cache. Initialization re-runs against the new key.
    ///
    /// # Errors
    ///
    /// Returns [`lyra_store::StoreError::Engine`] if the initial read of
    /// the new key fails; the old subscription stays cancelled.
    pub fn rebind(&mut self, key: impl Into<String>) -> StoreResult<()> {
        let handle = Arc::clone(&self.handle);
        self.rebind_to(&handle, key)
    }

    /// Rebind to a (possibly different) handle and key.
    ///
    /// # Errors
    ///
    /// Returns [`lyra_store::StoreError::Engine`] if the initial read of
    /// the new pair fails; the old subscription stays cancelled.
    pub fn rebind_to(
        &mut self,
        handle: &Arc<StoreHandle>,
        key: impl Into<String>,
    ) -> StoreResult<()> {
        let key = key.into();
        self.guard.cancel();
        let (cell, guard) = bind(handle, &key)?;
        self.handle = Arc::clone(handle);
        self.key = key;
        self.cell = cell;
        self.guard = guard;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use lyra_core::StoreConfig;
    use lyra_engine::MemoryEngine;

    use super::*;

    fn test_handle(id: &str) -> Arc<StoreHandle> {
        let config = StoreConfig::new(id);
        let engine = Box::new(MemoryEngine::open(&config));
        StoreHandle::with_engine(config, engine).unwrap()
    }

    #[test]
    fn test_initializes_from_current_value() {
        let handle = test_handle("bound.init");
        handle.set("k", 5.0).unwrap();

        let bound = BoundValue::new(&handle, "k").unwrap();
        assert_eq!(bound.get(), Some(Value::Number(5.0)));

        let absent = BoundValue::new(&handle, "unset").unwrap();
        assert_eq!(absent.get(), None);
    }

    #[test]
    fn test_local_write_lands_in_cache() {
        let handle = test_handle("bound.write");
        let bound = BoundValue::new(&handle, "k").unwrap();

        bound.set("hello").unwrap();
        assert_eq!(bound.get(), Some(Value::String("hello".into())));

        bound.remove().unwrap();
        assert_eq!(bound.get(), None);
    }

    #[test]
    fn test_external_write_is_observed() {
        let handle = test_handle("bound.external");
        let bound = BoundValue::new(&handle, "k").unwrap();

        handle.set("k", true).unwrap();
        assert_eq!(bound.get(), Some(Value::Bool(true)));

        handle.delete("k").unwrap();
        assert_eq!(bound.get(), None);
    }

    #[test]
    fn test_two_bindings_stay_in_sync() {
        let handle = test_handle("bound.pair");
        let a = BoundValue::new(&handle, "k").unwrap();
        let b = BoundValue::new(&handle, "k").unwrap();

        a.set(1.0).unwrap();
        assert_eq!(b.get(), Some(Value::Number(1.0)));

        b.set(2.0).unwrap();
        assert_eq!(a.get(), Some(Value::Number(2.0)));
    }

    #[test]
    fn test_unrelated_key_does_not_touch_cache() {
        let handle = test_handle("bound.unrelated");
        let bound = BoundValue::new(&handle, "k").unwrap();
        bound.set(1.0).unwrap();

        handle.set("other", 9.0).unwrap();
        assert_eq!(bound.get(), Some(Value::Number(1.0)));
    }

    #[test]
    fn test_update_with_resolves_against_cache() {
        let handle = test_handle("bound.update");
        let bound = BoundValue::new(&handle, "counter").unwrap();
        bound.set(1.0).unwrap();

        bound
            .update_with(|prev| {
                let current = prev.and_then(Value::as_number).unwrap_or(0.0);
                Some(Value::Number(current + 1.0))
            })
            .unwrap();
        assert_eq!(bound.get(), Some(Value::Number(2.0)));

        // Returning None deletes.
        bound.update_with(|_| None).unwrap();
        assert_eq!(bound.get(), None);
        assert!(!handle.contains("counter").unwrap());
    }

    #[test]
    fn test_set_dynamic_surfaces_unsupported_type() {
        let handle = test_handle("bound.dyn");
        let bound = BoundValue::new(&handle, "k").unwrap();
        bound.set("prior").unwrap();

        let err = bound.set_dynamic(serde_json::json!([1, 2])).unwrap_err();
        assert!(matches!(
            err,
            lyra_store::StoreError::UnsupportedType(_)
        ));
        // Store and cache unchanged.
        assert_eq!(bound.get(), Some(Value::String("prior".into())));

        bound.set_dynamic(serde_json::Value::Null).unwrap();
        assert_eq!(bound.get(), None);
    }

    #[test]
    fn test_rebind_switches_key_and_drops_stale_updates() {
        let handle = test_handle("bound.rebind");
        handle.set("old", 1.0).unwrap();
        handle.set("new", 2.0).unwrap();

        let mut bound = BoundValue::new(&handle, "old").unwrap();
        assert_eq!(bound.get(), Some(Value::Number(1.0)));

        bound.rebind("new").unwrap();
        assert_eq!(bound.get(), Some(Value::Number(2.0)));

        // A mutation of the old key must not reach the rebound cache.
        handle.set("old", 99.0).unwrap();
        assert_eq!(bound.get(), Some(Value::Number(2.0)));

        // The new key still updates.
        handle.set("new", 3.0).unwrap();
        assert_eq!(bound.get(), Some(Value::Number(3.0)));
    }

    #[test]
    fn test_rebind_to_other_handle() {
        let first = test_handle("bound.handle.a");
        let second = test_handle("bound.handle.b");
        first.set("k", 1.0).unwrap();
        second.set("k", 2.0).unwrap();

        let mut bound = BoundValue::new(&first, "k").unwrap();
        bound.rebind_to(&second, "k").unwrap();
        assert_eq!(bound.get(), Some(Value::Number(2.0)));

        // Mutations on the old handle no longer land.
        first.set("k", 50.0).unwrap();
        assert_eq!(bound.get(), Some(Value::Number(2.0)));
    }

    #[test]
    fn test_drop_cancels_subscription() {
        let handle = test_handle("bound.drop");
        let bound = BoundValue::new(&handle, "k").unwrap();
        drop(bound);

        // No listener left behind; mutations proceed without observers.
        handle.set("k", 1.0).unwrap();
    }
}
