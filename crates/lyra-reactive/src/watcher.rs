//! Direct key-change watchers.

use std::sync::{Arc, RwLock};

use lyra_events::ListenerGuard;
use lyra_store::StoreHandle;

/// The currently-installed callback. Swapped atomically under the slot's
/// lock; invoked after the lock is released.
type CallbackSlot = Arc<RwLock<Arc<dyn Fn(&str) + Send + Sync>>>;

/// A direct "any key changed" subscription on a store handle.
///
/// Unlike a [`BoundValue`](crate::BoundValue) there is no cached value;
/// the callback just receives every changed key. The subscription is
/// keyed to the watcher's lifetime, not to the callback installed at
/// subscribe time: [`set_callback`](Self::set_callback) swaps the
/// callback without touching the underlying registration, and the most
/// recently installed callback is always the one invoked. Dropping the
/// watcher cancels the subscription.
pub struct KeyWatcher {
    slot: CallbackSlot,
    guard: ListenerGuard,
}

impl std::fmt::Debug for KeyWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyWatcher")
            .field("cancelled", &self.guard.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl KeyWatcher {
    /// Watch every key change on `handle`.
    #[must_use]
    pub fn new<F>(handle: &StoreHandle, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let slot: CallbackSlot = Arc::new(RwLock::new(Arc::new(callback)));

        let slot_in_listener = Arc::clone(&slot);
        let guard = handle.watch(move |key| {
            // Take the current callback, then invoke it lock-free so it
            // may itself call set_callback without deadlocking.
            let current = Arc::clone(&*slot_in_listener.read().expect("lock poisoned"));
            current(key);
        });

        Self { slot, guard }
    }

    /// Watch every key change on the process-wide default store.
    #[must_use]
    pub fn on_default<F>(callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self::new(&StoreHandle::default_handle(), callback)
    }

    /// Replace the callback. The subscription itself is untouched —
    /// subsequent notifications invoke the new callback.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_callback<F>(&self, callback: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        *self.slot.write().expect("lock poisoned") = Arc::new(callback);
    }

    /// Cancel the subscription. Idempotent; after this returns the
    /// callback never fires again.
    pub fn cancel(&self) {
        self.guard.cancel();
    }

    /// Whether the subscription has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.guard.is_cancelled()
    }
}
