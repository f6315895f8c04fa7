//! The change-notification dispatcher.

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};

use tracing::{trace, warn};

use crate::listener::{ListenerGuard, ListenerId};

/// A registered listener: its callback and cancellation flag.
pub(crate) struct ListenerEntry {
    callback: Box<dyn Fn(&str) + Send + Sync>,
    pub(crate) cancelled: AtomicBool,
}

impl std::fmt::Debug for ListenerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("cancelled", &self.cancelled)
            .finish_non_exhaustive()
    }
}

/// Shared registry state. `ChangeNotifier` clones share one of these.
#[derive(Default)]
pub(crate) struct NotifierInner {
    listeners: RwLock<HashMap<ListenerId, Arc<ListenerEntry>>>,
}

impl NotifierInner {
    pub(crate) fn remove(&self, id: ListenerId) {
        let mut listeners = self.listeners.write().expect("lock poisoned");
        listeners.remove(&id);
    }
}

/// Fan-out dispatcher of "key changed" notifications.
///
/// Owned by a store handle; invoked after each mutation commits. All
/// registered listeners receive every notification — fan-out, not
/// single-consumer. Delivery order across listeners is unspecified.
///
/// Cloning shares the same listener registry.
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    inner: Arc<NotifierInner>,
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self
            .inner
            .listeners
            .read()
            .map(|l| l.len())
            .unwrap_or_default();
        f.debug_struct("ChangeNotifier")
            .field("listener_count", &count)
            .finish()
    }
}

impl ChangeNotifier {
    /// Create a new notifier with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    ///
    /// The callback receives the changed key. It is invoked synchronously
    /// on the mutating thread, with no registry lock held, so it may
    /// mutate the store or manage subscriptions (itself included).
    ///
    /// Returns the guard that keeps the subscription alive; dropping or
    /// cancelling it removes the listener.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn subscribe<F>(&self, callback: F) -> ListenerGuard
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let id = ListenerId::new();
        let entry = Arc::new(ListenerEntry {
            callback: Box::new(callback),
            cancelled: AtomicBool::new(false),
        });

        let mut listeners = self.inner.listeners.write().expect("lock poisoned");
        listeners.insert(id, Arc::clone(&entry));
        drop(listeners);

        trace!(listener_id = ?id, "Listener registered");
        ListenerGuard::new(id, entry, Arc::downgrade(&self.inner))
    }

    /// Deliver a "key changed" notification to every registered listener.
    ///
    /// The listener list is snapshotted under a read lock, the lock is
    /// released, and callbacks run lock-free after that — re-entrant
    /// mutation from a callback nests another delivery rather than
    /// deadlocking. Each entry's cancelled flag is checked immediately
    /// before its invocation. Listeners registered while a delivery is in
    /// progress receive the next notification, not the current one.
    ///
    /// A panicking listener is isolated and logged; remaining listeners
    /// are still invoked.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn notify(&self, key: &str) {
        let snapshot: Vec<(ListenerId, Arc<ListenerEntry>)> = {
            let listeners = self.inner.listeners.read().expect("lock poisoned");
            listeners
                .iter()
                .map(|(id, entry)| (*id, Arc::clone(entry)))
                .collect()
        };

        for (id, entry) in snapshot {
            if entry.cancelled.load(std::sync::atomic::Ordering::SeqCst) {
                continue;
            }

            trace!(listener_id = ?id, key = %key, "Notifying listener");

            // Catch panics to prevent one listener from affecting others
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                (entry.callback)(key);
            }));

            if let Err(e) = result {
                warn!(listener_id = ?id, key = %key, error = ?e, "Listener panicked");
            }
        }
    }

    /// Number of registered (not yet cancelled) listeners.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.listeners.read().expect("lock poisoned").len()
    }

    /// Whether no listeners are registered.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.listeners.read().expect("lock poisoned").is_empty()
    }
}
