//! Listener registration handles.

use std::sync::Weak;
use std::sync::atomic::Ordering;

use uuid::Uuid;

use crate::notifier::{ListenerEntry, NotifierInner};

/// Registration handle for a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    /// Create a new listener ID.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Cancellation handle for a registered listener.
///
/// Returned by [`ChangeNotifier::subscribe`](crate::ChangeNotifier::subscribe).
/// Cancelling removes the listener; after [`cancel`](Self::cancel) returns,
/// the callback never fires again — including for notifications already
/// in flight at cancellation time that have not yet been delivered.
///
/// The guard also cancels on drop, so holding it is what keeps the
/// subscription alive. Cancellation is idempotent: registering and
/// immediately cancelling is safe and leaves no residual invocation.
#[derive(Debug)]
pub struct ListenerGuard {
    id: ListenerId,
    entry: std::sync::Arc<ListenerEntry>,
    inner: Weak<NotifierInner>,
}

impl ListenerGuard {
    pub(crate) fn new(
        id: ListenerId,
        entry: std::sync::Arc<ListenerEntry>,
        inner: Weak<NotifierInner>,
    ) -> Self {
        Self { id, entry, inner }
    }

    /// The listener's registration id.
    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether this listener has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.entry.cancelled.load(Ordering::SeqCst)
    }

    /// Cancel the listener.
    ///
    /// Idempotent. The cancelled flag is set before the registry entry is
    /// removed, so delivery snapshots taken earlier also observe it.
    ///
    /// # Panics
    ///
    /// Panics if the notifier's internal lock is poisoned.
    pub fn cancel(&self) {
        if self.entry.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(inner) = self.inner.upgrade() {
            inner.remove(self.id);
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.cancel();
    }
}
