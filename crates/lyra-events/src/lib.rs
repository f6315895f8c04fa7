//! Lyra Events — change-notification fan-out.
//!
//! This crate provides:
//! - [`ChangeNotifier`], the per-store dispatcher of "key changed" events
//! - [`ListenerGuard`], the cancellation handle returned on subscribe
//!
//! # Architecture
//!
//! Each store handle owns one `ChangeNotifier`. After a mutation commits,
//! the store calls [`notify`](ChangeNotifier::notify) with the changed
//! key, and the notifier invokes every registered listener synchronously.
//!
//! Delivery holds no lock across listener callbacks: the listener list is
//! snapshotted under a read lock, the lock is released, and only then are
//! callbacks invoked. A listener may therefore mutate the store, register
//! or cancel listeners (itself included) from inside its callback without
//! deadlocking. Each entry's cancelled flag is re-checked immediately
//! before its invocation, so a completed cancellation suppresses delivery
//! even for notifications already snapshotted.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use lyra_events::ChangeNotifier;
//!
//! let notifier = ChangeNotifier::new();
//! let seen = Arc::new(AtomicUsize::new(0));
//!
//! let seen_in_listener = Arc::clone(&seen);
//! let guard = notifier.subscribe(move |_key| {
//!     seen_in_listener.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! notifier.notify("user.age");
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//!
//! guard.cancel();
//! notifier.notify("user.age");
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod listener;
mod notifier;

pub use listener::{ListenerGuard, ListenerId};
pub use notifier::ChangeNotifier;
