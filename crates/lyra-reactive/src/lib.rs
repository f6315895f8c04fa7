//! Lyra Reactive — per-key bindings that stay in sync with a store.
//!
//! This crate provides:
//! - [`BoundValue`], a cached view of one key kept fresh by the store's
//!   change notifications
//! - [`JsonBound`], the object binding layered on the string channel
//! - [`KeyWatcher`], a direct any-key subscription with a swappable
//!   callback
//!
//! # Architecture
//!
//! A binding initializes with one synchronous read, then lets the
//! store's [`ChangeNotifier`](lyra_events::ChangeNotifier) drive it:
//! every mutation of the bound key (from this binding, another binding
//! on the same key, or any other writer on the handle) triggers a
//! re-read from the store into the binding's cache. The store, not the
//! locally-applied value, is the single source of truth; a binding's own
//! writes round-trip through the same path, so an engine that coerces or
//! rejects a value cannot leave the cache diverged.
//!
//! # Example
//!
//! ```rust
//! use lyra_core::StoreConfig;
//! use lyra_engine::MemoryEngine;
//! use lyra_reactive::BoundValue;
//! use lyra_store::StoreHandle;
//!
//! let config = StoreConfig::new("docs.reactive");
//! let engine = Box::new(MemoryEngine::open(&config));
//! let handle = StoreHandle::with_engine(config, engine).unwrap();
//!
//! let age = BoundValue::new(&handle, "user.age").unwrap();
//! age.set(30.0).unwrap();
//!
//! // Another writer on the same handle; the binding observes it.
//! handle.set("user.age", 31.0).unwrap();
//! assert_eq!(age.get().and_then(|v| v.as_number()), Some(31.0));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod bound;
mod json;
mod watcher;

pub use bound::BoundValue;
pub use json::JsonBound;
pub use watcher::KeyWatcher;
