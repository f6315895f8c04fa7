//! Lyra Store — typed, observable store handles.
//!
//! This crate provides:
//! - [`StoreHandle`], the typed surface over one engine connection
//! - A process-wide handle cache keyed by configuration equality
//! - The lazily-initialized default store
//!
//! # Architecture
//!
//! A handle pairs an engine connection with a
//! [`ChangeNotifier`](lyra_events::ChangeNotifier). Reads narrow the
//! stored [`Value`](lyra_core::Value) union (a shape mismatch reads as
//! absent, never an error); writes dispatch by shape and notify
//! listeners for the affected key once the engine commit returns.
//! Structured data crosses on the JSON object channel, a pure adapter
//! over the string shape.
//!
//! # Example
//!
//! ```rust
//! use lyra_core::StoreConfig;
//! use lyra_engine::MemoryEngine;
//! use lyra_store::StoreHandle;
//!
//! let config = StoreConfig::new("docs.example");
//! let engine = Box::new(MemoryEngine::open(&config));
//! let handle = StoreHandle::with_engine(config, engine).unwrap();
//!
//! handle.set("user.age", 30.0).unwrap();
//! assert_eq!(handle.get_number("user.age").unwrap(), Some(30.0));
//!
//! handle.delete("user.age").unwrap();
//! assert_eq!(handle.get_number("user.age").unwrap(), None);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod handle;
mod registry;

pub use error::{StoreError, StoreResult};
pub use handle::StoreHandle;
