//! Lyra Engine — the storage-engine boundary.
//!
//! This crate provides:
//! - [`StorageEngine`], the trait the external engine is consumed through
//! - [`MemoryEngine`], an always-available in-memory implementation
//! - [`EngineError`], engine-level failures passed through unmodified
//!
//! # Architecture
//!
//! The actual persistent engine (memory-mapping, encryption, binary
//! encoding, durability) lives outside this workspace. This crate pins
//! the seam: a synchronous, atomic-per-operation contract over the
//! [`Value`](lyra_core::Value) union. Embedders wrap their native engine
//! in [`StorageEngine`] and hand it to the store layer; tests and
//! ephemeral deployments use [`MemoryEngine`].
//!
//! Operations are expected to complete synchronously and fast
//! (memory-mapped access, not I/O waits). Each call is individually
//! atomic as seen by the layer above; no additional locking is layered
//! on top here.
//!
//! # Example
//!
//! ```rust
//! use lyra_core::Value;
//! use lyra_engine::{MemoryEngine, StorageEngine};
//!
//! let engine = MemoryEngine::new();
//! engine.set("user.age", Value::Number(30.0)).unwrap();
//! assert_eq!(engine.get("user.age").unwrap(), Some(Value::Number(30.0)));
//! assert!(engine.delete("user.age").unwrap());
//! assert_eq!(engine.get("user.age").unwrap(), None);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod engine;
mod error;
mod memory;

pub use engine::{StorageEngine, validate_key};
pub use error::{EngineError, EngineResult};
pub use memory::MemoryEngine;
