//! Prelude module - commonly used types for convenient import.
//!
//! Use `use lyra_reactive::prelude::*;` to import all essential types.

// Bindings
pub use crate::{BoundValue, JsonBound, KeyWatcher};

// Re-exported foundations
pub use lyra_core::{StoreConfig, Value};
pub use lyra_store::{StoreError, StoreHandle, StoreResult};
