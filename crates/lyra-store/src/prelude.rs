//! Prelude module - commonly used types for convenient import.
//!
//! Use `use lyra_store::prelude::*;` to import all essential types.

// Store surface
pub use crate::{StoreError, StoreHandle, StoreResult};

// Re-exported foundations
pub use lyra_core::{StoreConfig, Value};
pub use lyra_events::ListenerGuard;
