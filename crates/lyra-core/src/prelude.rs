//! Prelude module - commonly used types for convenient import.
//!
//! Use `use lyra_core::prelude::*;` to import all essential types.

// Value union
pub use crate::Value;

// Configuration
pub use crate::{DEFAULT_STORE_ID, MAX_ENCRYPTION_KEY_LEN, StoreConfig};

// Errors
pub use crate::{ConfigError, UnsupportedTypeError};
