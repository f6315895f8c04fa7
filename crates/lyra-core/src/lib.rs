//! Lyra Core — data model for the Lyra reactive key-value layer.
//!
//! This crate provides:
//! - [`Value`], the closed union of native shapes a store accepts
//! - [`StoreConfig`], the identity of a store (equality decides handle reuse)
//! - The boundary error types ([`UnsupportedTypeError`], [`ConfigError`])
//!
//! # Architecture
//!
//! Storage engines are dynamically typed on the other side of a narrow
//! native boundary. On this side the boundary is a closed tagged union:
//! booleans, numbers, and UTF-8 strings. Any other shape is rejected
//! with a typed error at the point of conversion rather than coerced or
//! inspected at runtime. Structured data crosses as serialized JSON over
//! the string shape.
//!
//! # Example
//!
//! ```rust
//! use lyra_core::{StoreConfig, Value};
//!
//! let config = StoreConfig::new("settings").with_encryption_key("hunter2");
//! config.validate().unwrap();
//!
//! let value = Value::from_json(serde_json::json!(30)).unwrap();
//! assert_eq!(value, Value::Number(30.0));
//!
//! // Arrays and objects are outside the union.
//! assert!(Value::from_json(serde_json::json!([1, 2])).is_err());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod config;
mod error;
mod value;

pub use config::{
    DEFAULT_STORE_ID, MAX_ENCRYPTION_KEY_LEN, StoreConfig, validate_encryption_key,
};
pub use error::{ConfigError, UnsupportedTypeError};
pub use value::Value;
