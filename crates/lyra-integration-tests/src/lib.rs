//! Integration tests for the Lyra workspace.
//!
//! This crate has no library surface of its own — the suites live under
//! `tests/`, exercising the store and the reactive bindings together
//! through their public APIs.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
