//! Partner shop directory web front end.
//!
//! The binary in `main.rs` wires these modules together; they are exposed as
//! a library so the CLI and the integration tests can drive the same view
//! and router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod data;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod view;
