//! Partner Shops Core - Shared domain types.
//!
//! This crate provides the types used across all Partner Shops components:
//! - `web` - Server-rendered shop directory (public and admin modes)
//! - `cli` - Command-line access to the same shop directory
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no logging.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Shop records, type-safe IDs and validated phone numbers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
