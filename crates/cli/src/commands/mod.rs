//! CLI command implementations.

pub mod shops;
