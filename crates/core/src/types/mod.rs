//! Core types for Partner Shops.
//!
//! This module provides type-safe wrappers for the shop directory domain.

pub mod id;
pub mod phone;
pub mod shop;

pub use id::*;
pub use phone::{Phone, PhoneError};
pub use shop::Shop;
