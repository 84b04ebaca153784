//! Cache types for data service responses.

use partner_shops_core::Shop;

/// Cache key for data service responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Shops,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Shops(Vec<Shop>),
}
