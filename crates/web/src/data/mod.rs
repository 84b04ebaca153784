//! Shop data service access.
//!
//! # Architecture
//!
//! - [`ShopSource`] is the collaborator seam the shop list view depends on:
//!   one listing operation and one deletion operation
//! - [`ShopServiceClient`] implements it over HTTP/JSON with `reqwest`
//! - The data service is the source of truth; the client keeps a short-lived
//!   `moka` cache of the listing that `force` bypasses
//!
//! # Wire Format
//!
//! ```text
//! GET    {base}/shops        -> 200 [Shop, ...]
//! DELETE {base}/shops/{id}   -> 2xx
//! ```

mod cache;
mod client;

pub use client::ShopServiceClient;

use std::future::Future;

use partner_shops_core::{Shop, ShopId};
use thiserror::Error;

/// Failure talking to the shop data service.
#[derive(Debug, Error)]
pub enum DataError {
    /// Transport failure or timeout.
    #[error("data service unreachable: {0}")]
    Http(#[from] reqwest::Error),

    #[error("data service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// 429; the payload is the `Retry-After` delay in seconds.
    #[error("data service rate limit hit, retry in {0}s")]
    RateLimited(u64),

    #[error("no such resource on the data service: {0}")]
    NotFound(String),

    /// 401 or 403.
    #[error("data service rejected the API key")]
    Unauthorized,

    /// The body did not decode as the expected JSON.
    #[error("unexpected data service payload: {0}")]
    Parse(String),
}

/// Collaborator providing the shop collection and deletion.
///
/// `force` asks the implementation to bypass whatever caching it performs.
pub trait ShopSource: Send + Sync {
    /// Fetch the full shop collection.
    fn fetch_shops(&self, force: bool) -> impl Future<Output = Result<Vec<Shop>, DataError>> + Send;

    /// Delete one shop by id.
    fn delete_shop(&self, id: ShopId) -> impl Future<Output = Result<(), DataError>> + Send;
}
