//! HTTP client for the shop data service.
//!
//! Caches the shop listing using `moka` (TTL from configuration).

use std::sync::Arc;

use moka::future::Cache;
use partner_shops_core::{Shop, ShopId};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use super::cache::{CacheKey, CacheValue};
use super::{DataError, ShopSource};
use crate::config::DataServiceConfig;

/// Client for the shop data service.
///
/// Cheaply cloneable. The listing is cached; deletions invalidate it.
#[derive(Clone)]
pub struct ShopServiceClient {
    inner: Arc<ShopServiceClientInner>,
}

struct ShopServiceClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl ShopServiceClient {
    /// Create a new data service client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &DataServiceConfig) -> Result<Self, DataError> {
        let mut headers = HeaderMap::new();

        if let Some(api_key) = &config.api_key {
            let auth_value = format!("Bearer {}", api_key.expose_secret());
            let mut value = HeaderValue::from_str(&auth_value)
                .map_err(|e| DataError::Parse(format!("Invalid API key format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ShopServiceClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    /// Base URL requests are issued against (no trailing slash).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// List all shops, serving from cache unless `force` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a shop list.
    #[instrument(skip(self))]
    pub async fn list_shops(&self, force: bool) -> Result<Vec<Shop>, DataError> {
        if force {
            debug!("Forced refresh, bypassing shop cache");
        } else if let Some(CacheValue::Shops(shops)) = self.inner.cache.get(&CacheKey::Shops).await
        {
            debug!(count = shops.len(), "Cache hit for shops");
            return Ok(shops);
        }

        let response = self.inner.client.get(self.url("/shops")).send().await?;
        let shops: Vec<Shop> = Self::handle_response(response).await?;
        debug!(count = shops.len(), "Fetched shops from data service");

        self.inner
            .cache
            .insert(CacheKey::Shops, CacheValue::Shops(shops.clone()))
            .await;

        Ok(shops)
    }

    /// Delete a shop and drop the cached listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    #[instrument(skip(self), fields(shop_id = %id))]
    pub async fn remove_shop(&self, id: ShopId) -> Result<(), DataError> {
        let response = self
            .inner
            .client
            .delete(self.url(&format!("/shops/{id}")))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::parse_error(response).await);
        }

        self.inner.cache.invalidate(&CacheKey::Shops).await;
        Ok(())
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, DataError> {
        if response.status().is_success() {
            return response
                .json()
                .await
                .map_err(|e| DataError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(response).await)
    }

    /// Map an error response to a [`DataError`].
    async fn parse_error(response: reqwest::Response) -> DataError {
        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(1);
            return DataError::RateLimited(retry_after);
        }

        if status == 401 || status == 403 {
            return DataError::Unauthorized;
        }

        if status == 404 {
            return DataError::NotFound(response.url().path().to_string());
        }

        let message = response
            .text()
            .await
            .map(|body| body.chars().take(200).collect::<String>())
            .unwrap_or_else(|_| "Unknown error".to_string());

        tracing::error!(status, message = %message, "Data service returned non-success status");
        DataError::Api { status, message }
    }
}

impl ShopSource for ShopServiceClient {
    async fn fetch_shops(&self, force: bool) -> Result<Vec<Shop>, DataError> {
        self.list_shops(force).await
    }

    async fn delete_shop(&self, id: ShopId) -> Result<(), DataError> {
        self.remove_shop(id).await
    }
}

impl std::fmt::Debug for ShopServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopServiceClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}
