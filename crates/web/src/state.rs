//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::WebConfig;
use crate::data::{DataError, ShopServiceClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It holds configuration and
/// the data service client only; per-page UI state lives in a
/// [`crate::view::ShopListView`] mounted by each request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    shops: ShopServiceClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the data service client cannot be built.
    pub fn new(config: WebConfig) -> Result<Self, DataError> {
        let shops = ShopServiceClient::new(&config.data_service)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, shops }),
        })
    }

    /// Get a reference to the web configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the shop data service client.
    #[must_use]
    pub fn shops(&self) -> &ShopServiceClient {
        &self.inner.shops
    }
}
