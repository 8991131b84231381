//! [`InventoryService`] over the inventory's JSON REST API.
//!
//! - `GET {base}/products/{id}` returns a product record.
//! - `GET {base}/stock/{id}` returns `{"id":…,"amount":…}`, or `null` when the
//!   service keeps no stock record for the product.

use crate::config::InventoryConfig;
use async_trait::async_trait;
use cart_core::{InventoryError, InventoryService, Product, ProductId, StockInfo};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Errors raised while building an [`HttpInventory`].
#[derive(Debug, thiserror::Error)]
pub enum HttpSetupError {
    #[error("invalid inventory base url {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },
    #[error("failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct HttpInventory {
    base_url: Url,
    client: Client,
}

impl HttpInventory {
    pub fn new(config: &InventoryConfig) -> Result<Self, HttpSetupError> {
        let mut base_url = Url::parse(&config.base_url).map_err(|e| HttpSetupError::BaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(HttpSetupError::BaseUrl {
                url: config.base_url.clone(),
                reason: "not a hierarchical URL".into(),
            });
        }
        // Endpoints are joined as relative paths, so the base must end in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, resource: &str, id: ProductId) -> Result<Url, InventoryError> {
        self.base_url
            .join(&format!("{resource}/{}", id.0))
            .map_err(|e| InventoryError::Transport(format!("failed to build request url: {e}")))
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: Url,
        id: ProductId,
    ) -> Result<T, InventoryError> {
        debug!(%url, "Sending request");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| InventoryError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(InventoryError::NotFound(id));
        }
        if !status.is_success() {
            return Err(InventoryError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| InventoryError::Transport(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| InventoryError::Decode(e.to_string()))
    }
}

#[async_trait]
impl InventoryService for HttpInventory {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: ProductId) -> Result<Product, InventoryError> {
        let url = self.endpoint("products", id)?;
        self.fetch(url, id).await
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_stock(&self, id: ProductId) -> Result<Option<StockInfo>, InventoryError> {
        let url = self.endpoint("stock", id)?;
        self.fetch(url, id).await
    }
}
