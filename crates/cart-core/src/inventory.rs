//! # Inventory Service
//!
//! Read-only view of the remote product catalogue and stock levels. The cart
//! consults it before every add or quantity change and never caches answers.
//! Timeouts are the implementation's concern.

use crate::model::{Product, ProductId, StockInfo};
use async_trait::async_trait;
use std::sync::Arc;

/// Errors raised by an [`InventoryService`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    /// The service has no such product.
    #[error("{0} not found in inventory")]
    NotFound(ProductId),

    /// The service answered with an unexpected status.
    #[error("inventory responded with status {status}")]
    Status { status: u16 },

    /// The request never produced a response (connection, timeout, ...).
    #[error("inventory transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("malformed inventory response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Fetches the full product record.
    async fn get_product(&self, id: ProductId) -> Result<Product, InventoryError>;

    /// Fetches the live stock level. `Ok(None)` means the service answered but
    /// holds no stock record for the product.
    async fn get_stock(&self, id: ProductId) -> Result<Option<StockInfo>, InventoryError>;
}

#[async_trait]
impl<T: InventoryService + ?Sized> InventoryService for Arc<T> {
    async fn get_product(&self, id: ProductId) -> Result<Product, InventoryError> {
        (**self).get_product(id).await
    }

    async fn get_stock(&self, id: ProductId) -> Result<Option<StockInfo>, InventoryError> {
        (**self).get_stock(id).await
    }
}
