//! # Cart Errors
//!
//! Outcomes of a cart operation that did not commit. Every variant maps to
//! exactly one user-facing [`Notice`]; the detail inside `Upstream` is for
//! logs only.

use crate::codec::CodecError;
use crate::inventory::InventoryError;
use crate::model::ProductId;
use crate::notify::Notice;
use crate::storage::StorageError;
use std::fmt::Display;

/// The three public mutations, used to pick the generic failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    AddProduct,
    RemoveProduct,
    UpdateProductAmount,
}

impl CartOperation {
    /// Message reported when this operation fails for a non-business reason.
    pub fn failure_notice(&self) -> Notice {
        match self {
            CartOperation::AddProduct => Notice::AddFailed,
            CartOperation::RemoveProduct => Notice::RemoveFailed,
            CartOperation::UpdateProductAmount => Notice::UpdateFailed,
        }
    }
}

impl Display for CartOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CartOperation::AddProduct => "add_product",
            CartOperation::RemoveProduct => "remove_product",
            CartOperation::UpdateProductAmount => "update_product_amount",
        };
        f.write_str(name)
    }
}

/// A collaborator failed while an operation was in flight.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

#[derive(Debug, thiserror::Error)]
pub enum CartError {
    /// Requested quantity exceeds what the inventory reports, or the service
    /// holds no stock record for the product.
    #[error("{product_id}: {requested} requested, not in stock")]
    OutOfStock { product_id: ProductId, requested: u64 },

    /// The product is not in the cart.
    #[error("{0} is not in the cart")]
    NotFound(ProductId),

    #[error("{operation} failed: {source}")]
    Upstream {
        operation: CartOperation,
        #[source]
        source: UpstreamError,
    },
}

impl CartError {
    pub(crate) fn upstream(operation: CartOperation, source: impl Into<UpstreamError>) -> Self {
        CartError::Upstream {
            operation,
            source: source.into(),
        }
    }

    /// The message shown to the user for this failure of `operation`.
    pub fn notice(&self, operation: CartOperation) -> Notice {
        match self {
            CartError::OutOfStock { .. } => Notice::OutOfStock,
            CartError::NotFound(_) | CartError::Upstream { .. } => operation.failure_notice(),
        }
    }
}
