//! # Cart Messages
//!
//! Requests a [`CartClient`](crate::client::CartClient) sends to the
//! [`CartActor`](crate::actor::CartActor). One variant per public cart
//! operation plus a read of the current cart; each carries the oneshot sender
//! the actor answers on.

use cart_core::{Cart, CartChange, CartError, ProductId, UpdateProductAmount};
use tokio::sync::oneshot;

/// Type alias for the one-shot channel a mutation is answered on.
pub type Response<T> = oneshot::Sender<Result<T, CartError>>;

#[derive(Debug)]
pub enum CartRequest {
    AddProduct {
        product_id: ProductId,
        respond_to: Response<CartChange>,
    },
    RemoveProduct {
        product_id: ProductId,
        respond_to: Response<CartChange>,
    },
    UpdateProductAmount {
        update: UpdateProductAmount,
        respond_to: Response<CartChange>,
    },
    Snapshot {
        respond_to: oneshot::Sender<Cart>,
    },
}
