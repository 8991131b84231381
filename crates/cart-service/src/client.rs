//! # Cart Client
//!
//! Cheap, cloneable handle to a running [`CartActor`](crate::actor::CartActor).

use crate::message::CartRequest;
use cart_core::{Cart, CartChange, CartError, ProductId, UpdateProductAmount};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Cart actor closed")]
    ActorClosed,
    #[error("Cart actor dropped response channel")]
    ActorDropped,
    #[error(transparent)]
    Cart(#[from] CartError),
}

#[derive(Debug, Clone)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
}

impl CartClient {
    pub fn new(sender: mpsc::Sender<CartRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<CartChange, ClientError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.send(CartRequest::AddProduct {
            product_id,
            respond_to,
        })
        .await?;
        Ok(response.await.map_err(|_| ClientError::ActorDropped)??)
    }

    #[instrument(skip(self))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<CartChange, ClientError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.send(CartRequest::RemoveProduct {
            product_id,
            respond_to,
        })
        .await?;
        Ok(response.await.map_err(|_| ClientError::ActorDropped)??)
    }

    #[instrument(skip(self))]
    pub async fn update_product_amount(
        &self,
        update: UpdateProductAmount,
    ) -> Result<CartChange, ClientError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.send(CartRequest::UpdateProductAmount { update, respond_to }).await?;
        Ok(response.await.map_err(|_| ClientError::ActorDropped)??)
    }

    /// The cart as of the moment the actor handles this request.
    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<Cart, ClientError> {
        let (respond_to, response) = oneshot::channel();
        self.send(CartRequest::Snapshot { respond_to }).await?;
        response.await.map_err(|_| ClientError::ActorDropped)
    }

    async fn send(&self, request: CartRequest) -> Result<(), ClientError> {
        self.sender
            .send(request)
            .await
            .map_err(|_| ClientError::ActorClosed)
    }
}
