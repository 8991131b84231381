//! # Cart Actor
//!
//! Owns a [`CartStore`] inside its own Tokio task and applies requests one at a
//! time, in arrival order. Any number of [`CartClient`] clones can submit work
//! concurrently; the store still sees a single writer, so two adds racing for
//! different products are both kept.
//!
//! ```rust
//! use cart_core::mock::{MockInventory, RecordingNotifier};
//! use cart_core::{CartStore, MemoryStore, Product, ProductId};
//! use cart_service::actor::CartActor;
//!
//! #[tokio::main]
//! async fn main() {
//!     let inventory = MockInventory::new();
//!     inventory.expect_stock(1).return_amount(2);
//!     inventory
//!         .expect_product(1)
//!         .return_ok(Product::new(ProductId(1), "Runner", 139.9, "https://img/1.jpg"));
//!
//!     let store = CartStore::open(inventory, MemoryStore::new(), RecordingNotifier::new(), "cart")
//!         .await
//!         .unwrap();
//!     let (actor, client) = CartActor::new(store, 8);
//!     let handle = tokio::spawn(actor.run());
//!
//!     client.add_product(ProductId(1)).await.unwrap();
//!     assert_eq!(client.snapshot().await.unwrap().len(), 1);
//!
//!     drop(client);
//!     handle.await.unwrap();
//! }
//! ```

use crate::client::CartClient;
use crate::message::CartRequest;
use cart_core::{CartStore, InventoryService, NotificationSink, PersistenceStore};
use tokio::sync::mpsc;
use tracing::{debug, info};

pub struct CartActor<I, S, N> {
    receiver: mpsc::Receiver<CartRequest>,
    store: CartStore<I, S, N>,
}

impl<I, S, N> CartActor<I, S, N>
where
    I: InventoryService,
    S: PersistenceStore,
    N: NotificationSink,
{
    /// Creates the actor and the client that feeds it.
    ///
    /// `buffer_size` is the request channel capacity; once it is full, client
    /// calls wait for room.
    pub fn new(store: CartStore<I, S, N>, buffer_size: usize) -> (Self, CartClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self { receiver, store };
        (actor, CartClient::new(sender))
    }

    /// Processes requests until every client has been dropped.
    pub async fn run(mut self) {
        info!(key = self.store.key(), size = self.store.cart().len(), "Cart actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CartRequest::AddProduct {
                    product_id,
                    respond_to,
                } => {
                    debug!(%product_id, "AddProduct");
                    let result = self.store.add_product(product_id).await;
                    let _ = respond_to.send(result);
                }
                CartRequest::RemoveProduct {
                    product_id,
                    respond_to,
                } => {
                    debug!(%product_id, "RemoveProduct");
                    let result = self.store.remove_product(product_id).await;
                    let _ = respond_to.send(result);
                }
                CartRequest::UpdateProductAmount { update, respond_to } => {
                    debug!(?update, "UpdateProductAmount");
                    let result = self.store.update_product_amount(update).await;
                    let _ = respond_to.send(result);
                }
                CartRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(self.store.snapshot());
                }
            }
        }

        info!(key = self.store.key(), size = self.store.cart().len(), "Shutdown");
    }
}
