//! # Cart System
//!
//! Wires one [`CartStore`] to its collaborators, spawns a [`CartActor`] that
//! owns it and hands out the [`CartClient`] used to talk to it.
//!
//! [`CartSystem::start`] builds the production collaborators from a
//! [`ServiceConfig`]: an [`HttpInventory`] and a [`FileStore`].
//! [`CartSystem::with_parts`] accepts any [`InventoryService`] and
//! [`PersistenceStore`], which is how tests run the real actor over mocks.
//!
//! Shutdown is cooperative. Once every [`CartClient`] clone is dropped the
//! actor drains the requests already queued, stops, and
//! [`CartSystem::shutdown`] returns after its task has finished.

use crate::actor::CartActor;
use crate::client::CartClient;
use crate::config::ServiceConfig;
use crate::file_store::FileStore;
use crate::inventory_http::{HttpInventory, HttpSetupError};
use cart_core::{CartStore, InventoryService, NotificationSink, PersistenceStore, StorageError};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Errors raised while starting or stopping a [`CartSystem`].
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error(transparent)]
    Inventory(#[from] HttpSetupError),
    #[error("failed to load cart: {0}")]
    Storage(#[from] StorageError),
    #[error("cart actor task failed: {0}")]
    ActorTask(#[from] tokio::task::JoinError),
}

/// The running cart: one actor task and the client that talks to it.
///
/// `CartSystem` is responsible for:
/// - **Startup**: loading the persisted cart before any request is accepted
/// - **Wiring**: giving the store its inventory, storage and notifier
/// - **Shutdown**: closing the request queue and awaiting the actor task
///
/// Startup fails with [`SystemError::Inventory`] when the inventory client
/// cannot be built, and with [`SystemError::Storage`] when the stored cart
/// cannot be read. A stored cart that reads but does not decode is not an
/// error; the system starts with an empty cart.
///
/// # Example
///
/// ```ignore
/// let config = ServiceConfig::load("cart.toml")?;
/// let system = CartSystem::start(&config, TracingNotifier).await?;
///
/// system.cart_client.add_product(ProductId(1)).await?;
/// let cart = system.cart_client.snapshot().await?;
///
/// system.shutdown().await?;
/// ```
pub struct CartSystem {
    /// Client for interacting with the cart actor
    pub cart_client: CartClient,

    handle: JoinHandle<()>,
}

impl CartSystem {
    /// Starts the production wiring: HTTP inventory and file storage, both
    /// configured from `config`, reporting user notices to `notifier`.
    pub async fn start<N>(config: &ServiceConfig, notifier: N) -> Result<Self, SystemError>
    where
        N: NotificationSink + 'static,
    {
        let inventory = HttpInventory::new(&config.inventory)?;
        let storage = FileStore::new(config.storage.dir.clone());
        info!(
            inventory = %inventory.base_url(),
            storage = %storage.dir().display(),
            "Starting cart system"
        );

        Self::with_parts(
            inventory,
            storage,
            notifier,
            &config.storage.key,
            config.actor.buffer_size,
        )
        .await
    }

    /// Starts the system over caller-supplied collaborators.
    ///
    /// The cart is loaded from `storage` under `key` before the actor starts,
    /// so a storage failure is reported here rather than on the first request.
    pub async fn with_parts<I, S, N>(
        inventory: I,
        storage: S,
        notifier: N,
        key: &str,
        buffer_size: usize,
    ) -> Result<Self, SystemError>
    where
        I: InventoryService + 'static,
        S: PersistenceStore + 'static,
        N: NotificationSink + 'static,
    {
        let store = CartStore::open(inventory, storage, notifier, key).await?;
        let (actor, cart_client) = CartActor::new(store, buffer_size);
        let handle = tokio::spawn(actor.run());

        Ok(Self {
            cart_client,
            handle,
        })
    }

    /// Closes the request channel and waits for the actor to finish.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down cart system...");

        drop(self.cart_client);

        if let Err(e) = self.handle.await {
            error!(error = %e, "Cart actor task failed");
            return Err(e.into());
        }

        info!("Cart system shutdown complete.");
        Ok(())
    }
}
