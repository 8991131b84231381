//! # Cart Core
//!
//! Domain logic for a shopping cart that checks live stock before every change
//! and persists itself after every accepted one.
//!
//! ## Architecture Overview
//!
//! The crate is split into three layers:
//!
//! 1. **Model** ([`model`]) - [`Cart`], [`LineItem`], [`Product`] and [`StockInfo`].
//!    Cart transformations are pure and return a new value.
//! 2. **Collaborators** - the traits the store talks to:
//!    [`InventoryService`] (remote catalogue and stock), [`PersistenceStore`]
//!    (string key-value storage) and [`NotificationSink`] (user-facing messages).
//! 3. **Store** ([`CartStore`]) - the only owner of the cart. It runs the stock
//!    check, builds the next cart, writes it and only then swaps it in.
//!
//! The [`codec`] module sits between the model and storage so the medium can be
//! swapped without touching the store.
//!
//! ## Example
//!
//! ```rust
//! use cart_core::mock::MockInventory;
//! use cart_core::{
//!     CartStore, MemoryStore, Product, ProductId, TracingNotifier, UpdateProductAmount,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let inventory = MockInventory::new();
//!     inventory.expect_stock(1).return_amount(5);
//!     inventory
//!         .expect_product(1)
//!         .return_ok(Product::new(ProductId(1), "Runner", 139.9, "https://img/1.jpg"));
//!     inventory.expect_stock(1).return_amount(5);
//!
//!     let storage = MemoryStore::new();
//!     let mut store = CartStore::open(inventory, storage.clone(), TracingNotifier, "cart")
//!         .await
//!         .unwrap();
//!
//!     store.add_product(ProductId(1)).await.unwrap();
//!     store
//!         .update_product_amount(UpdateProductAmount::new(ProductId(1), 3))
//!         .await
//!         .unwrap();
//!
//!     assert_eq!(store.cart().find(ProductId(1)).unwrap().amount.get(), 3);
//!     assert!(storage.raw("cart").unwrap().contains(r#""amount":3"#));
//! }
//! ```
//!
//! ## Concurrency
//!
//! [`CartStore`] mutations take `&mut self`. Sharing one store between tasks is
//! the job of the `cart-service` crate, which puts it behind an actor.

pub mod codec;
pub mod error;
pub mod inventory;
pub mod mock;
pub mod model;
pub mod notify;
pub mod storage;
pub mod store;

pub use codec::{decode_cart, encode_cart, CodecError};
pub use error::{CartError, CartOperation, UpstreamError};
pub use inventory::{InventoryError, InventoryService};
pub use model::{
    Cart, DuplicateLineItem, LineItem, Product, ProductId, StockInfo, UpdateProductAmount,
};
pub use notify::{NotificationSink, Notice, TracingNotifier};
pub use storage::{MemoryStore, PersistenceStore, StorageError};
pub use store::{CartChange, CartStore};
