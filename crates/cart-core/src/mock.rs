//! # Test Doubles
//!
//! In-memory stand-ins for the cart's collaborators, shared by the unit tests
//! in this crate and by downstream integration tests.
//!
//! [`MockInventory`] answers from a queue of expectations set up front with a
//! fluent API. Each call pops the next expectation and panics if the call does
//! not match it, so an unexpected inventory round-trip fails the test.
//!
//! ```rust
//! use cart_core::mock::{MockInventory, RecordingNotifier};
//! use cart_core::{CartStore, MemoryStore, Product, ProductId, StockInfo};
//!
//! #[tokio::main]
//! async fn main() {
//!     let inventory = MockInventory::new();
//!     inventory.expect_stock(1).return_ok(Some(StockInfo::new(ProductId(1), 3)));
//!     inventory
//!         .expect_product(1)
//!         .return_ok(Product::new(ProductId(1), "Runner", 139.9, "https://img/1.jpg"));
//!
//!     let notifier = RecordingNotifier::new();
//!     let storage = MemoryStore::new();
//!     let mut store = CartStore::open(inventory.clone(), storage, notifier.clone(), "cart")
//!         .await
//!         .unwrap();
//!
//!     store.add_product(ProductId(1)).await.unwrap();
//!     assert_eq!(store.cart().len(), 1);
//!     assert!(notifier.messages().is_empty());
//!     inventory.verify();
//! }
//! ```

use crate::inventory::{InventoryError, InventoryService};
use crate::model::{Product, ProductId, StockInfo};
use crate::notify::NotificationSink;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

// =============================================================================
// INVENTORY EXPECTATIONS
// =============================================================================

#[derive(Debug)]
enum Expectation {
    Stock {
        id: ProductId,
        response: Result<Option<StockInfo>, InventoryError>,
    },
    Product {
        id: ProductId,
        response: Result<Product, InventoryError>,
    },
}

type Expectations = Arc<Mutex<VecDeque<Expectation>>>;

/// Scripted [`InventoryService`]. Clones share the same expectation queue.
#[derive(Debug, Clone, Default)]
pub struct MockInventory {
    expectations: Expectations,
}

impl MockInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects a `get_stock` call for `id`.
    pub fn expect_stock(&self, id: impl Into<ProductId>) -> StockExpectationBuilder {
        StockExpectationBuilder {
            id: id.into(),
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `get_product` call for `id`.
    pub fn expect_product(&self, id: impl Into<ProductId>) -> ProductExpectationBuilder {
        ProductExpectationBuilder {
            id: id.into(),
            expectations: self.expectations.clone(),
        }
    }

    /// Panics unless every expectation was consumed.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap_or_else(PoisonError::into_inner);
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining: {:?}", exps.len(), exps);
        }
    }

    fn next(&self) -> Option<Expectation> {
        self.expectations.lock().unwrap_or_else(PoisonError::into_inner).pop_front()
    }
}

#[async_trait]
impl InventoryService for MockInventory {
    async fn get_product(&self, id: ProductId) -> Result<Product, InventoryError> {
        match self.next() {
            Some(Expectation::Product { id: expected, response }) if expected == id => response,
            other => panic!("Unexpected get_product({id}), next expectation was {other:?}"),
        }
    }

    async fn get_stock(&self, id: ProductId) -> Result<Option<StockInfo>, InventoryError> {
        match self.next() {
            Some(Expectation::Stock { id: expected, response }) if expected == id => response,
            other => panic!("Unexpected get_stock({id}), next expectation was {other:?}"),
        }
    }
}

/// Builder for `get_stock` expectations.
pub struct StockExpectationBuilder {
    id: ProductId,
    expectations: Expectations,
}

impl StockExpectationBuilder {
    pub fn return_ok(self, value: Option<StockInfo>) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: InventoryError) {
        self.push(Err(error));
    }

    /// Shorthand for a stock record holding `amount` units.
    pub fn return_amount(self, amount: u32) {
        let stock = StockInfo::new(self.id, amount);
        self.push(Ok(Some(stock)));
    }

    fn push(self, response: Result<Option<StockInfo>, InventoryError>) {
        self.expectations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Expectation::Stock {
                id: self.id,
                response,
            });
    }
}

/// Builder for `get_product` expectations.
pub struct ProductExpectationBuilder {
    id: ProductId,
    expectations: Expectations,
}

impl ProductExpectationBuilder {
    pub fn return_ok(self, value: Product) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: InventoryError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Product, InventoryError>) {
        self.expectations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Expectation::Product {
                id: self.id,
                response,
            });
    }
}

// =============================================================================
// NOTIFICATIONS
// =============================================================================

/// Sink that keeps every reported message, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl NotificationSink for RecordingNotifier {
    fn report_error(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
