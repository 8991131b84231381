//! # Cart Store
//!
//! [`CartStore`] owns the cart and is the only thing allowed to change it.
//!
//! ## Mutations
//!
//! Each public mutation follows the same shape:
//!
//! 1. Ask the [`InventoryService`] whether the requested quantity is in stock
//!    (remove skips this step).
//! 2. Compute the next cart as a fresh value; the current one is not touched.
//! 3. **Commit**: encode the next cart, write it under the store's key and,
//!    once the write resolved, swap it in as the current cart.
//!
//! Any failure before the swap leaves the current cart exactly as it was. The
//! failure is reported once to the [`NotificationSink`] and returned to the
//! caller as a [`CartError`].
//!
//! ## Concurrency
//!
//! Mutations take `&mut self`, so a single owner is enforced by the compiler.
//! To share a store between tasks, put it behind an actor that drains a queue
//! of requests one at a time rather than behind a lock held across the
//! inventory round-trips.

use crate::codec::{decode_cart, encode_cart};
use crate::error::{CartError, CartOperation};
use crate::inventory::{InventoryError, InventoryService};
use crate::model::{Cart, LineItem, ProductId, UpdateProductAmount};
use crate::notify::NotificationSink;
use crate::storage::{PersistenceStore, StorageError};
use std::num::NonZeroU32;
use tracing::{debug, info, instrument, warn};

/// What a successful call did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// A new cart was written to storage and became current.
    Committed,
    /// Nothing to do; storage was not touched.
    Ignored,
}

/// Owner of the current [`Cart`] and the only code path that changes it.
///
/// A `CartStore` pairs the in-memory cart with the three collaborators every
/// mutation needs:
/// - **`I`: [`InventoryService`]** answers live stock levels and product
///   records. Nothing it returns is cached.
/// - **`S`: [`PersistenceStore`]** holds the encoded cart under
///   [`key`](Self::key). The stored value always equals the cart as of the
///   last successful mutation.
/// - **`N`: [`NotificationSink`]** receives exactly one user-facing message
///   per failed mutation and nothing otherwise.
///
/// Every mutation returns `Ok(CartChange::Committed)` once the new cart is
/// both stored and current, `Ok(CartChange::Ignored)` when there was nothing
/// to do, or a [`CartError`] when the cart was left untouched.
///
/// # Example
///
/// ```ignore
/// let mut store = CartStore::open(inventory, storage, TracingNotifier, "cart").await?;
///
/// store.add_product(ProductId(1)).await?;
/// store
///     .update_product_amount(UpdateProductAmount::new(ProductId(1), 3))
///     .await?;
/// assert_eq!(store.cart().find(ProductId(1)).unwrap().amount.get(), 3);
/// ```
pub struct CartStore<I, S, N> {
    cart: Cart,
    key: String,
    inventory: I,
    storage: S,
    notifier: N,
}

impl<I, S, N> std::fmt::Debug for CartStore<I, S, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("cart", &self.cart)
            .finish_non_exhaustive()
    }
}

impl<I, S, N> CartStore<I, S, N>
where
    I: InventoryService,
    S: PersistenceStore,
    N: NotificationSink,
{
    /// Loads the cart stored under `key` and wraps it in a store.
    ///
    /// An absent value starts an empty cart. So does a value that no longer
    /// decodes: it is logged and left in place until the next commit
    /// overwrites it. A failing read is returned as an error.
    pub async fn open(
        inventory: I,
        storage: S,
        notifier: N,
        key: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let key = key.into();
        let cart = match storage.get(&key).await? {
            None => Cart::new(),
            Some(blob) => decode_cart(&blob).unwrap_or_else(|e| {
                warn!(key = %key, error = %e, "Stored cart unreadable, starting empty");
                Cart::new()
            }),
        };
        info!(key = %key, size = cart.len(), "Cart loaded");

        Ok(Self {
            cart,
            key,
            inventory,
            storage,
            notifier,
        })
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn snapshot(&self) -> Cart {
        self.cart.clone()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Adds one unit of `product_id`, appending a new line item if needed.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&mut self, product_id: ProductId) -> Result<CartChange, CartError> {
        let result = self.try_add_product(product_id).await;
        self.settle(CartOperation::AddProduct, result)
    }

    /// Drops `product_id` from the cart.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&mut self, product_id: ProductId) -> Result<CartChange, CartError> {
        let result = self.try_remove_product(product_id).await;
        self.settle(CartOperation::RemoveProduct, result)
    }

    /// Sets the quantity of a line item already in the cart.
    ///
    /// Non-positive amounts and products that are not in the cart are ignored
    /// without a report.
    #[instrument(skip(self))]
    pub async fn update_product_amount(
        &mut self,
        update: UpdateProductAmount,
    ) -> Result<CartChange, CartError> {
        if update.amount <= 0 {
            debug!(amount = update.amount, "Ignoring non-positive amount");
            return Ok(CartChange::Ignored);
        }
        let result = self.try_update_product_amount(update).await;
        self.settle(CartOperation::UpdateProductAmount, result)
    }

    /// Asks the inventory whether `requested` units of `product_id` are available.
    ///
    /// Always a live lookup. A missing stock record counts as unavailable.
    pub async fn check_stock(
        &self,
        product_id: ProductId,
        requested: u64,
    ) -> Result<bool, InventoryError> {
        let stock = self.inventory.get_stock(product_id).await?;
        let available = stock.map(|s| s.available_amount);
        debug!(%product_id, requested, ?available, "Stock checked");
        Ok(stock.is_some_and(|s| s.covers(requested)))
    }

    async fn try_add_product(&mut self, product_id: ProductId) -> Result<CartChange, CartError> {
        let op = CartOperation::AddProduct;
        let current = self.cart.find(product_id).map(|item| item.amount);
        let requested = match current {
            None => NonZeroU32::MIN,
            Some(amount) => amount.checked_add(1).ok_or(CartError::OutOfStock {
                product_id,
                requested: u64::from(amount.get()) + 1,
            })?,
        };
        self.ensure_stock(op, product_id, requested).await?;

        let next = if current.is_some() {
            self.cart.with_amount(product_id, requested)
        } else {
            let product = self
                .inventory
                .get_product(product_id)
                .await
                .map_err(|e| CartError::upstream(op, e))?;
            if product.id != product_id {
                return Err(CartError::upstream(
                    op,
                    InventoryError::Decode(format!(
                        "asked for {product_id}, received {}",
                        product.id
                    )),
                ));
            }
            self.cart
                .with_appended(LineItem::new(product, requested))
                .map_err(|dup| CartError::upstream(op, InventoryError::Decode(dup.to_string())))?
        };

        self.commit(op, next).await
    }

    async fn try_remove_product(&mut self, product_id: ProductId) -> Result<CartChange, CartError> {
        if !self.cart.contains(product_id) {
            return Err(CartError::NotFound(product_id));
        }
        let next = self.cart.without(product_id);
        self.commit(CartOperation::RemoveProduct, next).await
    }

    async fn try_update_product_amount(
        &mut self,
        update: UpdateProductAmount,
    ) -> Result<CartChange, CartError> {
        let op = CartOperation::UpdateProductAmount;
        let UpdateProductAmount { product_id, amount } = update;

        // Above u32::MAX no stock level can cover it.
        let requested = u32::try_from(amount)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or(CartError::OutOfStock {
                product_id,
                requested: amount.unsigned_abs(),
            })?;
        self.ensure_stock(op, product_id, requested).await?;

        if !self.cart.contains(product_id) {
            debug!(%product_id, "Not in cart, nothing to update");
            return Ok(CartChange::Ignored);
        }
        let next = self.cart.with_amount(product_id, requested);
        self.commit(op, next).await
    }

    async fn ensure_stock(
        &self,
        op: CartOperation,
        product_id: ProductId,
        requested: NonZeroU32,
    ) -> Result<(), CartError> {
        let requested = u64::from(requested.get());
        match self.check_stock(product_id, requested).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(CartError::OutOfStock {
                product_id,
                requested,
            }),
            Err(e) => Err(CartError::upstream(op, e)),
        }
    }

    /// Writes `next` under the store's key, then makes it the current cart.
    async fn commit(&mut self, op: CartOperation, next: Cart) -> Result<CartChange, CartError> {
        let blob = encode_cart(&next).map_err(|e| CartError::upstream(op, e))?;
        self.storage
            .set(&self.key, blob)
            .await
            .map_err(|e| CartError::upstream(op, e))?;
        self.cart = next;
        info!(operation = %op, size = self.cart.len(), "Committed");
        Ok(CartChange::Committed)
    }

    fn settle(
        &self,
        op: CartOperation,
        result: Result<CartChange, CartError>,
    ) -> Result<CartChange, CartError> {
        if let Err(e) = &result {
            match e {
                CartError::Upstream { .. } => {
                    warn!(operation = %op, error = %e, "Operation failed")
                }
                _ => info!(operation = %op, reason = %e, "Operation rejected"),
            }
            self.notifier.report_error(e.notice(op).as_str());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockInventory, RecordingNotifier};
    use crate::model::Product;
    use crate::storage::MemoryStore;

    const KEY: &str = "cart";

    type TestStore = CartStore<MockInventory, MemoryStore, RecordingNotifier>;

    fn product(id: u32) -> Product {
        Product::new(
            ProductId(id),
            format!("Sneaker {id}"),
            100.0 + f64::from(id),
            format!("https://img/{id}.jpg"),
        )
    }

    fn seeded(items: &[(u32, u32)]) -> MemoryStore {
        let cart = items.iter().fold(Cart::new(), |cart, &(id, amount)| {
            cart.with_appended(LineItem::new(product(id), NonZeroU32::new(amount).unwrap()))
                .unwrap()
        });
        MemoryStore::new().with_value(KEY, encode_cart(&cart).unwrap())
    }

    async fn open(
        storage: MemoryStore,
    ) -> (TestStore, MockInventory, MemoryStore, RecordingNotifier) {
        let inventory = MockInventory::new();
        let notifier = RecordingNotifier::new();
        let store = CartStore::open(inventory.clone(), storage.clone(), notifier.clone(), KEY)
            .await
            .unwrap();
        (store, inventory, storage, notifier)
    }

    fn amounts(cart: &Cart) -> Vec<(u32, u32)> {
        cart.iter().map(|i| (i.id().0, i.amount.get())).collect()
    }

    fn persisted(storage: &MemoryStore) -> Cart {
        decode_cart(&storage.raw(KEY).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn first_add_appends_one_unit_and_persists() {
        let (mut store, inventory, storage, notifier) = open(MemoryStore::new()).await;
        inventory.expect_stock(1).return_amount(5);
        inventory.expect_product(1).return_ok(product(1));

        let change = store.add_product(ProductId(1)).await.unwrap();

        assert_eq!(change, CartChange::Committed);
        assert_eq!(amounts(store.cart()), vec![(1, 1)]);
        assert_eq!(store.cart().find(ProductId(1)).unwrap().product, product(1));
        assert_eq!(&persisted(&storage), store.cart());
        assert!(notifier.messages().is_empty());
        inventory.verify();
    }

    #[tokio::test]
    async fn added_product_keeps_every_attribute() {
        let (mut store, inventory, storage, notifier) = open(MemoryStore::new()).await;
        let json = r#"{"id":6,"title":"Trail","price":89.0,"brand":"acme"}"#;
        let record: Product = serde_json::from_str(json).unwrap();
        inventory.expect_stock(6).return_amount(2);
        inventory.expect_product(6).return_ok(record.clone());

        store.add_product(ProductId(6)).await.unwrap();

        let stored = persisted(&storage);
        let item = stored.find(ProductId(6)).unwrap();
        assert_eq!(item.product, record);
        assert_eq!(item.product.attributes["brand"], "acme");
        assert!(storage.raw(KEY).unwrap().contains(r#""brand":"acme""#));
        assert!(notifier.messages().is_empty());
        inventory.verify();
    }

    #[tokio::test]
    async fn add_beyond_stock_is_rejected() {
        let (mut store, inventory, storage, notifier) = open(seeded(&[(1, 1)])).await;
        let before = storage.raw(KEY);
        inventory.expect_stock(1).return_amount(1);

        let err = store.add_product(ProductId(1)).await.unwrap_err();

        assert!(matches!(err, CartError::OutOfStock { requested: 2, .. }));
        assert_eq!(amounts(store.cart()), vec![(1, 1)]);
        assert_eq!(storage.raw(KEY), before);
        assert_eq!(notifier.messages(), vec!["quantity requested is out of stock"]);
        inventory.verify();
    }

    #[tokio::test]
    async fn add_existing_increments_in_place() {
        let (mut store, inventory, storage, _) = open(seeded(&[(1, 1), (2, 3), (3, 1)])).await;
        inventory.expect_stock(2).return_amount(10);

        store.add_product(ProductId(2)).await.unwrap();

        assert_eq!(amounts(store.cart()), vec![(1, 1), (2, 4), (3, 1)]);
        assert_eq!(&persisted(&storage), store.cart());
        inventory.verify();
    }

    #[tokio::test]
    async fn missing_stock_record_counts_as_out_of_stock() {
        let (mut store, inventory, _, notifier) = open(MemoryStore::new()).await;
        inventory.expect_stock(4).return_ok(None);

        let err = store.add_product(ProductId(4)).await.unwrap_err();

        assert!(matches!(err, CartError::OutOfStock { .. }));
        assert!(store.cart().is_empty());
        assert_eq!(notifier.messages(), vec!["quantity requested is out of stock"]);
    }

    #[tokio::test]
    async fn non_positive_update_is_ignored_silently() {
        let (mut store, inventory, storage, notifier) = open(seeded(&[(1, 2)])).await;
        let before = storage.raw(KEY);

        for amount in [0, -1, i64::MIN] {
            let change = store
                .update_product_amount(UpdateProductAmount::new(ProductId(1), amount))
                .await
                .unwrap();
            assert_eq!(change, CartChange::Ignored);
        }

        assert_eq!(amounts(store.cart()), vec![(1, 2)]);
        assert_eq!(storage.raw(KEY), before);
        assert!(notifier.messages().is_empty());
        inventory.verify();
    }

    #[tokio::test]
    async fn remove_keeps_the_rest_in_order() {
        let (mut store, inventory, storage, notifier) = open(seeded(&[(1, 1), (2, 1)])).await;

        let change = store.remove_product(ProductId(1)).await.unwrap();

        assert_eq!(change, CartChange::Committed);
        assert_eq!(amounts(store.cart()), vec![(2, 1)]);
        assert_eq!(&persisted(&storage), store.cart());
        assert!(notifier.messages().is_empty());
        inventory.verify();
    }

    #[tokio::test]
    async fn removing_absent_product_reports_failure() {
        let (mut store, _, storage, notifier) = open(MemoryStore::new()).await;

        let err = store.remove_product(ProductId(99)).await.unwrap_err();

        assert!(matches!(err, CartError::NotFound(ProductId(99))));
        assert!(store.cart().is_empty());
        assert_eq!(storage.raw(KEY), None);
        assert_eq!(notifier.messages(), vec!["failed to remove product"]);
    }

    #[tokio::test]
    async fn update_sets_amount_after_stock_check() {
        let (mut store, inventory, storage, notifier) = open(seeded(&[(1, 1), (2, 1)])).await;
        inventory.expect_stock(1).return_amount(3);

        let change = store
            .update_product_amount(UpdateProductAmount::new(ProductId(1), 3))
            .await
            .unwrap();

        assert_eq!(change, CartChange::Committed);
        assert_eq!(amounts(store.cart()), vec![(1, 3), (2, 1)]);
        assert_eq!(&persisted(&storage), store.cart());
        assert!(notifier.messages().is_empty());
        inventory.verify();
    }

    #[tokio::test]
    async fn update_beyond_stock_is_rejected() {
        let (mut store, inventory, _, notifier) = open(seeded(&[(1, 1)])).await;
        inventory.expect_stock(1).return_amount(2);

        let err = store
            .update_product_amount(UpdateProductAmount::new(ProductId(1), 3))
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::OutOfStock { requested: 3, .. }));
        assert_eq!(amounts(store.cart()), vec![(1, 1)]);
        assert_eq!(notifier.messages(), vec!["quantity requested is out of stock"]);
    }

    #[tokio::test]
    async fn update_of_product_not_in_cart_writes_nothing() {
        let (mut store, inventory, storage, notifier) = open(MemoryStore::new()).await;
        inventory.expect_stock(7).return_amount(10);

        let change = store
            .update_product_amount(UpdateProductAmount::new(ProductId(7), 2))
            .await
            .unwrap();

        assert_eq!(change, CartChange::Ignored);
        assert!(store.cart().is_empty());
        assert_eq!(storage.raw(KEY), None);
        assert!(notifier.messages().is_empty());
        inventory.verify();
    }

    #[tokio::test]
    async fn update_above_u32_range_is_out_of_stock_without_lookup() {
        let (mut store, inventory, _, notifier) = open(seeded(&[(1, 1)])).await;
        let amount = i64::from(u32::MAX) + 1;

        let err = store
            .update_product_amount(UpdateProductAmount::new(ProductId(1), amount))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CartError::OutOfStock { requested, .. } if requested == amount as u64
        ));
        assert_eq!(notifier.messages(), vec!["quantity requested is out of stock"]);
        inventory.verify();
    }

    #[tokio::test]
    async fn storage_failure_leaves_cart_untouched() {
        let (mut store, inventory, storage, notifier) = open(seeded(&[(1, 1), (2, 1)])).await;
        let before = store.snapshot();
        storage.set_available(false);

        inventory.expect_stock(3).return_amount(5);
        inventory.expect_product(3).return_ok(product(3));
        let add = store.add_product(ProductId(3)).await.unwrap_err();

        inventory.expect_stock(1).return_amount(5);
        let update = store
            .update_product_amount(UpdateProductAmount::new(ProductId(1), 2))
            .await
            .unwrap_err();

        let remove = store.remove_product(ProductId(2)).await.unwrap_err();

        for err in [&add, &update, &remove] {
            assert!(matches!(
                err,
                CartError::Upstream {
                    source: crate::error::UpstreamError::Storage(_),
                    ..
                }
            ));
        }
        assert_eq!(store.cart(), &before);
        assert_eq!(
            notifier.messages(),
            vec![
                "failed to add product",
                "failed to update product quantity",
                "failed to remove product",
            ]
        );

        storage.set_available(true);
        assert_eq!(persisted(&storage), before);
        inventory.verify();
    }

    #[tokio::test]
    async fn inventory_failure_reports_generic_message_only() {
        let (mut store, inventory, _, notifier) = open(seeded(&[(1, 1)])).await;
        inventory
            .expect_stock(1)
            .return_err(InventoryError::Transport("connection reset by peer".into()));
        inventory.expect_stock(2).return_amount(1);
        inventory
            .expect_product(2)
            .return_err(InventoryError::Status { status: 503 });
        inventory
            .expect_stock(1)
            .return_err(InventoryError::Decode("expected value at line 1".into()));

        assert!(store.add_product(ProductId(1)).await.is_err());
        assert!(store.add_product(ProductId(2)).await.is_err());
        assert!(store
            .update_product_amount(UpdateProductAmount::new(ProductId(1), 2))
            .await
            .is_err());

        assert_eq!(amounts(store.cart()), vec![(1, 1)]);
        assert_eq!(
            notifier.messages(),
            vec![
                "failed to add product",
                "failed to add product",
                "failed to update product quantity",
            ]
        );
        inventory.verify();
    }

    #[tokio::test]
    async fn mismatched_product_is_not_appended() {
        let (mut store, inventory, storage, notifier) = open(MemoryStore::new()).await;
        inventory.expect_stock(1).return_amount(1);
        inventory.expect_product(1).return_ok(product(2));

        let err = store.add_product(ProductId(1)).await.unwrap_err();

        assert!(matches!(err, CartError::Upstream { .. }));
        assert!(store.cart().is_empty());
        assert_eq!(storage.raw(KEY), None);
        assert_eq!(notifier.messages(), vec!["failed to add product"]);
    }

    #[tokio::test]
    async fn reopen_yields_last_committed_cart() {
        let (mut store, inventory, storage, _) = open(MemoryStore::new()).await;
        inventory.expect_stock(1).return_amount(5);
        inventory.expect_product(1).return_ok(product(1));
        inventory.expect_stock(2).return_amount(5);
        inventory.expect_product(2).return_ok(product(2));
        inventory.expect_stock(1).return_amount(5);
        store.add_product(ProductId(1)).await.unwrap();
        store.add_product(ProductId(2)).await.unwrap();
        store.add_product(ProductId(1)).await.unwrap();
        store.remove_product(ProductId(2)).await.unwrap();

        let (reopened, _, _, _) = open(storage).await;
        assert_eq!(reopened.cart(), store.cart());
        assert_eq!(amounts(reopened.cart()), vec![(1, 2)]);
    }

    #[tokio::test]
    async fn corrupt_blob_starts_empty_and_is_kept_until_next_commit() {
        let storage = MemoryStore::new().with_value(KEY, "{not json");
        let (mut store, inventory, storage, _) = open(storage).await;

        assert!(store.cart().is_empty());
        assert_eq!(storage.raw(KEY).as_deref(), Some("{not json"));

        inventory.expect_stock(1).return_amount(1);
        inventory.expect_product(1).return_ok(product(1));
        store.add_product(ProductId(1)).await.unwrap();
        assert_eq!(&persisted(&storage), store.cart());
    }

    #[tokio::test]
    async fn open_fails_when_storage_cannot_be_read() {
        let storage = MemoryStore::new();
        storage.set_available(false);

        let result =
            CartStore::open(MockInventory::new(), storage, RecordingNotifier::new(), KEY).await;

        assert!(matches!(result, Err(StorageError::Unavailable(_))));
    }

    #[tokio::test]
    async fn check_stock_compares_live_level() {
        let (store, inventory, _, _) = open(MemoryStore::new()).await;
        inventory.expect_stock(1).return_amount(2);
        inventory.expect_stock(1).return_amount(1);
        inventory.expect_stock(1).return_ok(None);

        assert!(store.check_stock(ProductId(1), 2).await.unwrap());
        assert!(!store.check_stock(ProductId(1), 2).await.unwrap());
        assert!(!store.check_stock(ProductId(1), 1).await.unwrap());
        inventory.verify();
    }
}
