//! The cart collection and its line items.
//!
//! [`Cart`] is an ordered sequence of [`LineItem`]s, unique by product id. All
//! transformations are pure: they return a new `Cart` and leave `self`
//! untouched, which is what lets [`CartStore`](crate::CartStore) persist the
//! candidate collection before it replaces the current one.

use crate::model::{Product, ProductId};
use serde::{Deserialize, Serialize, Serializer};
use std::num::NonZeroU32;

/// One product entry in the cart with its quantity.
///
/// Serialized flat, so the persisted form reads
/// `{"id":1,"title":"…","price":…,"image":"…","amount":2}` plus whatever extra
/// attributes the product record carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(flatten)]
    pub product: Product,
    pub amount: NonZeroU32,
}

impl LineItem {
    /// An `amount` attribute on the product record is dropped; the line item's
    /// own amount takes that slot in the flat form.
    pub fn new(mut product: Product, amount: NonZeroU32) -> Self {
        product.attributes.remove("amount");
        Self { product, amount }
    }

    pub fn id(&self) -> ProductId {
        self.product.id
    }
}

/// Request to set a line item's quantity.
///
/// `amount` is signed on purpose: callers pass through whatever the user typed
/// and the store ignores anything `<= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

impl UpdateProductAmount {
    pub fn new(product_id: ProductId, amount: i64) -> Self {
        Self { product_id, amount }
    }
}

/// Returned when a collection would hold two line items for the same product.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate line item for {0}")]
pub struct DuplicateLineItem(pub ProductId);

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.find(id).is_some()
    }

    /// Returns a copy with `id`'s amount replaced, keeping every item in place.
    ///
    /// When `id` is not in the cart the copy is identical to `self`.
    pub fn with_amount(&self, id: ProductId, amount: NonZeroU32) -> Cart {
        let items = self
            .items
            .iter()
            .map(|item| {
                if item.id() == id {
                    LineItem {
                        amount,
                        ..item.clone()
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
        Cart { items }
    }

    /// Returns a copy with `item` appended at the end.
    pub fn with_appended(&self, item: LineItem) -> Result<Cart, DuplicateLineItem> {
        if self.contains(item.id()) {
            return Err(DuplicateLineItem(item.id()));
        }
        let mut items = self.items.clone();
        items.push(item);
        Ok(Cart { items })
    }

    /// Returns a copy without `id`, preserving the order of the rest.
    pub fn without(&self, id: ProductId) -> Cart {
        let items = self
            .items
            .iter()
            .filter(|item| item.id() != id)
            .cloned()
            .collect();
        Cart { items }
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = DuplicateLineItem;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        let mut cart = Cart::new();
        for item in items {
            if cart.contains(item.id()) {
                return Err(DuplicateLineItem(item.id()));
            }
            cart.items.push(item);
        }
        Ok(cart)
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.items)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
