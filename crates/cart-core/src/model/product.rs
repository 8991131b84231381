//! Products and stock levels as served by the inventory service.
//!
//! The cart never interprets product attributes (no price arithmetic happens
//! here). The whole record is copied into a
//! [`LineItem`](crate::model::LineItem) when the product is first added and
//! persisted alongside the amount.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;

/// Type-safe identifier for Products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "product_{}", self.0)
    }
}

/// A product record as served by the inventory service.
///
/// Only `id` is required. The usual display fields are typed for convenience
/// and every other field the inventory sends lands in `attributes`, so a
/// record survives a trip through the cart and storage without losing data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Product {
    /// Creates a new Product instance.
    ///
    /// # Arguments
    /// * `id` - Identifier assigned by the inventory service
    /// * `title` - Display title
    /// * `price` - Unit price, carried through untouched
    /// * `image` - Image URL
    pub fn new(
        id: ProductId,
        title: impl Into<String>,
        price: f64,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: Some(title.into()),
            price: Some(price),
            image: Some(image.into()),
            attributes: Map::new(),
        }
    }

    /// A record holding nothing but its id.
    pub fn bare(id: ProductId) -> Self {
        Self {
            id,
            title: None,
            price: None,
            image: None,
            attributes: Map::new(),
        }
    }

    /// Adds an extra attribute, replacing any previous value under `key`.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Live stock level for a product.
///
/// Fetched fresh for every check and never cached by the cart. On the wire the
/// inventory API names the fields `id` and `amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInfo {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    #[serde(rename = "amount")]
    pub available_amount: u32,
}

impl StockInfo {
    pub fn new(product_id: ProductId, available_amount: u32) -> Self {
        Self {
            product_id,
            available_amount,
        }
    }

    /// Whether `requested` units can be satisfied by this stock level.
    pub fn covers(&self, requested: u64) -> bool {
        u64::from(self.available_amount) >= requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_id_is_a_bare_number_on_the_wire() {
        let json = serde_json::to_string(&ProductId(7)).unwrap();
        assert_eq!(json, "7");
        assert_eq!(ProductId(7).to_string(), "product_7");
    }

    #[test]
    fn stock_info_uses_inventory_field_names() {
        let stock: StockInfo = serde_json::from_str(r#"{"id": 3, "amount": 5}"#).unwrap();
        assert_eq!(stock, StockInfo::new(ProductId(3), 5));
    }

    #[test]
    fn unknown_fields_are_kept_as_attributes() {
        let json = r#"{"id":1,"title":"a","brand":"acme","sizes":[40,41]}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.attributes["brand"], "acme");
        assert_eq!(product.attributes["sizes"], serde_json::json!([40, 41]));
        let back = serde_json::to_value(&product).unwrap();
        assert_eq!(back, serde_json::from_str::<Value>(json).unwrap());
    }

    #[test]
    fn only_id_is_required() {
        let product: Product = serde_json::from_str(r#"{"id":1,"title":"a","price":1.0}"#).unwrap();
        assert_eq!(product.image, None);
        assert_eq!(product.title.as_deref(), Some("a"));

        let product: Product = serde_json::from_str(r#"{"id":2}"#).unwrap();
        assert_eq!(product, Product::bare(ProductId(2)));
        assert_eq!(serde_json::to_string(&product).unwrap(), r#"{"id":2}"#);

        assert!(serde_json::from_str::<Product>(r#"{"title":"a"}"#).is_err());
    }

    #[test]
    fn covers_compares_against_available_amount() {
        let stock = StockInfo::new(ProductId(1), 2);
        assert!(stock.covers(1));
        assert!(stock.covers(2));
        assert!(!stock.covers(3));
        assert!(!StockInfo::new(ProductId(1), 0).covers(1));
    }
}
