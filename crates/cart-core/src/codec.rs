//! # Cart Codec
//!
//! The string form of a [`Cart`] as it is handed to a
//! [`PersistenceStore`](crate::storage::PersistenceStore). Keeping this separate
//! from the storage medium means a file, an embedded KV or a remote store all
//! receive the same blob.
//!
//! The blob is a JSON array of flat line items:
//!
//! ```text
//! [{"id":1,"title":"Sneaker","price":179.9,"image":"https://…","amount":2}]
//! ```

use crate::model::Cart;

/// Errors raised while turning a cart into its stored form or back.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to encode cart: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode cart: {0}")]
    Decode(#[source] serde_json::Error),
}

pub fn encode_cart(cart: &Cart) -> Result<String, CodecError> {
    serde_json::to_string(cart).map_err(CodecError::Encode)
}

/// Decodes a stored blob. Duplicate product ids and zero amounts are rejected.
pub fn decode_cart(blob: &str) -> Result<Cart, CodecError> {
    serde_json::from_str(blob).map_err(CodecError::Decode)
}
