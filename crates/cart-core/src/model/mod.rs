//! Pure data structures: products, stock levels and the cart itself.

pub mod cart;
pub mod product;

pub use cart::*;
pub use product::*;
