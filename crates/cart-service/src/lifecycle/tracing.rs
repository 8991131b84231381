//! Subscriber setup for the cart binary.
//!
//! Compact single-line output without module paths. Verbosity comes from
//! `RUST_LOG`; with it unset only errors are printed.
//!
//! With `RUST_LOG=info` a rejected add looks like:
//!
//! ```text
//! INFO add_product: Operation rejected product_id=product_1 operation=add_product
//!     reason=product_1: 2 requested, not in stock
//! WARN add_product: User notice product_id=product_1 notice="quantity requested is out of stock"
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
