//! # Cart Service
//!
//! Runtime around [`cart_core::CartStore`].
//!
//! - **[actor]** / **[client]**: the store runs inside a [`CartActor`](actor::CartActor)
//!   task; [`CartClient`](client::CartClient) handles queue requests to it, so
//!   concurrent callers never interleave inside a mutation.
//! - **[inventory_http]**: [`HttpInventory`](inventory_http::HttpInventory), the
//!   inventory service over its JSON REST API.
//! - **[file_store]**: [`FileStore`](file_store::FileStore), one JSON file per key.
//! - **[config]**: TOML configuration with defaults for every field.
//! - **[lifecycle]**: [`CartSystem`](lifecycle::CartSystem) start/shutdown and
//!   tracing setup.
//!
//! The `cart` binary drives all of this from the command line.

pub mod actor;
pub mod client;
pub mod config;
pub mod file_store;
pub mod inventory_http;
pub mod lifecycle;
pub mod message;
