//! # System Lifecycle
//!
//! Starts and stops the cart runtime.
//!
//! [`CartSystem`] wires the collaborators into a [`CartStore`](cart_core::CartStore),
//! hands the store to a [`CartActor`](crate::actor::CartActor) running in its
//! own task and keeps the [`CartClient`](crate::client::CartClient) callers use.
//!
//! ## Shutdown
//!
//! 1. **Drop the client** - closes the sender side of the request channel.
//! 2. **Actor drains** - requests already queued are still applied, then
//!    `recv()` returns `None` and the loop exits.
//! 3. **Await the task** - a panic inside the actor surfaces as an error here.
//!
//! Clones of the client held elsewhere keep the actor alive, so drop those
//! before calling [`CartSystem::shutdown`].
//!
//! ## Tracing
//!
//! [`setup_tracing`] installs the subscriber once per process:
//!
//! ```bash
//! RUST_LOG=info cart add 1     # one line per commit or rejection
//! RUST_LOG=debug cart add 1    # plus requests, stock levels and file writes
//! ```

pub mod cart_system;
pub mod tracing;

pub use cart_system::*;
pub use tracing::*;
