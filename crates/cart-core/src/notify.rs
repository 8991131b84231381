//! # User Notifications
//!
//! Fire-and-forget reporting of cart failures to whoever is watching (a toast,
//! a status line, a log). The cart emits one of four fixed messages and never
//! forwards raw error detail.

use std::fmt::Display;
use std::sync::Arc;
use tracing::warn;

/// The user-facing messages the cart can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    OutOfStock,
    AddFailed,
    RemoveFailed,
    UpdateFailed,
}

impl Notice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Notice::OutOfStock => "quantity requested is out of stock",
            Notice::AddFailed => "failed to add product",
            Notice::RemoveFailed => "failed to remove product",
            Notice::UpdateFailed => "failed to update product quantity",
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-way sink for user-facing error messages. Must not block.
pub trait NotificationSink: Send + Sync {
    fn report_error(&self, message: &str);
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn report_error(&self, message: &str) {
        (**self).report_error(message)
    }
}

/// Sink that surfaces notices as `warn` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn report_error(&self, message: &str) {
        warn!(notice = message, "User notice");
    }
}
