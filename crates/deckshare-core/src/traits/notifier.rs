//! Notification sink trait for outbound messages.

use async_trait::async_trait;

use crate::result::AppResult;

/// Delivers a message to an address. Delivery either succeeds or fails;
/// there is no partial state to inspect.
#[async_trait]
pub trait NotificationSink: Send + Sync + std::fmt::Debug + 'static {
    /// Send `body` with `subject` to `address`.
    async fn send(&self, address: &str, subject: &str, body: &str) -> AppResult<()>;
}
