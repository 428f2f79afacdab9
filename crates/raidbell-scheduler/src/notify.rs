use async_trait::async_trait;
use thiserror::Error;

/// Handle to a delivered message, usable to delete it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHandle {
    /// Channel-assigned message id within the fixed destination chat.
    pub id: i32,
}

/// Outbound message channel with a fixed destination.
///
/// The engine only needs two verbs: post a reminder and delete one it
/// posted earlier. The destination chat is baked into the implementation.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Post `text` to the destination, returning a deletion handle.
    async fn send(&self, text: &str) -> std::result::Result<MessageHandle, NotifyError>;

    /// Delete a previously sent message.
    async fn delete(&self, handle: MessageHandle) -> std::result::Result<(), NotifyError>;
}

/// Errors from the outbound channel.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The reminder could not be posted. The event stays unstamped and is
    /// re-evaluated on the next matching minute.
    #[error("delivery failed: {0}")]
    Delivery(String),

    /// A delivered reminder could not be deleted (already gone, missing
    /// permission). Logged and dropped, never retried.
    #[error("deletion failed: {0}")]
    Deletion(String),
}
