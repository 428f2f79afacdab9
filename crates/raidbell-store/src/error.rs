use thiserror::Error;

/// Errors from the event store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite / rusqlite error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The event definition violates a kind invariant.
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// No event with the given id exists.
    #[error("Event not found: {id}")]
    EventNotFound { id: i64 },
}

pub type Result<T> = std::result::Result<T, StoreError>;
