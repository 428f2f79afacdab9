use thiserror::Error;

use crate::notify::NotifyError;

/// Errors raised while processing a single event within a tick.
///
/// Never escapes the engine loop — each is logged and the pass continues
/// with the next event.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Store error: {0}")]
    Store(#[from] raidbell_store::StoreError),

    #[error("Notify error: {0}")]
    Notify(#[from] NotifyError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
