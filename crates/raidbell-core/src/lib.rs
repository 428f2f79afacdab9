//! `raidbell-core` — shared configuration, clock and error types.

pub mod clock;
pub mod config;
pub mod error;

pub use clock::Clock;
pub use config::BotConfig;
pub use error::{CoreError, Result};
