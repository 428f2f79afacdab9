//! `raidbell-store` — SQLite persistence for reminder events.
//!
//! A single `events` table holds every reminder definition. The admin
//! command handlers insert and delete rows; the scheduler engine scans the
//! full table once per tick and stamps `last_fired_on` after a delivery.
//! Engine and admin handlers run on separate connections, so SQLite's own
//! locking is the only coordination between them.

pub mod db;
pub mod error;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use store::EventStore;
pub use types::{days_to_csv, parse_days, Day, Event, EventKind, NewEvent};
