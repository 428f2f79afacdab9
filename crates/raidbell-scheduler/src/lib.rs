//! `raidbell-scheduler` — the reminder scheduling engine.
//!
//! # Overview
//!
//! [`engine::ReminderEngine`] scans the whole event table once per tick
//! (60 s apart, sleep-after-pass), evaluates every event against the
//! current minute with the kind-specific rules in [`matcher`], and posts a
//! reminder for each match through the injected [`notify::Notifier`].
//! Delivered messages are removed again after a retention window by
//! fire-and-forget cleanup tasks owned by the engine.
//!
//! # Matching rules
//!
//! | Kind           | Fires when                                             |
//! |----------------|--------------------------------------------------------|
//! | `Once`         | stored date == today and stored time == current minute |
//! | `WeeklySingle` | weekday is in `days` and stored time == current minute |
//! | `WeeklyMulti`  | same rule; only the message label differs              |
//!
//! A delivery is stamped with `last_fired_on`, so re-entering the same
//! minute (e.g. after a restart) never re-sends an occurrence.

pub mod engine;
pub mod error;
pub mod matcher;
pub mod notify;

pub use engine::{EventSource, ReminderEngine};
pub use error::{EngineError, Result};
pub use matcher::TickStamp;
pub use notify::{MessageHandle, Notifier, NotifyError};
