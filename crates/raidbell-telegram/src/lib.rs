//! `raidbell-telegram` — the Telegram surface of the bot.
//!
//! Two halves: [`notifier::ChannelNotifier`], which the scheduler engine
//! posts reminders through, and the admin command handlers in [`admin`]
//! driven by the long-polling dispatcher in [`adapter`]. The two halves
//! share nothing but the event store.

pub mod adapter;
pub mod admin;
pub mod allow;
pub mod notifier;

pub use adapter::TelegramAdapter;
pub use notifier::ChannelNotifier;
