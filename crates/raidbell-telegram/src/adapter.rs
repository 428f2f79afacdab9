//! Telegram adapter.
//!
//! Drives the long-polling dispatcher for the admin command surface.
//! Reminder delivery runs separately inside the scheduler engine; the two
//! only ever share the event store.

use teloxide::prelude::*;
use tracing::info;

use raidbell_core::config::TelegramConfig;
use raidbell_store::EventStore;

use crate::admin::{handle_command, AdminCommand};

pub struct TelegramAdapter {
    bot: Bot,
    config: TelegramConfig,
    store: EventStore,
}

impl TelegramAdapter {
    pub fn new(bot: Bot, config: &TelegramConfig, store: EventStore) -> Self {
        Self {
            bot,
            config: config.clone(),
            store,
        }
    }

    /// Connect to Telegram and drive the long-polling loop.
    ///
    /// Never returns under normal operation.
    pub async fn run(self) {
        info!("Telegram: starting long-polling dispatcher");

        let handler = Update::filter_message()
            .filter_command::<AdminCommand>()
            .endpoint(handle_command);

        Dispatcher::builder(self.bot, handler)
            .dependencies(dptree::deps![self.store, self.config])
            .default_handler(|_upd| async {})
            .build()
            .dispatch()
            .await;
    }
}
