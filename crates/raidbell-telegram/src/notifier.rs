//! Group-channel notifier: posts reminders to the configured chat and
//! deletes them again when the cleanup scheduler asks.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode};
use tracing::debug;

use raidbell_scheduler::{MessageHandle, Notifier, NotifyError};

/// [`Notifier`] over a teloxide `Bot` with a fixed destination chat.
#[derive(Clone)]
pub struct ChannelNotifier {
    bot: Bot,
    chat: ChatId,
}

impl ChannelNotifier {
    pub fn new(bot: Bot, chat: ChatId) -> Self {
        Self { bot, chat }
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    /// Post with HTML formatting; if Telegram rejects the parse mode,
    /// retry the same content as plain text before giving up.
    async fn send(&self, text: &str) -> Result<MessageHandle, NotifyError> {
        let sent = self
            .bot
            .send_message(self.chat, text)
            .parse_mode(ParseMode::Html)
            .await;

        let message = match sent {
            Ok(message) => message,
            Err(e) => {
                debug!(error = %e, "HTML send rejected, falling back to plain text");
                self.bot
                    .send_message(self.chat, text)
                    .await
                    .map_err(|e| NotifyError::Delivery(e.to_string()))?
            }
        };

        Ok(MessageHandle { id: message.id.0 })
    }

    async fn delete(&self, handle: MessageHandle) -> Result<(), NotifyError> {
        self.bot
            .delete_message(self.chat, MessageId(handle.id))
            .await
            .map_err(|e| NotifyError::Deletion(e.to_string()))?;
        Ok(())
    }
}
