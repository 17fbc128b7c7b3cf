use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::errors::{Result, ServiceError};
use shared::{Activity, ChannelAccount};
use teloxide::prelude::*;
use teloxide::types::User;

use crate::bot::ChannelSender;

pub const TELEGRAM_CHANNEL_ID: &str = "telegram";

pub(crate) fn map_teloxide_err<E: std::fmt::Display>(e: E) -> ServiceError {
    ServiceError::Telegram(e.to_string())
}

pub(crate) fn user_account(user: &User) -> ChannelAccount {
    ChannelAccount::new(user.id.0.to_string()).with_name(user.full_name())
}

pub fn message_activity(
    chat_id: i64,
    message_id: i32,
    from: ChannelAccount,
    bot: ChannelAccount,
    text: &str,
    date: DateTime<Utc>,
) -> Activity {
    let mut activity =
        Activity::message(TELEGRAM_CHANNEL_ID, chat_id.to_string(), from, bot, text)
            .with_timestamp(date);
    activity.id = Some(message_id.to_string());
    activity
}

pub fn members_added_activity(
    chat_id: i64,
    message_id: i32,
    from: ChannelAccount,
    bot: ChannelAccount,
    members: Vec<ChannelAccount>,
    date: DateTime<Utc>,
) -> Activity {
    let mut activity =
        Activity::members_added(TELEGRAM_CHANNEL_ID, chat_id.to_string(), from, bot, members)
            .with_timestamp(date);
    activity.id = Some(message_id.to_string());
    activity
}

/// Sends the text of outbound activities to one chat.
#[derive(Clone)]
pub struct TelegramSender {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramSender {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl ChannelSender for TelegramSender {
    async fn send(&self, activity: &Activity) -> Result<()> {
        let Some(text) = activity.text.as_ref() else {
            tracing::debug!(chat_id = %self.chat_id, "Skipping activity without text");
            return Ok(());
        };

        self.bot
            .send_message(self.chat_id, text.clone())
            .await
            .map_err(map_teloxide_err)?;

        Ok(())
    }
}
