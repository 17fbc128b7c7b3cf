use shared::errors::Result;
use shared::Activity;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::{Me, Message};

use super::adapter::{members_added_activity, message_activity, user_account, TelegramSender};
use crate::bot::TurnDispatcher;

pub async fn run_telegram_bot(bot: Bot, dispatcher: Arc<TurnDispatcher>) {
    tracing::info!("Starting Telegram bot...");

    let me = loop {
        match bot.get_me().await {
            Ok(me) => {
                tracing::info!("Bot username: @{}", me.username());
                break me;
            }
            Err(e) => {
                tracing::warn!("Failed to get bot info (will retry): {}", e);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    let handler = Update::filter_message().endpoint(
        |bot: Bot, msg: Message, me: Me, dispatcher: Arc<TurnDispatcher>| async move {
            handle_message(bot, msg, me, dispatcher)
                .await
                .map_err(|e| {
                    tracing::error!("Telegram turn failed: {}", e);
                    e
                })
        },
    );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![dispatcher, me])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

pub async fn handle_message(
    bot: Bot,
    msg: Message,
    me: Me,
    dispatcher: Arc<TurnDispatcher>,
) -> Result<()> {
    let Some(activity) = to_activity(&msg, &me) else {
        tracing::debug!(chat_id = %msg.chat.id, "Ignoring unsupported Telegram message");
        return Ok(());
    };

    let sender = TelegramSender::new(bot, msg.chat.id);
    dispatcher.run(activity, &sender).await?;

    Ok(())
}

fn to_activity(msg: &Message, me: &Me) -> Option<Activity> {
    let from = msg.from.as_ref().map(user_account)?;
    let bot_account = user_account(&me.user);

    if let Some(members) = msg.new_chat_members() {
        let members = members.iter().map(user_account).collect();
        return Some(members_added_activity(
            msg.chat.id.0,
            msg.id.0,
            from,
            bot_account,
            members,
            msg.date,
        ));
    }

    msg.text().map(|text| {
        message_activity(msg.chat.id.0, msg.id.0, from, bot_account, text, msg.date)
    })
}
