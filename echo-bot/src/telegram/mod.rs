mod adapter;
pub mod handlers;

pub use adapter::{
    members_added_activity, message_activity, TelegramSender, TELEGRAM_CHANNEL_ID,
};
pub use handlers::run_telegram_bot;
