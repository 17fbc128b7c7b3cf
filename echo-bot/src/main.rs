use echo_bot::bot::build_dispatcher;
use echo_bot::state::{MemoryStorage, RedisStorage, Storage};
use echo_bot::{http, telegram};
use shared::config::{BotConfig, StorageBackend};
use std::sync::Arc;
use teloxide::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = BotConfig::from_env()?;

    shared::init_tracing("echo-bot", config.log_format)?;

    if let Some(metrics_port) = config.metrics_port {
        shared::init_metrics(metrics_port)?;
    }

    tracing::info!("Starting Echo Bot...");
    tracing::info!("Configuration:");
    tracing::info!("  HTTP Port: {}", config.port);
    tracing::info!("  Storage Backend: {:?}", config.storage);
    tracing::info!("  Telegram Polling Enabled: {}", config.enable_telegram_polling);

    let storage: Arc<dyn Storage> = match (config.storage, &config.redis) {
        (StorageBackend::Redis, Some(redis)) => {
            tracing::info!("Connecting to Redis state storage...");
            Arc::new(RedisStorage::connect(&redis.url).await?)
        }
        _ => {
            tracing::info!("Using in-memory state storage");
            Arc::new(MemoryStorage::new())
        }
    };

    let dispatcher = Arc::new(build_dispatcher(storage));

    let http_handle = tokio::spawn(http::serve(dispatcher.clone(), config.port));

    match config.telegram_token.filter(|_| config.enable_telegram_polling) {
        Some(token) => {
            let bot = Bot::new(token);
            let bot_handle = tokio::spawn(telegram::run_telegram_bot(bot, dispatcher));

            tracing::info!("Echo Bot is running");
            tracing::info!("  - Telegram bot: Active (POLLING)");
            tracing::info!("  - HTTP channel: http://0.0.0.0:{}/api/messages", config.port);

            tokio::select! {
                result = bot_handle => {
                    if let Err(e) = result {
                        tracing::error!("Telegram bot task failed: {}", e);
                    }
                }
                result = http_handle => {
                    log_http_exit(result);
                }
            }
        }
        None => {
            tracing::info!("Echo Bot is running");
            tracing::info!("  - Telegram bot: Disabled");
            tracing::info!("  - HTTP channel: http://0.0.0.0:{}/api/messages", config.port);

            log_http_exit(http_handle.await);
        }
    }

    shared::shutdown().await;

    Ok(())
}

fn log_http_exit(result: Result<shared::Result<()>, tokio::task::JoinError>) {
    match result {
        Ok(Ok(())) => tracing::info!("HTTP channel stopped"),
        Ok(Err(e)) => tracing::error!("HTTP channel failed: {}", e),
        Err(e) => tracing::error!("HTTP channel task failed: {}", e),
    }
}
