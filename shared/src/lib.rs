pub mod config;
pub mod errors;
pub mod telemetry;
pub mod types;

pub use config::{BotConfig, LogFormat, RedisConfig, StorageBackend};
pub use errors::{Result, ServiceError};
pub use telemetry::{init_metrics, init_tracing, record_counter, record_timing, shutdown};
pub use types::{
    Activity, ActivityType, ChannelAccount, ConversationAccount, ConversationData, UserProfile,
};
