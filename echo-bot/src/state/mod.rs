mod bot_state;
mod memory_storage;
mod redis_storage;

pub use bot_state::{BotState, StatePropertyAccessor, StateScope, StateSnapshot};
pub use memory_storage::MemoryStorage;
pub use redis_storage::RedisStorage;

use async_trait::async_trait;
use serde_json::Value;
use shared::Result;
use std::collections::HashMap;

/// Key/value persistence for state scopes. Writes are last-write-wins.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Missing keys are absent from the returned map.
    async fn read(&self, keys: &[String]) -> Result<HashMap<String, Value>>;

    async fn write(&self, changes: HashMap<String, Value>) -> Result<()>;

    async fn delete(&self, keys: &[String]) -> Result<()>;
}
