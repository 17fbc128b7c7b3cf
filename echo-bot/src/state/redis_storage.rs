use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisError};
use serde_json::Value;
use shared::errors::{Result, ServiceError};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};

use super::Storage;

const KEY_PREFIX: &str = "botstate:";

#[derive(Clone)]
pub struct RedisStorage {
    redis: Arc<ConnectionManager>,
}

impl RedisStorage {
    pub fn new(redis: ConnectionManager) -> Self {
        Self {
            redis: Arc::new(redis),
        }
    }

    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client).await.map_err(|e| {
            error!(error = %e, "Failed to connect to Redis");
            ServiceError::Redis(e.to_string())
        })?;

        Ok(Self::new(manager))
    }

    fn redis_key(key: &str) -> String {
        format!("{}{}", KEY_PREFIX, key)
    }
}

#[async_trait]
impl Storage for RedisStorage {
    async fn read(&self, keys: &[String]) -> Result<HashMap<String, Value>> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let mut conn = self.redis.as_ref().clone();
        let redis_keys: Vec<String> = keys.iter().map(|k| Self::redis_key(k)).collect();

        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&redis_keys)
            .query_async(&mut conn)
            .await
            .map_err(|e: RedisError| {
                error!("Failed to read state entries: {}", e);
                ServiceError::Redis(e.to_string())
            })?;

        let mut items = HashMap::with_capacity(keys.len());
        for (key, raw) in keys.iter().zip(values) {
            if let Some(raw) = raw {
                items.insert(key.clone(), serde_json::from_str(&raw)?);
            }
        }

        debug!(requested = keys.len(), found = items.len(), "Read state entries from Redis");
        Ok(items)
    }

    async fn write(&self, changes: HashMap<String, Value>) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut conn = self.redis.as_ref().clone();
        let mut pipe = redis::pipe();
        for (key, value) in &changes {
            pipe.set(Self::redis_key(key), serde_json::to_string(value)?)
                .ignore();
        }

        pipe.query_async::<()>(&mut conn)
            .await
            .map_err(|e: RedisError| {
                error!("Failed to write state entries: {}", e);
                ServiceError::Redis(e.to_string())
            })?;

        debug!(count = changes.len(), "Wrote state entries to Redis");
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let mut conn = self.redis.as_ref().clone();
        let redis_keys: Vec<String> = keys.iter().map(|k| Self::redis_key(k)).collect();

        conn.del::<_, ()>(redis_keys)
            .await
            .map_err(|e: RedisError| {
                error!("Failed to delete state entries: {}", e);
                ServiceError::Redis(e.to_string())
            })?;

        Ok(())
    }
}
