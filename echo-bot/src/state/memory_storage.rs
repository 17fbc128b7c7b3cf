use async_trait::async_trait;
use serde_json::Value;
use shared::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::Storage;

#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read(&self, keys: &[String]) -> Result<HashMap<String, Value>> {
        let entries = self.entries.read().await;

        Ok(keys
            .iter()
            .filter_map(|key| entries.get(key).map(|value| (key.clone(), value.clone())))
            .collect())
    }

    async fn write(&self, changes: HashMap<String, Value>) -> Result<()> {
        let mut entries = self.entries.write().await;

        for (key, value) in changes {
            debug!(key = %key, "Writing state entry to memory");
            entries.insert(key, value);
        }

        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<()> {
        let mut entries = self.entries.write().await;

        for key in keys {
            entries.remove(key);
        }

        Ok(())
    }
}
