//! In-memory `FlagStore` for tests and hosts that don't need durability.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::traits::FlagStore;

#[derive(Default)]
pub struct MemoryFlagStore {
    values: RwLock<HashMap<String, serde_json::Value>>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlagStore for MemoryFlagStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.values.write().await.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_clear() {
        let store = MemoryFlagStore::new();
        assert!(store.get("k").await.unwrap().is_none());

        store.set("k", &serde_json::json!(1)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(serde_json::json!(1)));

        assert!(store.clear("k").await.unwrap());
        assert!(store.get("k").await.unwrap().is_none());
    }
}
