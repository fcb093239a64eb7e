use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{KeyValueStore, StorageError};

/// [KeyValueStore] that lives only as long as the process. Never fails.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `value` under `key`.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            values: Mutex::new(HashMap::from([(key.into(), value.into())])),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.values.lock().await.insert(key.to_owned(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use crate::storage::KeyValueStore;

    use super::MemoryStore;

    #[tokio::test]
    async fn test_missing_key_is_none() -> Result<()> {
        let store = MemoryStore::new();
        assert_eq!(store.get("nothing").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_overwrites() -> Result<()> {
        let store = MemoryStore::with_value("key", "first");
        store.set("key", "second".into()).await?;
        assert_eq!(store.get("key").await?.as_deref(), Some("second"));
        Ok(())
    }
}
