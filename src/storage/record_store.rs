use tracing::debug;

use crate::expenses::entities::RecordList;

use super::{KeyValueStore, StorageError};

/// Key under which the mobile application keeps its records.
pub const RECORDS_KEY: &str = "foodExpenses";

/// Loads and saves the whole [RecordList] as a single json array. There is no incremental
/// persistence, every save rewrites everything.
pub struct RecordStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> RecordStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, RECORDS_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Missing value means nothing was recorded yet.
    pub async fn load(&self) -> Result<RecordList, StorageError> {
        let Some(raw) = self.store.get(&self.key).await? else {
            debug!("No records stored under {}", self.key);
            return Ok(vec![]);
        };

        let records = serde_json::from_str::<RecordList>(&raw).map_err(|source| {
            StorageError::Corrupt {
                key: self.key.clone(),
                source,
            }
        })?;
        debug!("Loaded {} records", records.len());
        Ok(records)
    }

    pub async fn save(&self, records: &RecordList) -> Result<(), StorageError> {
        let raw = serde_json::to_string(records)?;
        self.store.set(&self.key, raw).await?;
        debug!("Saved {} records", records.len());
        Ok(())
    }
}
