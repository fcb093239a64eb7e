//! Storage is organized around a plain asynchronous string key-value store ([KeyValueStore]).
//!  - [file_store::FileStore] keeps one json file per key on disk.
//!  - [memory_store::MemoryStore] keeps values in memory.
//!  - [record_store::RecordStore] stores the whole list of daily records under a single key.

pub mod file_store;
pub mod memory_store;
pub mod record_store;

use async_trait::async_trait;
use thiserror::Error;

/// Failures produced at the storage boundary.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read key {key}: {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write key {key}: {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("value stored under {key} is not valid: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StorageError {
    /// Read side failures. Everything that prevents a value from being obtained counts as one.
    pub fn is_read(&self) -> bool {
        matches!(self, StorageError::Read { .. } | StorageError::Corrupt { .. })
    }
}

/// Interface for abstracting a generic string key-value store. Both operations may suspend and
/// may fail.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or [None] if nothing was stored yet.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set(key, value).await
    }
}
