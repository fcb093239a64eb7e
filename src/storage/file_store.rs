use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::debug;

use super::{KeyValueStore, StorageError};

/// [KeyValueStore] that keeps every key in its own json file inside `root`.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&root)?;

        Ok(Self { root })
    }

    /// File used for `key`. Anything that could escape the directory is replaced.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect::<String>();
        self.root.join(format!("{name}.json"))
    }

    async fn read_inner(path: &Path) -> Result<Option<String>, std::io::Error> {
        debug!("Reading {path:?}");
        let mut file = match File::open(path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        file.lock_shared()?;
        let mut value = String::new();
        let result = file.read_to_string(&mut value).await;
        file.unlock_async().await?;
        result?;
        Ok(Some(value))
    }

    /// Values are written next to `path` and moved over it, so a failed write leaves the
    /// previous value in place.
    async fn write_inner(path: &Path, value: &str) -> Result<(), std::io::Error> {
        debug!("Writing {} bytes into {path:?}", value.len());
        let target = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .await?;

        target.lock_exclusive()?;
        let staging = Self::staging_path(path);
        let result = Self::replace(&staging, path, value).await;
        if result.is_err() {
            if let Err(e) = tokio::fs::remove_file(&staging).await {
                debug!("Could not remove {staging:?}: {e}");
            }
        }
        target.unlock_async().await?;
        result
    }

    fn staging_path(path: &Path) -> PathBuf {
        path.with_extension("json.tmp")
    }

    async fn replace(staging: &Path, path: &Path, value: &str) -> Result<(), std::io::Error> {
        let mut file = File::create(staging).await?;
        file.write_all(value.as_bytes()).await?;
        file.flush().await?;
        file.sync_data().await?;
        drop(file);
        tokio::fs::rename(staging, path).await
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::read_inner(&self.path_for(key))
            .await
            .map_err(|source| StorageError::Read {
                key: key.to_owned(),
                source,
            })
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        Self::write_inner(&self.path_for(key), &value)
            .await
            .map_err(|source| StorageError::Write {
                key: key.to_owned(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use crate::storage::{KeyValueStore, StorageError};

    use super::FileStore;

    #[tokio::test]
    async fn test_file_store_missing_key() -> Result<()> {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path().to_owned())?;
        assert_eq!(store.get("foodExpenses").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_file_store_overwrite_shorter_value() -> Result<()> {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path().to_owned())?;
        store.set("foodExpenses", "[1, 2, 3, 4, 5]".into()).await?;
        store.set("foodExpenses", "[]".into()).await?;

        assert_eq!(store.get("foodExpenses").await?.as_deref(), Some("[]"));
        assert!(dir.path().join("foodExpenses.json").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_file_store_persists_between_instances() -> Result<()> {
        let dir = tempdir()?;
        FileStore::new(dir.path().to_owned())?
            .set("key", "value".into())
            .await?;

        let reopened = FileStore::new(dir.path().to_owned())?;
        assert_eq!(reopened.get("key").await?.as_deref(), Some("value"));
        Ok(())
    }

    #[test]
    fn test_path_for_stays_in_root() -> Result<()> {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path().to_owned())?;
        let path = store.path_for("../outside/key");
        assert_eq!(path.parent(), Some(dir.path()));
        assert_eq!(path.file_name().and_then(|v| v.to_str()), Some("___outside_key.json"));
        Ok(())
    }

    #[tokio::test]
    async fn test_file_store_write_failure() -> Result<()> {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path().to_owned())?;
        // A directory in place of the file makes the write impossible.
        std::fs::create_dir(store.path_for("key"))?;

        let result = store.set("key", "value".into()).await;
        assert!(matches!(result, Err(StorageError::Write { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_value() -> Result<()> {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path().to_owned())?;
        store.set("foodExpenses", "[1, 2, 3]".into()).await?;
        std::fs::create_dir(FileStore::staging_path(&store.path_for("foodExpenses")))?;

        let result = store.set("foodExpenses", "[]".into()).await;

        assert!(matches!(result, Err(StorageError::Write { .. })));
        assert_eq!(store.get("foodExpenses").await?.as_deref(), Some("[1, 2, 3]"));
        Ok(())
    }

    #[tokio::test]
    async fn test_write_leaves_no_staging_file() -> Result<()> {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path().to_owned())?;
        store.set("foodExpenses", "[]".into()).await?;

        let entries = std::fs::read_dir(dir.path())?.count();
        assert_eq!(entries, 1);
        Ok(())
    }
}
