//! Local-file settings store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::settings::SettingsStore;
use seedvault_common::{Error, Result};

/// Settings store backed by a single JSON object file.
///
/// Writes land in a sibling temp file which is then renamed over the real one,
/// so a reader never observes a half-written store.
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a file store at the given path.
    ///
    /// # Postconditions
    /// - Parent directory exists
    /// - The store file itself is created lazily on first `put`
    ///
    /// # Errors
    /// - Permission denied creating the parent directory
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_map(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let raw = fs::read_to_string(&self.path).await?;
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(Error::Persistence(format!(
                "Store file {} is not a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(Error::Persistence(format!(
                "Store file {} is corrupt: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn write_map(&self, map: &Map<String, Value>) -> Result<()> {
        let serialized = serde_json::to_string_pretty(&Value::Object(map.clone()))
            .map_err(|e| Error::Persistence(format!("Cannot serialize store: {}", e)))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serialized.as_bytes()).await?;
        fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), "Settings file written");
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self.read_map().await?;
        match map.get(key) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(_) => Err(Error::Persistence(format!(
                "Value under key '{}' is not a string",
                key
            ))),
        }
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map().await?;
        map.insert(key.to_string(), Value::String(value.to_string()));
        self.write_map(&map).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map().await?;
        if map.remove(key).is_some() {
            self.write_map(&map).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_get_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.get("seeds").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("settings.json")).unwrap();

        store.put("seeds", "[{\"name\":\"#1\"}]").await.unwrap();
        assert_eq!(
            store.get("seeds").await.unwrap().as_deref(),
            Some("[{\"name\":\"#1\"}]")
        );
    }

    #[tokio::test]
    async fn test_value_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        {
            let store = FileStore::new(&path).unwrap();
            store.put("seeds", "[]").await.unwrap();
        }

        let reopened = FileStore::new(&path).unwrap();
        assert_eq!(reopened.get("seeds").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("settings.json")).unwrap();

        store.put("seeds", "[]").await.unwrap();
        store.put("theme", "dark").await.unwrap();
        store.remove("theme").await.unwrap();

        assert_eq!(store.get("seeds").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get("theme").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_persistence_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = FileStore::new(&path).unwrap();
        assert!(matches!(
            store.get("seeds").await,
            Err(Error::Persistence(_))
        ));
    }

    #[tokio::test]
    async fn test_non_object_file_is_persistence_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let store = FileStore::new(&path).unwrap();
        assert!(matches!(
            store.get("seeds").await,
            Err(Error::Persistence(_))
        ));
    }
}
