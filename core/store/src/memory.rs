//! In-memory settings store for testing.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::settings::SettingsStore;
use seedvault_common::{Error, Result};

/// In-memory settings store.
///
/// Useful for testing and development. All data is stored in memory and lost
/// on drop.
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|_| Error::Persistence("Store lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| Error::Persistence("Store lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| Error::Persistence("Store lock poisoned".to_string()))?;
        values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("seeds").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = MemoryStore::new();
        store.put("seeds", "[]").await.unwrap();
        assert_eq!(store.get("seeds").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryStore::new();
        store.put("seeds", "old").await.unwrap();
        store.put("seeds", "new").await.unwrap();
        assert_eq!(store.get("seeds").await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_remove() {
        let store = MemoryStore::new();
        store.put("seeds", "[]").await.unwrap();
        store.remove("seeds").await.unwrap();
        assert_eq!(store.get("seeds").await.unwrap(), None);
    }
}
