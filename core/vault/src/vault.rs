//! Seed vault core: collection ownership and persistence synchronization.

use std::sync::Arc;

use tracing::{debug, info};

use crate::entry::{EntryHandle, VaultEntry};
use seedvault_cipher::Cipher;
use seedvault_common::{Error, Result, Secret};
use seedvault_store::SettingsStore;

/// Logical store key holding the serialized collection.
pub const SEEDS_KEY: &str = "seeds";

/// The ordered collection of encrypted seed entries.
///
/// Newest entries first. The vault owns the collection exclusively: the
/// settings store is its sole durable backing, every mutation re-serializes
/// the whole collection, and no other component writes to that key. Plaintext
/// exists only transiently inside [`SeedVault::create_entry`] and as the
/// [`Secret`] returned from [`SeedVault::decrypt_entry`]; it is never stored.
pub struct SeedVault {
    entries: Vec<VaultEntry>,
    cipher: Arc<dyn Cipher>,
    store: Arc<dyn SettingsStore>,
}

impl SeedVault {
    /// Load the vault from its settings store.
    ///
    /// # Postconditions
    /// - An absent `"seeds"` key yields an empty vault (not an error)
    ///
    /// # Errors
    /// - [`Error::Persistence`] if the stored collection is corrupt
    pub async fn load(cipher: Arc<dyn Cipher>, store: Arc<dyn SettingsStore>) -> Result<Self> {
        let entries: Vec<VaultEntry> = match store.get(SEEDS_KEY).await? {
            None => Vec::new(),
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                Error::Persistence(format!("Stored seed collection is corrupt: {}", e))
            })?,
        };

        debug!(count = entries.len(), store = store.name(), "Vault loaded");

        Ok(Self {
            entries,
            cipher,
            store,
        })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the vault is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in display order (newest first).
    pub fn entries(&self) -> &[VaultEntry] {
        &self.entries
    }

    /// Handle for the entry at a display position.
    ///
    /// Bridge for interaction layers that address rows by position; all
    /// vault operations then go through the opaque handle.
    pub fn handle_at(&self, position: usize) -> Option<EntryHandle> {
        self.entries
            .get(position)
            .map(|entry| EntryHandle::new(&entry.ciphertext))
    }

    /// Position of the first entry with this exact ciphertext, if any.
    ///
    /// This linear scan is the sole dedup mechanism: two entries are the
    /// same seed iff their ciphertext strings are byte-identical.
    pub fn lookup(&self, ciphertext: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.ciphertext == ciphertext)
    }

    /// Resolve a handle to the entry it names.
    ///
    /// # Errors
    /// - [`Error::NotFound`] if the entry has since been removed
    pub fn entry(&self, handle: &EntryHandle) -> Result<&VaultEntry> {
        let position = self.resolve(handle)?;
        Ok(&self.entries[position])
    }

    /// Encrypt a new seed phrase and insert it.
    ///
    /// The label is assigned sequentially (`"#1"`, `"#2"`, …). This manual
    /// path never dedup-checks: encrypting always inserts, even if the
    /// ciphertext happened to collide with an existing entry. Only the tag
    /// import path rejects duplicates.
    ///
    /// # Postconditions
    /// - Entry is prepended (newest first) and the collection is persisted
    ///
    /// # Errors
    /// - [`Error::Encryption`] from the cipher
    /// - [`Error::Persistence`] if the store write fails (the insert is
    ///   rolled back; no half-inserted state remains)
    pub async fn create_entry(&mut self, plaintext: &str, passphrase: &str) -> Result<EntryHandle> {
        let ciphertext = self.cipher.encrypt(plaintext, passphrase)?;
        let label = format!("#{}", self.entries.len() + 1);

        let handle = self.insert(VaultEntry::new(&label, ciphertext)).await?;
        info!(label = %label, "Seed encrypted and stored");
        Ok(handle)
    }

    /// Insert an entry imported from a tag, label and ciphertext verbatim.
    ///
    /// Dedup is the import protocol's responsibility; the vault inserts
    /// whatever it is handed.
    pub async fn import_entry(&mut self, label: &str, ciphertext: &str) -> Result<EntryHandle> {
        let handle = self.insert(VaultEntry::new(label, ciphertext)).await?;
        info!(label = %label, "Seed imported from tag");
        Ok(handle)
    }

    /// Decrypt an entry.
    ///
    /// The vault retains nothing: the plaintext lives only in the returned
    /// [`Secret`], which zeroizes on drop.
    ///
    /// # Errors
    /// - [`Error::NotFound`] for a stale handle
    /// - [`Error::Decryption`] on wrong passphrase or corrupt ciphertext
    pub fn decrypt_entry(&self, handle: &EntryHandle, passphrase: &str) -> Result<Secret> {
        let entry = self.entry(handle)?;
        self.cipher.decrypt(&entry.ciphertext, passphrase)
    }

    /// Remove an entry and persist the shrunken collection.
    ///
    /// # Errors
    /// - [`Error::NotFound`] for a stale handle
    /// - [`Error::Persistence`] if the store write fails (the removal is
    ///   rolled back)
    pub async fn remove_entry(&mut self, handle: &EntryHandle) -> Result<VaultEntry> {
        let position = self.resolve(handle)?;
        let removed = self.entries.remove(position);

        match self.persist().await {
            Ok(()) => {
                info!(label = %removed.label, "Seed removed");
                Ok(removed)
            }
            Err(e) => {
                self.entries.insert(position, removed);
                Err(e)
            }
        }
    }

    fn resolve(&self, handle: &EntryHandle) -> Result<usize> {
        self.lookup(&handle.ciphertext)
            .ok_or_else(|| Error::NotFound("Entry no longer exists".to_string()))
    }

    async fn insert(&mut self, entry: VaultEntry) -> Result<EntryHandle> {
        let handle = EntryHandle::new(&entry.ciphertext);
        self.entries.insert(0, entry);

        if let Err(e) = self.persist().await {
            self.entries.remove(0);
            return Err(e);
        }
        Ok(handle)
    }

    async fn persist(&self) -> Result<()> {
        let serialized = serde_json::to_string(&self.entries)
            .map_err(|e| Error::Persistence(format!("Cannot serialize collection: {}", e)))?;
        self.store.put(SEEDS_KEY, &serialized).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use seedvault_cipher::{KdfParams, PassphraseCipher};
    use seedvault_store::MemoryStore;

    fn test_cipher() -> Arc<dyn Cipher> {
        Arc::new(PassphraseCipher::with_params(KdfParams {
            memory_cost: 8,
            time_cost: 1,
            parallelism: 1,
        }))
    }

    async fn empty_vault() -> (SeedVault, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let vault = SeedVault::load(test_cipher(), store.clone()).await.unwrap();
        (vault, store)
    }

    #[tokio::test]
    async fn test_create_entry_in_empty_vault() {
        let (mut vault, store) = empty_vault().await;

        vault.create_entry("mnemonic123", "pw1").await.unwrap();

        assert_eq!(vault.len(), 1);
        assert_eq!(vault.entries()[0].label, "#1");

        let persisted = store.get(SEEDS_KEY).await.unwrap().unwrap();
        let stored: Vec<VaultEntry> = serde_json::from_str(&persisted).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0], vault.entries()[0]);
    }

    #[tokio::test]
    async fn test_labels_assigned_sequentially() {
        let (mut vault, _store) = empty_vault().await;

        for i in 1..=3 {
            vault
                .create_entry(&format!("seed {}", i), "pw")
                .await
                .unwrap();
        }

        // Newest first, so labels read back in reverse.
        let labels: Vec<&str> = vault.entries().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["#3", "#2", "#1"]);
    }

    #[tokio::test]
    async fn test_decrypt_roundtrip_through_vault() {
        let (mut vault, _store) = empty_vault().await;

        let handle = vault.create_entry("my secret seed", "pw1").await.unwrap();
        let plaintext = vault.decrypt_entry(&handle, "pw1").unwrap();
        assert_eq!(plaintext.expose(), "my secret seed");
    }

    #[tokio::test]
    async fn test_decrypt_wrong_passphrase_fails() {
        let (mut vault, _store) = empty_vault().await;

        let handle = vault.create_entry("my secret seed", "pw1").await.unwrap();
        assert!(matches!(
            vault.decrypt_entry(&handle, "pw2"),
            Err(Error::Decryption(_))
        ));
    }

    #[tokio::test]
    async fn test_remove_entry_updates_store() {
        let (mut vault, store) = empty_vault().await;

        for i in 1..=3 {
            vault
                .create_entry(&format!("seed {}", i), "pw")
                .await
                .unwrap();
        }

        let first = vault.entries()[0].clone();
        let handle = vault.handle_at(0).unwrap();
        let removed = vault.remove_entry(&handle).await.unwrap();

        assert_eq!(removed, first);
        assert_eq!(vault.len(), 2);
        assert!(vault.lookup(&first.ciphertext).is_none());

        let persisted = store.get(SEEDS_KEY).await.unwrap().unwrap();
        let stored: Vec<VaultEntry> = serde_json::from_str(&persisted).unwrap();
        assert_eq!(stored, vault.entries());
    }

    #[tokio::test]
    async fn test_stale_handle_is_not_found() {
        let (mut vault, _store) = empty_vault().await;

        let handle = vault.create_entry("seed", "pw").await.unwrap();
        vault.remove_entry(&handle).await.unwrap();

        assert!(matches!(
            vault.remove_entry(&handle).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            vault.decrypt_entry(&handle, "pw"),
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_manual_path_allows_duplicate_ciphertext() {
        let (mut vault, _store) = empty_vault().await;

        // Import-style verbatim inserts stand in for a ciphertext collision:
        // the vault itself never rejects, only the import protocol does.
        vault.import_entry("tag1", "X").await.unwrap();
        vault.import_entry("tag2", "X").await.unwrap();

        assert_eq!(vault.len(), 2);
        assert_eq!(vault.lookup("X"), Some(0));
    }

    #[tokio::test]
    async fn test_load_restores_persisted_collection() {
        let store = Arc::new(MemoryStore::new());

        {
            let mut vault = SeedVault::load(test_cipher(), store.clone()).await.unwrap();
            vault.create_entry("seed one", "pw").await.unwrap();
            vault.create_entry("seed two", "pw").await.unwrap();
        }

        let reloaded = SeedVault::load(test_cipher(), store.clone()).await.unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.entries()[0].label, "#2");
        assert_eq!(reloaded.entries()[1].label, "#1");
    }

    #[tokio::test]
    async fn test_persistence_idempotence() {
        let store = Arc::new(MemoryStore::new());

        let mut vault = SeedVault::load(test_cipher(), store.clone()).await.unwrap();
        vault.create_entry("seed", "pw").await.unwrap();
        let before = store.get(SEEDS_KEY).await.unwrap().unwrap();

        // load(); save(same data); load() yields an equal collection.
        let reloaded = SeedVault::load(test_cipher(), store.clone()).await.unwrap();
        reloaded.persist().await.unwrap();
        let after = store.get(SEEDS_KEY).await.unwrap().unwrap();

        assert_eq!(before, after);
        let again = SeedVault::load(test_cipher(), store.clone()).await.unwrap();
        assert_eq!(again.entries(), reloaded.entries());
    }

    #[tokio::test]
    async fn test_corrupt_store_fails_load() {
        let store = Arc::new(MemoryStore::new());
        store.put(SEEDS_KEY, "not json").await.unwrap();

        assert!(matches!(
            SeedVault::load(test_cipher(), store).await,
            Err(Error::Persistence(_))
        ));
    }

    /// Store that accepts the first N writes, then fails.
    struct FlakyStore {
        inner: MemoryStore,
        writes_left: std::sync::atomic::AtomicU32,
    }

    #[async_trait]
    impl SettingsStore for FlakyStore {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key).await
        }

        async fn put(&self, key: &str, value: &str) -> Result<()> {
            use std::sync::atomic::Ordering;
            if self.writes_left.fetch_sub(1, Ordering::SeqCst) == 0 {
                return Err(Error::Persistence("Disk full".to_string()));
            }
            self.inner.put(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key).await
        }
    }

    #[tokio::test]
    async fn test_failed_persist_rolls_back_insert() {
        let store = Arc::new(FlakyStore {
            inner: MemoryStore::new(),
            writes_left: std::sync::atomic::AtomicU32::new(1),
        });
        let mut vault = SeedVault::load(test_cipher(), store).await.unwrap();

        vault.create_entry("first", "pw").await.unwrap();
        let err = vault.create_entry("second", "pw").await;

        assert!(matches!(err, Err(Error::Persistence(_))));
        // The failed insert left no half-inserted state behind.
        assert_eq!(vault.len(), 1);
        assert_eq!(vault.entries()[0].label, "#1");
    }
}
