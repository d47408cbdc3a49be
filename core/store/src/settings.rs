//! Settings store trait definition.

use async_trait::async_trait;

use seedvault_common::Result;

/// Key-value settings store for serialized application state.
///
/// The vault keeps its whole collection under a single logical key, so the
/// contract is deliberately small: read a value, overwrite a value, drop a
/// value. Implementations must make `put` atomic from the caller's point of
/// view — no reader may observe a half-written value.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Get the store name (e.g., "memory", "file").
    fn name(&self) -> &str;

    /// Read the value stored under `key`.
    ///
    /// # Postconditions
    /// - Returns `None` if the key has never been written (not an error)
    ///
    /// # Errors
    /// - [`seedvault_common::Error::Persistence`] on store corruption or I/O failure
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Postconditions
    /// - A subsequent `get` returns exactly `value`
    /// - Concurrent readers see either the old value or the new one, never a mix
    async fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`, if any.
    async fn remove(&self, key: &str) -> Result<()>;
}
