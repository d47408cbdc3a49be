//! Vault entry data types.

use serde::{Deserialize, Serialize};

/// One encrypted seed phrase in the vault.
///
/// Pure data: the label is display-only, the ciphertext is the entry's
/// identity key. Serialized field names match the legacy wire format used
/// both on tags and in the settings store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultEntry {
    /// Display name ("#1", "#2", … for manual entries, verbatim for imports).
    #[serde(rename = "name")]
    pub label: String,
    /// Opaque encrypted payload; unique across the collection on the import path.
    #[serde(rename = "encryptedSeed")]
    pub ciphertext: String,
}

impl VaultEntry {
    /// Create an entry from its parts.
    pub fn new(label: impl Into<String>, ciphertext: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ciphertext: ciphertext.into(),
        }
    }
}

/// Opaque handle to a vault entry.
///
/// Resolves by ciphertext identity rather than raw position, so a handle
/// never indexes out of bounds: a handle whose entry was removed resolves to
/// a `NotFound` error instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHandle {
    pub(crate) ciphertext: String,
}

impl EntryHandle {
    pub(crate) fn new(ciphertext: impl Into<String>) -> Self {
        Self {
            ciphertext: ciphertext.into(),
        }
    }
}
