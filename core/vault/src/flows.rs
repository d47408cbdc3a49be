//! Interactive vault flows.
//!
//! The encrypt-new and reveal workflows the interaction layer triggers:
//! passphrase prompt, decrypt, display, optional clipboard copy. Plaintext is
//! dropped (zeroized) when the flow returns.

use tracing::debug;

use crate::entry::EntryHandle;
use crate::interact::{ConfirmOptions, InteractionService, PromptOptions};
use crate::vault::SeedVault;
use seedvault_common::{Error, Result};

/// Interaction-driven workflows over a vault.
pub struct VaultFlows<'a> {
    vault: &'a mut SeedVault,
    interaction: &'a dyn InteractionService,
}

impl<'a> VaultFlows<'a> {
    pub fn new(vault: &'a mut SeedVault, interaction: &'a dyn InteractionService) -> Self {
        Self { vault, interaction }
    }

    /// Encrypt a new seed phrase behind a passphrase prompt.
    ///
    /// Returns `None` when the user cancels the prompt; nothing is inserted.
    pub async fn encrypt_new(&mut self, plaintext: &str) -> Result<Option<EntryHandle>> {
        let reply = self
            .interaction
            .prompt(PromptOptions::password(
                "Encrypt seed",
                "Choose a passphrase for this seed. You will need it again to decrypt.",
                "Encrypt",
                "Cancel",
            ))
            .await?;

        if !reply.confirmed {
            debug!("Encryption cancelled at passphrase prompt");
            return Ok(None);
        }

        let handle = self.vault.create_entry(plaintext, &reply.text).await?;
        Ok(Some(handle))
    }

    /// Decrypt an entry and hand the plaintext to the user.
    ///
    /// On success the plaintext is shown in a confirm dialog whose
    /// affirmative copies it to the clipboard. A wrong passphrase is
    /// surfaced as a notice and the flow reports `false`; the vault itself
    /// retains nothing either way.
    pub async fn reveal(&mut self, handle: &EntryHandle) -> Result<bool> {
        let reply = self
            .interaction
            .prompt(PromptOptions::password(
                "Decrypt seed",
                "Use the passphrase you provided earlier for this seed",
                "Decrypt",
                "Cancel",
            ))
            .await?;

        if !reply.confirmed {
            return Ok(false);
        }

        let plaintext = match self.vault.decrypt_entry(handle, &reply.text) {
            Ok(plaintext) => plaintext,
            Err(Error::Decryption(reason)) => {
                self.interaction
                    .alert(&format!("Decryption failed: {}", reason))
                    .await?;
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        let copy = self
            .interaction
            .confirm(ConfirmOptions::new(
                "Decrypted seed",
                plaintext.expose(),
                "Copy to clipboard",
                "Ok",
            ))
            .await?;

        if copy {
            self.interaction
                .copy_to_clipboard(plaintext.expose())
                .await?;
            self.interaction.alert("Saved to clipboard").await?;
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interact::{PromptReply, ScriptedInteraction};
    use seedvault_cipher::{Cipher, KdfParams, PassphraseCipher};
    use seedvault_store::MemoryStore;
    use std::sync::Arc;

    fn test_cipher() -> Arc<dyn Cipher> {
        Arc::new(PassphraseCipher::with_params(KdfParams {
            memory_cost: 8,
            time_cost: 1,
            parallelism: 1,
        }))
    }

    async fn empty_vault() -> SeedVault {
        SeedVault::load(test_cipher(), Arc::new(MemoryStore::new()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_encrypt_new_inserts_entry() {
        let mut vault = empty_vault().await;
        let interaction = ScriptedInteraction::new();
        interaction.push_prompt(PromptReply::confirmed("pw1"));

        let handle = VaultFlows::new(&mut vault, &interaction)
            .encrypt_new("mnemonic123")
            .await
            .unwrap();

        assert!(handle.is_some());
        assert_eq!(vault.len(), 1);
        assert_eq!(vault.entries()[0].label, "#1");
    }

    #[tokio::test]
    async fn test_encrypt_new_cancelled_is_noop() {
        let mut vault = empty_vault().await;
        let interaction = ScriptedInteraction::new();
        interaction.push_prompt(PromptReply::cancelled());

        let handle = VaultFlows::new(&mut vault, &interaction)
            .encrypt_new("mnemonic123")
            .await
            .unwrap();

        assert!(handle.is_none());
        assert!(vault.is_empty());
    }

    #[tokio::test]
    async fn test_reveal_copies_to_clipboard() {
        let mut vault = empty_vault().await;
        let handle = vault.create_entry("my seed words", "pw1").await.unwrap();

        let interaction = ScriptedInteraction::new();
        interaction.push_prompt(PromptReply::confirmed("pw1"));
        interaction.push_confirm(true); // "Copy to clipboard"

        let shown = VaultFlows::new(&mut vault, &interaction)
            .reveal(&handle)
            .await
            .unwrap();

        assert!(shown);
        // The plaintext reached the dialog and the clipboard.
        assert_eq!(interaction.confirms_seen(), vec!["my seed words"]);
        assert_eq!(interaction.clipboard(), vec!["my seed words"]);
        assert!(interaction.alerts().contains(&"Saved to clipboard".to_string()));
    }

    #[tokio::test]
    async fn test_reveal_without_copy() {
        let mut vault = empty_vault().await;
        let handle = vault.create_entry("my seed words", "pw1").await.unwrap();

        let interaction = ScriptedInteraction::new();
        interaction.push_prompt(PromptReply::confirmed("pw1"));
        interaction.push_confirm(false); // plain "Ok"

        let shown = VaultFlows::new(&mut vault, &interaction)
            .reveal(&handle)
            .await
            .unwrap();

        assert!(shown);
        assert!(interaction.clipboard().is_empty());
    }

    #[tokio::test]
    async fn test_reveal_wrong_passphrase_is_notice() {
        let mut vault = empty_vault().await;
        let handle = vault.create_entry("my seed words", "pw1").await.unwrap();

        let interaction = ScriptedInteraction::new();
        interaction.push_prompt(PromptReply::confirmed("wrong"));

        let shown = VaultFlows::new(&mut vault, &interaction)
            .reveal(&handle)
            .await
            .unwrap();

        assert!(!shown);
        assert!(interaction
            .alerts()
            .iter()
            .any(|a| a.contains("Decryption failed")));
        assert!(interaction.clipboard().is_empty());
    }
}
