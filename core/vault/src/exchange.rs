//! Tag import/export protocol.
//!
//! Import walks `Listening → PayloadReceived → {Duplicate | AwaitingConfirmation}
//! → {Imported | Discarded}` per delivered payload: parse, dedup against the
//! vault by ciphertext identity, then gate new seeds behind a user
//! confirmation. Export is a single confirmed write of one entry's wire
//! payload.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::entry::EntryHandle;
use crate::interact::{ConfirmOptions, InteractionService};
use crate::vault::SeedVault;
use seedvault_common::{Error, Result};
use seedvault_medium::{ScanOptions, TagMedium};

/// Decoded tag payload. Transient: parsed, judged, and dropped.
#[derive(Debug, Deserialize)]
struct TagPayload {
    #[serde(rename = "name")]
    label: String,
    #[serde(rename = "encryptedSeed")]
    ciphertext: String,
}

/// How one delivered payload was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// User confirmed; the entry was inserted verbatim and persisted.
    Imported { label: String },
    /// Ciphertext already known; no mutation.
    Duplicate { label: String },
    /// User declined the confirmation; no mutation.
    Declined,
    /// Payload did not parse as the expected wire shape; that tap is
    /// discarded but the listener stays up.
    Rejected { reason: String },
}

/// Tag exchange protocol driver.
///
/// Borrows the vault for the duration of an exchange, so protocol steps
/// cannot interleave with other vault mutations.
pub struct TagExchange<'a> {
    vault: &'a mut SeedVault,
    medium: &'a dyn TagMedium,
    interaction: &'a dyn InteractionService,
}

impl<'a> TagExchange<'a> {
    pub fn new(
        vault: &'a mut SeedVault,
        medium: &'a dyn TagMedium,
        interaction: &'a dyn InteractionService,
    ) -> Self {
        Self {
            vault,
            medium,
            interaction,
        }
    }

    /// Listen for tag payloads and run the import decision per payload.
    ///
    /// Runs until the listener channel closes (medium deactivated or
    /// stopped). Payloads are processed strictly sequentially, so at most
    /// one confirmation dialog is outstanding.
    ///
    /// # Errors
    /// - [`Error::Medium`] if the listener cannot start
    /// - [`Error::Persistence`] if persisting a confirmed import fails
    ///   (the insert is rolled back before the error surfaces)
    pub async fn import(&mut self, options: ScanOptions) -> Result<Vec<ImportOutcome>> {
        let mut payloads = self.medium.start_payload_listener(options).await?;

        let mut outcomes = Vec::new();
        while let Some(record) = payloads.recv().await {
            outcomes.push(self.handle_payload(&record).await?);
        }

        debug!(count = outcomes.len(), "Import session finished");
        Ok(outcomes)
    }

    async fn handle_payload(&mut self, record: &str) -> Result<ImportOutcome> {
        let payload: TagPayload = match serde_json::from_str(record) {
            Ok(payload) => payload,
            Err(e) => {
                let reason = Error::PayloadFormat(format!("Unreadable tag payload: {}", e));
                warn!(%reason, "Discarding tag read");
                self.interaction
                    .alert("The scanned tag does not hold a readable seed.")
                    .await?;
                return Ok(ImportOutcome::Rejected {
                    reason: reason.to_string(),
                });
            }
        };

        if let Some(position) = self.vault.lookup(&payload.ciphertext) {
            let label = self.vault.entries()[position].label.clone();
            self.interaction
                .alert(&format!(
                    "The scanned tag matched an existing seed: {}",
                    label
                ))
                .await?;
            return Ok(ImportOutcome::Duplicate { label });
        }

        let confirmed = self
            .interaction
            .confirm(ConfirmOptions::new(
                "New seed detected",
                "New encrypted seed detected! Import now?",
                "Import",
                "Cancel",
            ))
            .await?;

        if !confirmed {
            debug!("Import declined");
            return Ok(ImportOutcome::Declined);
        }

        self.vault
            .import_entry(&payload.label, &payload.ciphertext)
            .await?;
        self.interaction
            .alert("New seed import successful!")
            .await?;

        Ok(ImportOutcome::Imported {
            label: payload.label,
        })
    }

    /// Write one entry's wire payload to a tag, behind a confirmation.
    ///
    /// Returns `false` when the user cancels before any tag contact.
    ///
    /// # Errors
    /// - [`Error::NotFound`] for a stale handle
    /// - [`Error::Medium`] if the physical write fails (surfaced to the
    ///   user as a notice before propagating)
    pub async fn export(&mut self, handle: &EntryHandle) -> Result<bool> {
        let confirmed = self
            .interaction
            .confirm(ConfirmOptions::new(
                "Write seed to tag",
                "Tap and hold your tag near the device, then confirm to write.",
                "Write tag",
                "Cancel",
            ))
            .await?;

        if !confirmed {
            return Ok(false);
        }

        let entry = self.vault.entry(handle)?;
        let payload = serde_json::to_string(entry)
            .map_err(|e| Error::PayloadFormat(format!("Cannot serialize entry: {}", e)))?;

        if let Err(e) = self.medium.write_text(&payload).await {
            self.interaction
                .alert(&format!("Writing the tag failed: {}", e))
                .await?;
            return Err(e);
        }

        self.interaction
            .alert("Tag updated, wrote encrypted seed phrase!")
            .await?;
        Ok(true)
    }
}
