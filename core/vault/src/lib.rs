//! Seed vault engine for SeedVault.
//!
//! This module provides:
//! - The ordered collection of encrypted seed entries and its lifecycle
//! - Ciphertext-identity deduplication
//! - The tag import/export protocol with its user-confirmation gate
//! - Interactive flows (encrypt-new, reveal with clipboard handoff)
//!
//! # Architecture
//! The vault sits between the interaction layer and the adapter crates
//! (cipher, settings store, tag medium), owning all collection state. It is
//! single-threaded by design: one operation runs to completion at a time, and
//! at most one confirmation dialog is ever outstanding.

pub mod entry;
pub mod exchange;
pub mod flows;
pub mod interact;
pub mod vault;

pub use entry::{EntryHandle, VaultEntry};
pub use exchange::{ImportOutcome, TagExchange};
pub use flows::VaultFlows;
pub use interact::{
    ConfirmOptions, InputKind, InteractionService, PromptOptions, PromptReply,
    ScriptedInteraction,
};
pub use vault::{SeedVault, SEEDS_KEY};
