//! Passphrase-based cipher for SeedVault.
//!
//! This module provides:
//! - Key derivation using Argon2id
//! - Authenticated encryption using XChaCha20-Poly1305
//! - A compact string encoding for ciphertexts
//! - BIP-39 mnemonic generation for fresh seed phrases
//!
//! # Security Guarantees
//! - Derived key material is automatically zeroized on drop
//! - No plaintext or passphrase is ever logged
//! - Wrong-passphrase decryption fails hard; garbled plaintext is never
//!   returned (the ciphertext carries an authentication tag)

pub mod kdf;
pub mod mnemonic;
pub mod sealed;

pub use kdf::{derive_key, KdfParams};
pub use sealed::{Cipher, PassphraseCipher, CIPHERTEXT_PREFIX};
