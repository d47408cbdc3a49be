//! Passphrase-sealed ciphertext strings.
//!
//! A sealed seed phrase is a single opaque string:
//!
//! ```text
//! sv1$<base64url(salt || nonce || ciphertext+tag)>
//! ```
//!
//! The salt feeds Argon2id key derivation, the nonce and tag belong to
//! XChaCha20-Poly1305. Because the ciphertext is authenticated, decrypting
//! with the wrong passphrase is a hard [`Error::Decryption`] — unlike legacy
//! password-based schemes, it never yields garbled plaintext.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chacha20poly1305::{
    aead::{generic_array::GenericArray, rand_core::RngCore, Aead, AeadCore, KeyInit, OsRng},
    XChaCha20Poly1305,
};

use crate::kdf::{derive_key, KdfParams};
use seedvault_common::{Error, Result, Secret};

/// Version prefix carried by every ciphertext string.
pub const CIPHERTEXT_PREFIX: &str = "sv1$";

/// Salt size for key derivation (16 bytes).
pub const SALT_SIZE: usize = 16;

/// Nonce size for XChaCha20-Poly1305 (24 bytes).
pub const NONCE_SIZE: usize = 24;

/// Authentication tag size (16 bytes).
pub const TAG_SIZE: usize = 16;

/// Passphrase-based symmetric cipher over seed phrase strings.
///
/// Pure transform: no side effects, no retained state. Implementations live
/// behind this trait so the vault never depends on a concrete scheme.
pub trait Cipher: Send + Sync {
    /// Encrypt a plaintext seed phrase under a passphrase.
    ///
    /// Two calls with identical inputs yield different ciphertexts (random
    /// salt and nonce); no uniqueness guarantee is assumed from the output.
    ///
    /// # Errors
    /// - [`Error::Encryption`] if the underlying primitive fails
    /// - [`Error::InvalidInput`] if the passphrase is empty
    fn encrypt(&self, plaintext: &str, passphrase: &str) -> Result<String>;

    /// Decrypt a ciphertext string under a passphrase.
    ///
    /// # Errors
    /// - [`Error::Decryption`] on wrong passphrase, truncation, or tampering
    fn decrypt(&self, ciphertext: &str, passphrase: &str) -> Result<Secret>;
}

/// Production cipher: Argon2id key derivation + XChaCha20-Poly1305 sealing.
pub struct PassphraseCipher {
    params: KdfParams,
}

impl PassphraseCipher {
    /// Create a cipher with moderate KDF parameters.
    pub fn new() -> Self {
        Self {
            params: KdfParams::moderate(),
        }
    }

    /// Create a cipher with explicit KDF parameters.
    pub fn with_params(params: KdfParams) -> Self {
        Self { params }
    }
}

impl Default for PassphraseCipher {
    fn default() -> Self {
        Self::new()
    }
}

impl Cipher for PassphraseCipher {
    fn encrypt(&self, plaintext: &str, passphrase: &str) -> Result<String> {
        let mut salt = [0u8; SALT_SIZE];
        OsRng.fill_bytes(&mut salt);

        let key = derive_key(passphrase.as_bytes(), &salt, &self.params)?;

        let cipher = XChaCha20Poly1305::new(GenericArray::from_slice(key.as_bytes()));
        let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);

        let sealed = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| Error::Encryption(format!("Encryption failed: {}", e)))?;

        let mut raw = Vec::with_capacity(SALT_SIZE + NONCE_SIZE + sealed.len());
        raw.extend_from_slice(&salt);
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(&sealed);

        Ok(format!("{}{}", CIPHERTEXT_PREFIX, URL_SAFE_NO_PAD.encode(raw)))
    }

    fn decrypt(&self, ciphertext: &str, passphrase: &str) -> Result<Secret> {
        let encoded = ciphertext
            .strip_prefix(CIPHERTEXT_PREFIX)
            .ok_or_else(|| Error::Decryption("Unrecognized ciphertext format".to_string()))?;

        let raw = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|e| Error::Decryption(format!("Malformed ciphertext encoding: {}", e)))?;

        if raw.len() < SALT_SIZE + NONCE_SIZE + TAG_SIZE {
            return Err(Error::Decryption("Ciphertext too short".to_string()));
        }

        let (salt, rest) = raw.split_at(SALT_SIZE);
        let (nonce, sealed) = rest.split_at(NONCE_SIZE);

        let key = derive_key(passphrase.as_bytes(), salt, &self.params)?;

        let cipher = XChaCha20Poly1305::new(GenericArray::from_slice(key.as_bytes()));

        let plaintext = cipher
            .decrypt(GenericArray::from_slice(nonce), sealed)
            .map_err(|_| Error::Decryption("Wrong passphrase or corrupt ciphertext".to_string()))?;

        let plaintext = String::from_utf8(plaintext)
            .map_err(|_| Error::Decryption("Decrypted data is not valid UTF-8".to_string()))?;

        Ok(Secret::new(plaintext))
    }
}
