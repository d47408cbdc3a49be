//! Common error types for SeedVault.

use thiserror::Error;

/// Top-level error type for SeedVault operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Encrypting a seed phrase failed.
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Decrypting a seed phrase failed (wrong passphrase or corrupt ciphertext).
    #[error("Decryption error: {0}")]
    Decryption(String),

    /// A tag payload did not decode to the expected shape.
    #[error("Payload format error: {0}")]
    PayloadFormat(String),

    /// Tag medium failure (radio unavailable, disabled, tag removed mid-operation).
    #[error("Medium error: {0}")]
    Medium(String),

    /// Settings store read/write failure or corruption.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found (e.g. a stale entry handle).
    #[error("Not found: {0}")]
    NotFound(String),

    /// User-interaction channel failure (dialog dismissed abnormally, closed pipe).
    #[error("Interaction error: {0}")]
    Interaction(String),
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
