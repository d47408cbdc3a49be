//! BIP-39 mnemonic generation.
//!
//! Fresh seed phrases for users who want the vault to mint one instead of
//! typing their own.

use bip39::{Language, Mnemonic};

use seedvault_common::{Error, Result, Secret};

/// Valid BIP-39 word counts.
pub const WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// Generate a fresh English mnemonic with the given word count.
///
/// # Errors
/// - [`Error::InvalidInput`] if `word_count` is not a valid BIP-39 length
pub fn generate(word_count: usize) -> Result<Secret> {
    if !WORD_COUNTS.contains(&word_count) {
        return Err(Error::InvalidInput(format!(
            "Invalid mnemonic length {} (expected one of {:?})",
            word_count, WORD_COUNTS
        )));
    }

    let mnemonic = Mnemonic::generate_in(Language::English, word_count)
        .map_err(|e| Error::Encryption(format!("Mnemonic generation failed: {}", e)))?;

    Ok(Secret::new(mnemonic.to_string()))
}
