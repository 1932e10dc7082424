//! Passphrase validation.

use crate::error::{Result, SealpadError};

/// Validate a passphrase before it is used for key derivation.
///
/// The only requirement is that it is non-empty. Whitespace-only and short
/// passphrases are accepted: strength policy belongs to the caller.
///
/// # Examples
///
/// ```
/// use sealpad_core::crypto::validate_passphrase;
///
/// assert!(validate_passphrase("correct-horse").is_ok());
/// assert!(validate_passphrase("").is_err());
/// ```
pub fn validate_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.is_empty() {
        return Err(SealpadError::EmptyPassphrase);
    }
    Ok(())
}
