//! Error types for Sealpad core operations.
//!
//! Every variant is terminal for the call that produced it: the codec never
//! retries and never returns partial output alongside an error. Messages are
//! descriptive at the core level; the CLI layer maps them to user-facing
//! text and exit codes.
//!
//! No variant ever carries plaintext, passphrases or key material.

use thiserror::Error;

/// Result type alias for Sealpad operations.
pub type Result<T> = std::result::Result<T, SealpadError>;

/// Core error type for Sealpad operations.
#[derive(Debug, Error)]
pub enum SealpadError {
    /// A preference held a value outside its enumerated set or range
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Passphrase was empty
    #[error("Passphrase cannot be empty")]
    EmptyPassphrase,

    /// Input is not valid armor or lacks required packets
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// AEAD tag verification failed (wrong passphrase or tampering)
    #[error("Authentication failed: wrong passphrase or tampered envelope")]
    AuthenticationFailed,

    /// Legacy (non-AEAD) integrity check failed
    #[error("Integrity check failed: wrong passphrase or corrupted envelope")]
    IntegrityCheckFailed,

    /// Decrypted payload could not be decompressed
    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),

    /// Decrypted payload is not valid UTF-8 text
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// Primitive failure (RNG unavailable, bad key length, task join)
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// I/O error from the filesystem helpers
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl SealpadError {
    /// True for the failures a wrong passphrase produces.
    ///
    /// UIs typically conflate these into a single "wrong passphrase or
    /// corrupted file" message and offer a retry.
    pub fn is_wrong_passphrase(&self) -> bool {
        matches!(
            self,
            SealpadError::AuthenticationFailed | SealpadError::IntegrityCheckFailed
        )
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        SealpadError::MalformedEnvelope(message.into())
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        SealpadError::InvalidConfiguration(message.into())
    }
}
