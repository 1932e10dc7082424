//! # Sealpad Core
//!
//! Passphrase-based encryption for text documents, producing ASCII-armored
//! OpenPGP messages that other OpenPGP tools can read.
//!
//! ## Architecture
//!
//! - **config**: user-facing preferences and the resolver that validates them
//! - **envelope**: encrypt / decrypt / inspect armored envelopes
//! - **armor**, **packet**: the OpenPGP wire format
//! - **crypto**: S2K, AES-GCM, AES-CFB and HKDF bindings
//! - **task**: blocking-pool wrappers for async callers (feature `async`)
//! - **fs**: atomic file writes for callers that persist documents
//!
//! The crate holds no global state. Every call takes its passphrase and
//! configuration explicitly, and the passphrase is never stored.

pub mod armor;
pub mod config;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod fs;
pub mod packet;
#[cfg(feature = "async")]
pub mod task;

pub use config::{
    resolve_config, resolve_config_json, Compression, KdfIterations, PassphraseConfig,
    SymmetricCipher,
};
pub use envelope::{decrypt, decrypt_with_info, encrypt, inspect, is_envelope, Decrypted, EnvelopeInfo};
pub use error::{Result, SealpadError};
#[cfg(feature = "async")]
pub use task::{decrypt_async, decrypt_with_info_async, encrypt_async};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
