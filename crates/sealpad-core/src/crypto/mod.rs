//! Cryptographic primitive bindings.
//!
//! Thin wrappers over audited RustCrypto crates:
//! - **AES** (128/192/256) in GCM mode for AEAD framing and CFB mode for the
//!   legacy framing
//! - **Iterated+salted S2K** over SHA-256 for passphrase-to-key derivation
//! - **HKDF-SHA256** for deriving per-packet keys from the session key
//!
//! ## Security Model
//!
//! - Passphrases are supplied per call and never stored
//! - Key material is zeroized from memory on drop
//! - Salts, session keys and nonces come from the OS RNG
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of an encrypted document
//! - Offline brute-force attacks on the passphrase (work factor via S2K)
//! - Tampering with an envelope (AEAD tag or MDC)
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to process memory while a document is open

pub mod cipher;
pub mod key;
pub mod passphrase;
pub mod s2k;

pub use key::{fill_random, hkdf_sha256, random_key, KeyMaterial};
pub use passphrase::validate_passphrase;
pub use s2k::{HashAlgorithm, S2k};
