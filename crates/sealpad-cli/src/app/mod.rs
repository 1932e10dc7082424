//! Application-level utilities for the Sealpad CLI.
//!
//! This module provides:
//! - Path resolution for the config file and documents
//! - Preference merging (config file plus flags)
//! - Passphrase handling with retry logic

mod context;
mod passphrase;
mod preferences;
pub mod resolver;

// Re-export public API
pub use context::AppContext;
pub use passphrase::{decrypt_with_retry, new_passphrase};
pub use resolver::read_document;
