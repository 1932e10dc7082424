//! Command handlers.

pub mod config;
pub mod document;
pub mod filter;
pub mod inspect;
pub mod misc;

use std::io::Write;
use std::path::Path;

use secrecy::{ExposeSecret, SecretString};

use sealpad_core::{encrypt, PassphraseConfig};

use crate::app::resolver::is_stdio;

/// Write a document to `path`, encrypting it when a passphrase is given.
///
/// Returns the label describing what was written.
pub(crate) fn save_document(
    path: &Path,
    text: &str,
    sealed: Option<(&SecretString, &PassphraseConfig)>,
) -> anyhow::Result<String> {
    match sealed {
        Some((passphrase, config)) => {
            let armored = encrypt(text, passphrase.expose_secret(), config)?;
            sealpad_core::fs::write_atomic(path, armored.as_bytes(), true)?;
            Ok(config.label())
        }
        None => {
            sealpad_core::fs::write_atomic(path, text.as_bytes(), false)?;
            Ok("plain text".to_string())
        }
    }
}

/// Write filter output to a file (owner-only) or stdout.
pub(crate) fn write_output(path: Option<&Path>, contents: &str) -> anyhow::Result<()> {
    match path {
        Some(path) if !is_stdio(Some(path)) => {
            sealpad_core::fs::write_atomic(path, contents.as_bytes(), true)?;
            Ok(())
        }
        _ => write_stdout(contents),
    }
}

pub(crate) fn write_stdout(contents: &str) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(contents.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|e| anyhow::anyhow!("Failed to write output: {}", e))
}
