//! Path resolution for the config file and document inputs.

use std::path::{Path, PathBuf};

use crate::config::default_config_path;
use crate::constants::CONFIG_ENV;
use crate::errors::CliError;

/// Resolve the config file path, checking SEALPAD_CONFIG env var first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(CONFIG_ENV) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Read a document as text, mapping a missing file to a not-found error.
pub fn read_document(path: &Path) -> anyhow::Result<String> {
    if !path.exists() {
        return Err(CliError::not_found(
            format!("No document found at {}", path.display()),
            "Hint: Create one with `sealpad save` or `sealpad edit`.",
        )
        .into());
    }
    let bytes = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    String::from_utf8(bytes).map_err(|_| {
        CliError::invalid_input(format!("{} is not a UTF-8 text document", path.display())).into()
    })
}

/// True for a missing path or `-`, both meaning stdio.
pub fn is_stdio(path: Option<&Path>) -> bool {
    path.map(|p| p.as_os_str() == "-").unwrap_or(true)
}
