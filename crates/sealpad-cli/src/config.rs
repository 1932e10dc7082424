//! The CLI config file.
//!
//! `[crypto]` is kept as a raw table and handed to the core resolver, so
//! older key spellings keep working and bad values are reported the same
//! way whether they come from the file or from flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use sealpad_core::PassphraseConfig;

use crate::errors::CliError;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SealpadConfig {
    #[serde(default)]
    pub crypto: toml::Table,
    #[serde(default)]
    pub ui: UiSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UiSection {
    pub editor: Option<String>,
}

impl SealpadConfig {
    /// A config holding every crypto default explicitly.
    pub fn with_defaults() -> Self {
        let defaults = PassphraseConfig::default();
        let mut crypto = toml::Table::new();
        crypto.insert(
            CryptoKey::Cipher.file_key().to_string(),
            toml::Value::String(defaults.symmetric_cipher.as_str().to_string()),
        );
        crypto.insert(
            CryptoKey::Aead.file_key().to_string(),
            toml::Value::Boolean(defaults.aead_enabled),
        );
        crypto.insert(
            CryptoKey::Compression.file_key().to_string(),
            toml::Value::String(defaults.compression.as_str().to_string()),
        );
        crypto.insert(
            CryptoKey::Iterations.file_key().to_string(),
            toml::Value::Integer(i64::from(defaults.kdf_iterations.get())),
        );
        Self {
            crypto,
            ui: UiSection::default(),
        }
    }

    /// Store `value` under `key`, dropping any older spelling of the same field.
    pub fn set_crypto(&mut self, key: CryptoKey, value: toml::Value) {
        for alias in key.aliases() {
            self.crypto.remove(*alias);
        }
        self.crypto.insert(key.file_key().to_string(), value);
    }
}

/// A field of the `[crypto]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoKey {
    Cipher,
    Aead,
    Compression,
    Iterations,
}

impl CryptoKey {
    pub fn parse(name: &str) -> Option<Self> {
        let key = match name {
            "symmetric_cipher" | "cipher" => Self::Cipher,
            "aead" | "aead_enabled" => Self::Aead,
            "compression" => Self::Compression,
            "kdf_iteration_count" | "iterations" => Self::Iterations,
            _ => return None,
        };
        Some(key)
    }

    pub fn file_key(&self) -> &'static str {
        self.aliases()[0]
    }

    /// Every spelling the resolver accepts for this field.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Cipher => &["symmetric_cipher", "symmetricCipher", "symmetric"],
            Self::Aead => &["aead", "aeadEnabled", "aead_enabled"],
            Self::Compression => &["compression"],
            Self::Iterations => &[
                "kdf_iteration_count",
                "kdfIterationCount",
                "s2kIterationCount",
                "s2k_iteration_count",
            ],
        }
    }

    /// Parse a command-line value into the TOML type the resolver expects.
    pub fn parse_value(&self, raw: &str) -> anyhow::Result<toml::Value> {
        let raw = raw.trim();
        match self {
            Self::Cipher | Self::Compression => Ok(toml::Value::String(raw.to_lowercase())),
            Self::Aead => match raw.to_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(toml::Value::Boolean(true)),
                "false" | "no" | "off" | "0" => Ok(toml::Value::Boolean(false)),
                _ => Err(CliError::invalid_input(format!(
                    "aead must be true or false, got \"{}\"",
                    raw
                ))
                .into()),
            },
            Self::Iterations => raw
                .parse::<i64>()
                .map(toml::Value::Integer)
                .map_err(|_| {
                    CliError::invalid_input(format!(
                        "kdf_iteration_count must be an integer, got \"{}\"",
                        raw
                    ))
                    .into()
                }),
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn read_config(path: &Path) -> anyhow::Result<SealpadConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents).map_err(|e| {
        CliError::invalid_input(format!("Failed to parse config {}: {}", path.display(), e)).into()
    })
}

/// Read the config, treating a missing file as all defaults.
pub fn read_config_or_default(path: &Path) -> anyhow::Result<SealpadConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(SealpadConfig::default());
    }
    read_config(path)
}

pub fn write_config(path: &Path, config: &SealpadConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    sealpad_core::fs::write_atomic(path, contents.as_bytes(), false)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("sealpad"));
        }
    }
    Ok(home_dir()?.join(".config").join("sealpad"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
