//! Merge file preferences with command-line overrides.

use serde_json::{Map, Value};

use sealpad_core::{resolve_config, PassphraseConfig};

use crate::cli::CryptoArgs;
use crate::config::CryptoKey;

/// Build the preference mapping handed to the core resolver.
///
/// An override replaces every spelling of its field from the file, so the
/// resolver never sees the two disagree.
pub fn merge_preferences(
    file: &toml::Table,
    overrides: &CryptoArgs,
) -> anyhow::Result<Map<String, Value>> {
    let mut prefs = match serde_json::to_value(file)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    if let Some(cipher) = &overrides.cipher {
        override_field(&mut prefs, CryptoKey::Cipher, Value::from(cipher.to_lowercase()));
    }
    if let Some(aead) = overrides.aead_override() {
        override_field(&mut prefs, CryptoKey::Aead, Value::from(aead));
    }
    if let Some(compression) = &overrides.compression {
        override_field(
            &mut prefs,
            CryptoKey::Compression,
            Value::from(compression.to_lowercase()),
        );
    }
    if let Some(count) = overrides.iterations {
        override_field(&mut prefs, CryptoKey::Iterations, Value::from(count));
    }
    Ok(prefs)
}

fn override_field(prefs: &mut Map<String, Value>, key: CryptoKey, value: Value) {
    for alias in key.aliases() {
        prefs.remove(*alias);
    }
    prefs.insert(key.file_key().to_string(), value);
}

/// Resolve the configuration for one encrypt call.
pub fn resolve_passphrase_config(
    file: &toml::Table,
    overrides: &CryptoArgs,
) -> anyhow::Result<PassphraseConfig> {
    let prefs = merge_preferences(file, overrides)?;
    Ok(resolve_config(&prefs)?)
}
