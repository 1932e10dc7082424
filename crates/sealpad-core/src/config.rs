//! Passphrase configuration and the preference resolver.
//!
//! User preferences arrive as a partial, loosely-typed mapping (a settings
//! file section, a JSON object from a UI layer). [`resolve_config`] turns
//! that mapping into a fully-populated [`PassphraseConfig`], filling gaps
//! with defaults and rejecting anything outside the enumerated sets.
//!
//! The friendly enums here are the only representation that crosses the
//! crate boundary; the numeric OpenPGP identifiers stay internal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::crypto::s2k::{decode_count, encode_count, MAX_ITERATION_COUNT};
use crate::error::{Result, SealpadError};

/// Default KDF iteration count (octets hashed by the S2K function).
pub const DEFAULT_KDF_ITERATIONS: u32 = 65536;

const CIPHER_KEYS: &[&str] = &["symmetricCipher", "symmetric_cipher", "symmetric"];
const AEAD_KEYS: &[&str] = &["aeadEnabled", "aead_enabled", "aead"];
const COMPRESSION_KEYS: &[&str] = &["compression"];
const ITERATION_KEYS: &[&str] = &[
    "kdfIterationCount",
    "kdf_iteration_count",
    "s2kIterationCount",
    "s2k_iteration_count",
];

/// Symmetric block cipher used for the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymmetricCipher {
    Aes128,
    Aes192,
    Aes256,
}

impl SymmetricCipher {
    /// All supported ciphers, weakest first.
    pub const ALL: [SymmetricCipher; 3] = [Self::Aes128, Self::Aes192, Self::Aes256];

    /// Friendly name as used in settings files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aes128 => "aes128",
            Self::Aes192 => "aes192",
            Self::Aes256 => "aes256",
        }
    }

    /// Key length in bytes.
    pub fn key_len(&self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }

    pub(crate) fn algorithm_id(&self) -> u8 {
        match self {
            Self::Aes128 => 7,
            Self::Aes192 => 8,
            Self::Aes256 => 9,
        }
    }

    pub(crate) fn from_algorithm_id(id: u8) -> Option<Self> {
        match id {
            7 => Some(Self::Aes128),
            8 => Some(Self::Aes192),
            9 => Some(Self::Aes256),
            _ => None,
        }
    }
}

impl fmt::Display for SymmetricCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SymmetricCipher {
    type Err = SealpadError;

    fn from_str(value: &str) -> Result<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|cipher| cipher.as_str() == normalized)
            .ok_or_else(|| {
                SealpadError::invalid_config(format!(
                    "unsupported symmetric cipher \"{}\" (use aes128, aes192 or aes256)",
                    value
                ))
            })
    }
}

/// Compression applied to the plaintext before encryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[serde(alias = "uncompressed")]
    None,
    Zip,
    Zlib,
}

impl Compression {
    pub const ALL: [Compression; 3] = [Self::None, Self::Zip, Self::Zlib];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Zip => "zip",
            Self::Zlib => "zlib",
        }
    }

    pub(crate) fn algorithm_id(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Zip => 1,
            Self::Zlib => 2,
        }
    }

    pub(crate) fn from_algorithm_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::None),
            1 => Some(Self::Zip),
            2 => Some(Self::Zlib),
            _ => None,
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Compression {
    type Err = SealpadError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "uncompressed" => Ok(Self::None),
            "zip" => Ok(Self::Zip),
            "zlib" => Ok(Self::Zlib),
            _ => Err(SealpadError::invalid_config(format!(
                "unsupported compression \"{}\" (use none, zip or zlib)",
                value
            ))),
        }
    }
}

/// Work factor for passphrase-to-key derivation.
///
/// The iterated+salted S2K records its count in a single coded octet, so
/// only certain counts are representable. Construction rounds a requested
/// count up to the next representable one; the value held is always the
/// exact count an envelope will record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u32")]
pub struct KdfIterations(u32);

impl KdfIterations {
    /// Build from a requested count, rounding up to a representable count.
    ///
    /// Counts above 65,011,712 are rejected: the coded count octet cannot
    /// express anything larger.
    pub fn new(requested: u64) -> Result<Self> {
        if requested == 0 {
            return Err(SealpadError::invalid_config(
                "kdfIterationCount must be a positive integer",
            ));
        }
        if requested > u64::from(MAX_ITERATION_COUNT) {
            return Err(SealpadError::invalid_config(format!(
                "kdfIterationCount {} exceeds {}, the largest count the OpenPGP S2K format can record",
                requested, MAX_ITERATION_COUNT
            )));
        }
        let coded = encode_count(requested as u32);
        Ok(Self(decode_count(coded)))
    }

    pub(crate) fn from_coded(coded: u8) -> Self {
        Self(decode_count(coded))
    }

    pub(crate) fn coded(&self) -> u8 {
        encode_count(self.0)
    }

    /// Number of octets hashed by the key derivation.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for KdfIterations {
    fn default() -> Self {
        Self(DEFAULT_KDF_ITERATIONS)
    }
}

impl TryFrom<u64> for KdfIterations {
    type Error = SealpadError;

    fn try_from(value: u64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<KdfIterations> for u32 {
    fn from(value: KdfIterations) -> Self {
        value.0
    }
}

impl fmt::Display for KdfIterations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolved cryptographic parameters for one encrypt call.
///
/// Built fresh per call from current preferences; it has no identity
/// beyond that call and is never consulted on decrypt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassphraseConfig {
    pub symmetric_cipher: SymmetricCipher,
    pub aead_enabled: bool,
    pub compression: Compression,
    pub kdf_iterations: KdfIterations,
}

impl Default for PassphraseConfig {
    fn default() -> Self {
        Self {
            symmetric_cipher: SymmetricCipher::Aes256,
            aead_enabled: true,
            compression: Compression::Zlib,
            kdf_iterations: KdfIterations::default(),
        }
    }
}

impl PassphraseConfig {
    /// Canonical preference mapping for this configuration.
    ///
    /// Feeding the result back through [`resolve_config`] yields `self`.
    pub fn to_preferences(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            "symmetricCipher".to_string(),
            Value::from(self.symmetric_cipher.as_str()),
        );
        map.insert("aeadEnabled".to_string(), Value::from(self.aead_enabled));
        map.insert(
            "compression".to_string(),
            Value::from(self.compression.as_str()),
        );
        map.insert(
            "kdfIterationCount".to_string(),
            Value::from(self.kdf_iterations.get()),
        );
        map
    }

    /// Short status label, e.g. `AES256+AEAD/zlib`.
    pub fn label(&self) -> String {
        format_label(self.symmetric_cipher, self.aead_enabled, Some(self.compression))
    }
}

pub(crate) fn format_label(
    cipher: SymmetricCipher,
    aead: bool,
    compression: Option<Compression>,
) -> String {
    let mut label = cipher.as_str().to_ascii_uppercase();
    if aead {
        label.push_str("+AEAD");
    }
    if let Some(compression) = compression {
        label.push('/');
        label.push_str(compression.as_str());
    }
    label
}

/// Resolve a partial preference mapping into a complete configuration.
///
/// Recognised keys (with the aliases older settings files used):
///
/// | Field | Keys | Type |
/// |---|---|---|
/// | cipher | `symmetricCipher`, `symmetric_cipher`, `symmetric` | string |
/// | AEAD | `aeadEnabled`, `aead_enabled`, `aead` | bool |
/// | compression | `compression` | string |
/// | iterations | `kdfIterationCount`, `kdf_iteration_count`, `s2kIterationCount`, `s2k_iteration_count` | integer |
///
/// Missing or `null` values take the defaults (aes256, AEAD on, zlib,
/// 65536). Unrecognised keys are ignored. When a field is given under
/// several spellings, every non-null one is validated and they must agree.
///
/// # Errors
///
/// Returns [`SealpadError::InvalidConfiguration`] when a recognised key
/// holds a value of the wrong type, outside its enumerated set, or (for
/// the iteration count) non-positive, non-integral or above the maximum,
/// or when two spellings of the same field disagree.
///
/// # Examples
///
/// ```
/// use sealpad_core::config::{resolve_config, PassphraseConfig};
///
/// let prefs = serde_json::Map::new();
/// assert_eq!(resolve_config(&prefs).unwrap(), PassphraseConfig::default());
/// ```
pub fn resolve_config(prefs: &Map<String, Value>) -> Result<PassphraseConfig> {
    let defaults = PassphraseConfig::default();

    let symmetric_cipher = resolve_field(prefs, CIPHER_KEYS, |key, value| match value {
        Value::String(value) => value
            .parse::<SymmetricCipher>()
            .map_err(|e| prefix_key(key, e)),
        other => Err(wrong_type(key, "a string", other)),
    })?
    .unwrap_or(defaults.symmetric_cipher);

    let aead_enabled = resolve_field(prefs, AEAD_KEYS, |key, value| match value {
        Value::Bool(value) => Ok(*value),
        other => Err(wrong_type(key, "a boolean", other)),
    })?
    .unwrap_or(defaults.aead_enabled);

    let compression = resolve_field(prefs, COMPRESSION_KEYS, |key, value| match value {
        Value::String(value) => value
            .parse::<Compression>()
            .map_err(|e| prefix_key(key, e)),
        other => Err(wrong_type(key, "a string", other)),
    })?
    .unwrap_or(defaults.compression);

    let kdf_iterations = resolve_field(prefs, ITERATION_KEYS, |key, value| match value {
        Value::Number(number) => {
            let count = integral_count(number).ok_or_else(|| {
                SealpadError::invalid_config(format!(
                    "{}: {} is not a positive integer",
                    key, number
                ))
            })?;
            KdfIterations::new(count).map_err(|e| prefix_key(key, e))
        }
        other => Err(wrong_type(key, "an integer", other)),
    })?
    .unwrap_or(defaults.kdf_iterations);

    let config = PassphraseConfig {
        symmetric_cipher,
        aead_enabled,
        compression,
        kdf_iterations,
    };
    tracing::debug!(config = %config.label(), iterations = %config.kdf_iterations, "resolved passphrase config");
    Ok(config)
}

/// Resolve preferences given as a JSON object string.
pub fn resolve_config_json(json: &str) -> Result<PassphraseConfig> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| SealpadError::invalid_config(format!("preferences are not valid JSON: {}", e)))?;
    match value {
        Value::Object(map) => resolve_config(&map),
        _ => Err(SealpadError::invalid_config(
            "preferences must be a JSON object",
        )),
    }
}

/// Parse every non-null spelling of one field.
///
/// Each present alias must hold a valid value, and all of them must agree.
fn resolve_field<T, F>(
    prefs: &Map<String, Value>,
    keys: &[&'static str],
    parse: F,
) -> Result<Option<T>>
where
    T: PartialEq + fmt::Display,
    F: Fn(&'static str, &Value) -> Result<T>,
{
    let mut resolved: Option<(&'static str, T)> = None;
    for &key in keys {
        let Some(value) = prefs.get(key).filter(|value| !value.is_null()) else {
            continue;
        };
        let parsed = parse(key, value)?;
        if let Some((first, existing)) = &resolved {
            if *existing != parsed {
                return Err(SealpadError::invalid_config(format!(
                    "{} ({}) conflicts with {} ({})",
                    key, parsed, first, existing
                )));
            }
        } else {
            resolved = Some((key, parsed));
        }
    }
    Ok(resolved.map(|(_, value)| value))
}

fn integral_count(number: &serde_json::Number) -> Option<u64> {
    if let Some(value) = number.as_u64() {
        return (value > 0).then_some(value);
    }
    let value = number.as_f64()?;
    if value.is_finite() && value.fract() == 0.0 && value >= 1.0 && value <= u64::MAX as f64 {
        return Some(value as u64);
    }
    None
}

fn wrong_type(key: &str, expected: &str, value: &Value) -> SealpadError {
    SealpadError::invalid_config(format!("{}: expected {}, got {}", key, expected, value))
}

fn prefix_key(key: &str, err: SealpadError) -> SealpadError {
    match err {
        SealpadError::InvalidConfiguration(message) => {
            SealpadError::InvalidConfiguration(format!("{}: {}", key, message))
        }
        other => other,
    }
}
