//! The envelope codec: passphrase-protected text in, armored OpenPGP
//! message out, and back.
//!
//! Encryption runs compress → derive → encrypt → serialize; decryption
//! runs parse → derive (with the envelope's own salt and count) →
//! decrypt and authenticate → decompress → decode. Every call is
//! independent and either returns the complete result or an error.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::armor;
use crate::config::{format_label, Compression, KdfIterations, PassphraseConfig, SymmetricCipher};
use crate::crypto::{random_key, validate_passphrase, S2k};
use crate::error::{Result, SealpadError};
use crate::packet::seipd::{chunk_size, Seipd};
use crate::packet::skesk::Skesk;
use crate::packet::{parse_packets, payload, write_packet, Tag};

/// Parameters an envelope records about itself.
///
/// [`inspect`] fills everything visible without a passphrase; the
/// compression algorithm and creation time live inside the encrypted
/// payload and are only known after [`decrypt_with_info`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvelopeInfo {
    pub symmetric_cipher: SymmetricCipher,
    pub aead_enabled: bool,
    pub aead_mode: Option<String>,
    pub compression: Option<Compression>,
    pub s2k_hash: String,
    pub s2k_salt: Option<String>,
    pub kdf_iterations: Option<KdfIterations>,
    pub chunk_size: Option<usize>,
    pub skesk_version: u8,
    pub seipd_version: u8,
    pub created_at: Option<DateTime<Utc>>,
}

impl EnvelopeInfo {
    /// Short status label, e.g. `AES256+AEAD/zlib`.
    pub fn label(&self) -> String {
        format_label(self.symmetric_cipher, self.aead_enabled, self.compression)
    }
}

/// Plaintext together with the parameters of the envelope it came from.
#[derive(Debug, Clone)]
pub struct Decrypted {
    pub plaintext: String,
    pub info: EnvelopeInfo,
}

/// Encrypt `plaintext` into an armored envelope.
///
/// The output is never identical across calls: salts, the session key and
/// nonces are fresh every time.
///
/// # Errors
///
/// - [`SealpadError::EmptyPassphrase`] when `passphrase` is empty
/// - [`SealpadError::Crypto`] when the OS RNG is unavailable
///
/// # Examples
///
/// ```
/// use sealpad_core::{decrypt, encrypt, PassphraseConfig};
///
/// let config = PassphraseConfig::default();
/// let armored = encrypt("hello world", "correct-horse", &config).unwrap();
/// assert!(armored.starts_with("-----BEGIN PGP MESSAGE-----"));
/// assert_eq!(decrypt(&armored, "correct-horse").unwrap(), "hello world");
/// ```
pub fn encrypt(plaintext: &str, passphrase: &str, config: &PassphraseConfig) -> Result<String> {
    validate_passphrase(passphrase)?;

    let cipher = config.symmetric_cipher;
    let payload = payload::build(plaintext.as_bytes(), config.compression, Utc::now())?;
    let s2k = S2k::iterated(config.kdf_iterations)?;

    let (skesk, seipd) = if config.aead_enabled {
        let session_key = random_key(cipher.key_len())?;
        let skesk = Skesk::v6(cipher, s2k, passphrase, &session_key)?;
        (skesk, Seipd::seal_v2(cipher, &session_key, &payload)?)
    } else {
        let session_key = s2k.derive_key(passphrase, cipher.key_len())?;
        (Skesk::v4(cipher, s2k), Seipd::seal_v1(cipher, &session_key, &payload)?)
    };

    let mut binary = Vec::with_capacity(payload.len() + 256);
    write_packet(&mut binary, Tag::Skesk, &skesk.to_body());
    write_packet(&mut binary, Tag::Seipd, &seipd.to_body());

    debug!(
        cipher = %cipher,
        aead = config.aead_enabled,
        compression = %config.compression,
        iterations = config.kdf_iterations.get(),
        plaintext_bytes = plaintext.len(),
        envelope_bytes = binary.len(),
        "Encrypted envelope"
    );

    Ok(armor::encode(&binary))
}

/// Decrypt an armored envelope.
///
/// All parameters come from the envelope itself; no configuration is
/// consulted.
///
/// # Errors
///
/// - [`SealpadError::EmptyPassphrase`] when `passphrase` is empty, checked
///   before the input is looked at
/// - [`SealpadError::MalformedEnvelope`] for bad armor or packet structure
/// - [`SealpadError::AuthenticationFailed`] (AEAD) or
///   [`SealpadError::IntegrityCheckFailed`] (legacy) for a wrong passphrase
///   or a modified envelope
/// - [`SealpadError::DecompressionFailed`] / [`SealpadError::EncodingError`]
///   when the authenticated payload cannot be turned back into text
pub fn decrypt(armored: &str, passphrase: &str) -> Result<String> {
    decrypt_with_info(armored, passphrase).map(|decrypted| decrypted.plaintext)
}

/// Decrypt and also report the envelope's parameters.
pub fn decrypt_with_info(armored: &str, passphrase: &str) -> Result<Decrypted> {
    validate_passphrase(passphrase)?;

    let envelope = Envelope::parse(armored)?;
    let (session_cipher, packets) = envelope.open(passphrase)?;
    let payload = payload::open(&packets)?;
    let plaintext = String::from_utf8(payload.data)
        .map_err(|e| SealpadError::EncodingError(e.utf8_error().to_string()))?;

    let mut info = envelope.info();
    info.symmetric_cipher = session_cipher;
    info.compression = Some(payload.compression);
    info.created_at = payload.created_at;

    debug!(
        label = %info.label(),
        plaintext_bytes = plaintext.len(),
        "Decrypted envelope"
    );

    Ok(Decrypted { plaintext, info })
}

/// Report the parameters of an envelope without decrypting it.
pub fn inspect(armored: &str) -> Result<EnvelopeInfo> {
    Ok(Envelope::parse(armored)?.info())
}

/// True when `text` is a structurally valid envelope.
///
/// Documents are treated as encrypted purely on this basis.
pub fn is_envelope(text: &str) -> bool {
    Envelope::parse(text).is_ok()
}

/// Parsed packet structure of an envelope.
struct Envelope {
    /// Session key packets compatible with the data packet, in order.
    skesks: Vec<Skesk>,
    seipd: Seipd,
}

impl Envelope {
    fn parse(armored: &str) -> Result<Self> {
        let binary = armor::decode(armored)?;

        let mut skesks = Vec::new();
        let mut seipd = None;
        for packet in parse_packets(&binary)? {
            match packet.tag {
                Tag::Skesk => skesks.push(Skesk::parse(&packet.body)?),
                Tag::Seipd if seipd.is_some() => {
                    return Err(SealpadError::malformed("more than one encrypted data packet"));
                }
                Tag::Seipd => seipd = Some(Seipd::parse(&packet.body)?),
                Tag::Marker => continue,
                other => debug!(tag = ?other, "Skipping packet outside the encryption layer"),
            }
        }

        let seipd = seipd.ok_or_else(|| SealpadError::malformed("no encrypted data packet"))?;
        let expected = match seipd {
            Seipd::V1 { .. } => 4,
            Seipd::V2 { .. } => 6,
        };
        skesks.retain(|skesk| skesk.version() == expected);
        if skesks.is_empty() {
            return Err(SealpadError::malformed(format!(
                "no version {} session key packet for SEIPD v{}",
                expected,
                seipd.version()
            )));
        }

        Ok(Self { skesks, seipd })
    }

    /// Try each session key packet in turn; the first that yields an
    /// authentic payload wins.
    fn open(&self, passphrase: &str) -> Result<(SymmetricCipher, Vec<u8>)> {
        let mut last_error = SealpadError::malformed("no session key packet");
        for skesk in &self.skesks {
            let attempt = skesk.session_key(passphrase).and_then(|(cipher, key)| {
                let cipher = match &self.seipd {
                    Seipd::V2 { cipher, .. } => *cipher,
                    Seipd::V1 { .. } => cipher,
                };
                if key.len() != cipher.key_len() {
                    return Err(SealpadError::malformed(
                        "session key length does not match the data cipher",
                    ));
                }
                Ok((cipher, self.seipd.open(cipher, &key)?))
            });
            match attempt {
                Ok(opened) => return Ok(opened),
                Err(err) if err.is_wrong_passphrase() => last_error = err,
                Err(err) => return Err(err),
            }
        }
        Err(last_error)
    }

    fn info(&self) -> EnvelopeInfo {
        // `parse` guarantees at least one session key packet.
        let skesk = &self.skesks[0];
        let s2k = skesk.s2k();
        let (symmetric_cipher, aead_mode, chunk) = match &self.seipd {
            Seipd::V2 {
                cipher,
                aead,
                chunk_size_octet,
                ..
            } => (
                *cipher,
                Some(aead.as_str().to_string()),
                Some(chunk_size(*chunk_size_octet)),
            ),
            Seipd::V1 { .. } => (skesk.cipher(), None, None),
        };

        EnvelopeInfo {
            symmetric_cipher,
            aead_enabled: aead_mode.is_some(),
            aead_mode,
            compression: None,
            s2k_hash: s2k.hash().as_str().to_string(),
            s2k_salt: s2k
                .salt()
                .map(|salt| salt.iter().map(|b| format!("{:02x}", b)).collect()),
            kdf_iterations: s2k.count(),
            chunk_size: chunk,
            skesk_version: skesk.version(),
            seipd_version: self.seipd.version(),
            created_at: None,
        }
    }
}
