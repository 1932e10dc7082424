//! Symmetric-Key Encrypted Session Key packets (tag 3).
//!
//! Version 6 wraps a random session key with AES-GCM under a key derived
//! from the passphrase. Version 4 is written without an encrypted session
//! key, in which case the S2K output is the session key itself.

use zeroize::Zeroizing;

use crate::config::SymmetricCipher;
use crate::crypto::cipher::{cfb_decrypt, gcm_open, gcm_seal};
use crate::crypto::{fill_random, hkdf_sha256, KeyMaterial, S2k};
use crate::error::{Result, SealpadError};

use super::{cipher_from_id, AeadMode, Reader, Tag};

const VERSION_4: u8 = 4;
const VERSION_6: u8 = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skesk {
    V4 {
        cipher: SymmetricCipher,
        s2k: S2k,
        encrypted_key: Option<Vec<u8>>,
    },
    V6 {
        cipher: SymmetricCipher,
        aead: AeadMode,
        s2k: S2k,
        iv: Vec<u8>,
        encrypted_key: Vec<u8>,
    },
}

impl Skesk {
    /// Legacy packet whose S2K output is used directly as the session key.
    pub fn v4(cipher: SymmetricCipher, s2k: S2k) -> Self {
        Skesk::V4 {
            cipher,
            s2k,
            encrypted_key: None,
        }
    }

    /// Wrap `session_key` under a key derived from `passphrase`.
    pub fn v6(
        cipher: SymmetricCipher,
        s2k: S2k,
        passphrase: &str,
        session_key: &KeyMaterial,
    ) -> Result<Self> {
        let aead = AeadMode::Gcm;
        let info = kek_info(cipher, aead);
        let kek = derive_kek(&s2k, passphrase, cipher, &info)?;

        let mut iv = vec![0u8; aead.nonce_len()];
        fill_random(&mut iv)?;
        let encrypted_key = gcm_seal(cipher, kek.as_bytes(), &iv, &info, session_key.as_bytes())?;

        Ok(Skesk::V6 {
            cipher,
            aead,
            s2k,
            iv,
            encrypted_key,
        })
    }

    pub fn version(&self) -> u8 {
        match self {
            Skesk::V4 { .. } => VERSION_4,
            Skesk::V6 { .. } => VERSION_6,
        }
    }

    pub fn cipher(&self) -> SymmetricCipher {
        match self {
            Skesk::V4 { cipher, .. } | Skesk::V6 { cipher, .. } => *cipher,
        }
    }

    pub fn s2k(&self) -> &S2k {
        match self {
            Skesk::V4 { s2k, .. } | Skesk::V6 { s2k, .. } => s2k,
        }
    }

    pub fn to_body(&self) -> Vec<u8> {
        match self {
            Skesk::V4 {
                cipher,
                s2k,
                encrypted_key,
            } => {
                let mut body = vec![VERSION_4, cipher.algorithm_id()];
                body.extend(s2k.to_bytes());
                if let Some(key) = encrypted_key {
                    body.extend_from_slice(key);
                }
                body
            }
            Skesk::V6 {
                cipher,
                aead,
                s2k,
                iv,
                encrypted_key,
            } => {
                let s2k_bytes = s2k.to_bytes();
                let field_len = 3 + s2k_bytes.len() + iv.len();
                let mut body = vec![
                    VERSION_6,
                    field_len as u8,
                    cipher.algorithm_id(),
                    aead.algorithm_id(),
                    s2k_bytes.len() as u8,
                ];
                body.extend(s2k_bytes);
                body.extend_from_slice(iv);
                body.extend_from_slice(encrypted_key);
                body
            }
        }
    }

    pub fn parse(body: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(body);
        match reader.u8()? {
            VERSION_4 => {
                let cipher = cipher_from_id(reader.u8()?)?;
                let rest = reader.rest();
                let (s2k, consumed) = S2k::parse(rest)?;
                let encrypted_key = match &rest[consumed..] {
                    [] => None,
                    key => Some(key.to_vec()),
                };
                Ok(Skesk::V4 {
                    cipher,
                    s2k,
                    encrypted_key,
                })
            }
            VERSION_6 => {
                let field_len = usize::from(reader.u8()?);
                let mut fields = Reader::new(reader.take(field_len)?);
                let cipher = cipher_from_id(fields.u8()?)?;
                let aead = AeadMode::from_algorithm_id(fields.u8()?)?;
                let s2k_len = usize::from(fields.u8()?);
                let (s2k, consumed) = S2k::parse(fields.take(s2k_len)?)?;
                if consumed != s2k_len {
                    return Err(SealpadError::malformed("S2K length field mismatch"));
                }
                let iv = fields.take(aead.nonce_len())?.to_vec();
                if !fields.is_empty() {
                    return Err(SealpadError::malformed("unexpected data in SKESK fields"));
                }
                let encrypted_key = reader.rest().to_vec();
                if encrypted_key.is_empty() {
                    return Err(SealpadError::malformed("SKESK v6 has no encrypted session key"));
                }
                Ok(Skesk::V6 {
                    cipher,
                    aead,
                    s2k,
                    iv,
                    encrypted_key,
                })
            }
            other => Err(SealpadError::malformed(format!(
                "unsupported SKESK version {}",
                other
            ))),
        }
    }

    /// Recover the session key and the cipher it belongs to.
    ///
    /// For v6 a wrong passphrase is [`SealpadError::AuthenticationFailed`].
    /// For v4 it cannot be detected here and surfaces when the data packet
    /// fails its integrity check.
    pub fn session_key(&self, passphrase: &str) -> Result<(SymmetricCipher, KeyMaterial)> {
        match self {
            Skesk::V4 {
                cipher,
                s2k,
                encrypted_key: None,
            } => Ok((*cipher, s2k.derive_key(passphrase, cipher.key_len())?)),
            Skesk::V4 {
                cipher,
                s2k,
                encrypted_key: Some(encrypted),
            } => {
                let kek = s2k.derive_key(passphrase, cipher.key_len())?;
                let mut decrypted = Zeroizing::new(encrypted.clone());
                cfb_decrypt(*cipher, kek.as_bytes(), &mut decrypted)?;
                let (&algorithm, key) = decrypted
                    .split_first()
                    .ok_or_else(|| SealpadError::malformed("empty encrypted session key"))?;
                // A wrong passphrase garbles the algorithm octet or the length.
                let session_cipher = SymmetricCipher::from_algorithm_id(algorithm)
                    .filter(|c| c.key_len() == key.len())
                    .ok_or(SealpadError::IntegrityCheckFailed)?;
                Ok((session_cipher, KeyMaterial::from_vec(key.to_vec())))
            }
            Skesk::V6 {
                cipher,
                aead,
                s2k,
                iv,
                encrypted_key,
            } => {
                let info = kek_info(*cipher, *aead);
                let kek = derive_kek(s2k, passphrase, *cipher, &info)?;
                let key = gcm_open(*cipher, kek.as_bytes(), iv, &info, encrypted_key)?;
                Ok((*cipher, KeyMaterial::from_vec(key)))
            }
        }
    }
}

fn kek_info(cipher: SymmetricCipher, aead: AeadMode) -> [u8; 4] {
    [
        Tag::Skesk.header_octet(),
        VERSION_6,
        cipher.algorithm_id(),
        aead.algorithm_id(),
    ]
}

fn derive_kek(
    s2k: &S2k,
    passphrase: &str,
    cipher: SymmetricCipher,
    info: &[u8],
) -> Result<KeyMaterial> {
    let s2k_key = s2k.derive_key(passphrase, cipher.key_len())?;
    hkdf_sha256(s2k_key.as_bytes(), None, info, cipher.key_len())
}
