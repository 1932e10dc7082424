//! Key material handling.
//!
//! Session keys, S2K outputs and HKDF outputs all live in [`KeyMaterial`],
//! which zeroizes its buffer on drop and never prints its contents.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{Result, SealpadError};

/// Secret key bytes, zeroized on drop.
#[derive(Clone)]
pub struct KeyMaterial {
    key: Zeroizing<Vec<u8>>,
}

impl KeyMaterial {
    /// Wrap raw bytes. The caller hands over ownership of the buffer.
    pub(crate) fn from_vec(bytes: Vec<u8>) -> Self {
        Self {
            key: Zeroizing::new(bytes),
        }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate
    /// encryption operations.
    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("len", &self.key.len())
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Fill `buf` from the OS random number generator.
pub fn fill_random(buf: &mut [u8]) -> Result<()> {
    getrandom::getrandom(buf)
        .map_err(|e| SealpadError::Crypto(format!("Failed to generate random bytes: {}", e)))
}

/// Generate a random key of `len` bytes.
pub fn random_key(len: usize) -> Result<KeyMaterial> {
    let mut key = KeyMaterial::from_vec(vec![0u8; len]);
    fill_random(&mut key.key)?;
    Ok(key)
}

/// HKDF-SHA256 extract-and-expand into `len` bytes.
pub fn hkdf_sha256(
    ikm: &[u8],
    salt: Option<&[u8]>,
    info: &[u8],
    len: usize,
) -> Result<KeyMaterial> {
    let hk = Hkdf::<Sha256>::new(salt, ikm);
    let mut okm = vec![0u8; len];
    hk.expand(info, &mut okm)
        .map_err(|e| SealpadError::Crypto(format!("Key expansion failed: {}", e)))?;
    Ok(KeyMaterial::from_vec(okm))
}
