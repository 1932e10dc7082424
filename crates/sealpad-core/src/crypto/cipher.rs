//! Block cipher modes used by the envelope framings.
//!
//! AEAD framing uses AES-GCM (12-byte nonce, 16-byte tag). The legacy
//! framing uses AES in full-block CFB mode with an all-zero IV; the random
//! prefix inside the encrypted data plays the role of the IV.

use aes::cipher::{AsyncStreamCipher, KeyIvInit};
use aes::{Aes128, Aes192, Aes256};
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, KeyInit, Nonce, Payload};
use aes_gcm::AesGcm;

use crate::config::SymmetricCipher;
use crate::error::{Result, SealpadError};

/// AES block size, identical for every key length.
pub const BLOCK_SIZE: usize = 16;

/// GCM nonce length.
pub const GCM_NONCE_LEN: usize = 12;

/// GCM authentication tag length.
pub const GCM_TAG_LEN: usize = 16;

type Aes128Gcm = AesGcm<Aes128, U12>;
type Aes192Gcm = AesGcm<Aes192, U12>;
type Aes256Gcm = AesGcm<Aes256, U12>;

/// Encrypt and authenticate `plaintext`. Output is ciphertext ‖ tag.
pub fn gcm_seal(
    cipher: SymmetricCipher,
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    match cipher {
        SymmetricCipher::Aes128 => seal_with::<Aes128Gcm>(key, nonce, aad, plaintext),
        SymmetricCipher::Aes192 => seal_with::<Aes192Gcm>(key, nonce, aad, plaintext),
        SymmetricCipher::Aes256 => seal_with::<Aes256Gcm>(key, nonce, aad, plaintext),
    }
}

/// Verify and decrypt ciphertext ‖ tag.
///
/// Any tag mismatch is [`SealpadError::AuthenticationFailed`]; no bytes are
/// released for a chunk that fails verification.
pub fn gcm_open(
    cipher: SymmetricCipher,
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    match cipher {
        SymmetricCipher::Aes128 => open_with::<Aes128Gcm>(key, nonce, aad, ciphertext),
        SymmetricCipher::Aes192 => open_with::<Aes192Gcm>(key, nonce, aad, ciphertext),
        SymmetricCipher::Aes256 => open_with::<Aes256Gcm>(key, nonce, aad, ciphertext),
    }
}

fn gcm_instance<C: KeyInit>(key: &[u8], nonce: &[u8]) -> Result<C> {
    if nonce.len() != GCM_NONCE_LEN {
        return Err(SealpadError::Crypto(format!(
            "GCM nonce must be {} bytes, got {}",
            GCM_NONCE_LEN,
            nonce.len()
        )));
    }
    C::new_from_slice(key).map_err(|_| {
        SealpadError::Crypto(format!("Invalid key length {} for GCM", key.len()))
    })
}

fn seal_with<C: Aead + KeyInit>(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    let aead = gcm_instance::<C>(key, nonce)?;
    aead.encrypt(
        Nonce::<C>::from_slice(nonce),
        Payload {
            msg: plaintext,
            aad,
        },
    )
    .map_err(|_| SealpadError::Crypto("GCM encryption failed".to_string()))
}

fn open_with<C: Aead + KeyInit>(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    let aead = gcm_instance::<C>(key, nonce)?;
    aead.decrypt(
        Nonce::<C>::from_slice(nonce),
        Payload {
            msg: ciphertext,
            aad,
        },
    )
    .map_err(|_| SealpadError::AuthenticationFailed)
}

/// Encrypt `buf` in place with CFB and a zero IV.
pub fn cfb_encrypt(cipher: SymmetricCipher, key: &[u8], buf: &mut [u8]) -> Result<()> {
    let iv = [0u8; BLOCK_SIZE];
    match cipher {
        SymmetricCipher::Aes128 => cfb_mode::Encryptor::<Aes128>::new_from_slices(key, &iv)
            .map_err(cfb_key_error)?
            .encrypt(buf),
        SymmetricCipher::Aes192 => cfb_mode::Encryptor::<Aes192>::new_from_slices(key, &iv)
            .map_err(cfb_key_error)?
            .encrypt(buf),
        SymmetricCipher::Aes256 => cfb_mode::Encryptor::<Aes256>::new_from_slices(key, &iv)
            .map_err(cfb_key_error)?
            .encrypt(buf),
    }
    Ok(())
}

/// Decrypt `buf` in place with CFB and a zero IV.
pub fn cfb_decrypt(cipher: SymmetricCipher, key: &[u8], buf: &mut [u8]) -> Result<()> {
    let iv = [0u8; BLOCK_SIZE];
    match cipher {
        SymmetricCipher::Aes128 => cfb_mode::Decryptor::<Aes128>::new_from_slices(key, &iv)
            .map_err(cfb_key_error)?
            .decrypt(buf),
        SymmetricCipher::Aes192 => cfb_mode::Decryptor::<Aes192>::new_from_slices(key, &iv)
            .map_err(cfb_key_error)?
            .decrypt(buf),
        SymmetricCipher::Aes256 => cfb_mode::Decryptor::<Aes256>::new_from_slices(key, &iv)
            .map_err(cfb_key_error)?
            .decrypt(buf),
    }
    Ok(())
}

fn cfb_key_error(_: aes::cipher::InvalidLength) -> SealpadError {
    SealpadError::Crypto("Invalid key length for CFB".to_string())
}
