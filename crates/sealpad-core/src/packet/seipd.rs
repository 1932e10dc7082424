//! Symmetrically Encrypted and Integrity Protected Data packets (tag 18).
//!
//! Version 2 encrypts the payload in fixed-size AEAD chunks followed by a
//! final tag over the total length. Version 1 is CFB over a random prefix,
//! the payload and a trailing SHA-1 modification detection code.

use sha1::{Digest, Sha1};

use crate::config::SymmetricCipher;
use crate::crypto::cipher::{cfb_decrypt, cfb_encrypt, gcm_open, gcm_seal, BLOCK_SIZE, GCM_TAG_LEN};
use crate::crypto::{fill_random, hkdf_sha256, KeyMaterial};
use crate::error::{Result, SealpadError};

use super::{cipher_from_id, AeadMode, Reader, Tag};

const VERSION_1: u8 = 1;
const VERSION_2: u8 = 2;

/// Chunk size octet written by this crate: 2^(12 + 6) = 256 KiB.
pub const CHUNK_SIZE_OCTET: u8 = 12;
const MAX_CHUNK_SIZE_OCTET: u8 = 16;

pub const SALT_LEN: usize = 32;

const MDC_HEADER: [u8; 2] = [0xD3, 0x14];
const MDC_LEN: usize = 22;
const PREFIX_LEN: usize = BLOCK_SIZE + 2;

pub fn chunk_size(octet: u8) -> usize {
    1usize << (u32::from(octet) + 6)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seipd {
    V1 {
        ciphertext: Vec<u8>,
    },
    V2 {
        cipher: SymmetricCipher,
        aead: AeadMode,
        chunk_size_octet: u8,
        salt: [u8; SALT_LEN],
        ciphertext: Vec<u8>,
    },
}

impl Seipd {
    pub fn version(&self) -> u8 {
        match self {
            Seipd::V1 { .. } => VERSION_1,
            Seipd::V2 { .. } => VERSION_2,
        }
    }

    /// Encrypt `payload` in AEAD chunks.
    pub fn seal_v2(cipher: SymmetricCipher, session_key: &KeyMaterial, payload: &[u8]) -> Result<Self> {
        let aead = AeadMode::Gcm;
        let mut salt = [0u8; SALT_LEN];
        fill_random(&mut salt)?;

        let ad = chunk_ad(cipher, aead, CHUNK_SIZE_OCTET);
        let (message_key, iv) = message_key(cipher, session_key, &salt, &ad)?;
        let key = &message_key.as_bytes()[..cipher.key_len()];

        let size = chunk_size(CHUNK_SIZE_OCTET);
        let chunks = payload.len().div_ceil(size);
        let mut ciphertext = Vec::with_capacity(payload.len() + (chunks + 1) * GCM_TAG_LEN);
        for (index, chunk) in payload.chunks(size).enumerate() {
            let nonce = chunk_nonce(iv, index as u64);
            ciphertext.extend(gcm_seal(cipher, key, &nonce, &ad, chunk)?);
        }

        let final_ad = final_ad(&ad, payload.len() as u64);
        let nonce = chunk_nonce(iv, chunks as u64);
        ciphertext.extend(gcm_seal(cipher, key, &nonce, &final_ad, &[])?);

        Ok(Seipd::V2 {
            cipher,
            aead,
            chunk_size_octet: CHUNK_SIZE_OCTET,
            salt,
            ciphertext,
        })
    }

    /// Encrypt `payload` with CFB and a trailing MDC.
    pub fn seal_v1(cipher: SymmetricCipher, session_key: &KeyMaterial, payload: &[u8]) -> Result<Self> {
        let mut data = Vec::with_capacity(PREFIX_LEN + payload.len() + MDC_LEN);
        data.resize(BLOCK_SIZE, 0);
        fill_random(&mut data)?;
        data.push(data[BLOCK_SIZE - 2]);
        data.push(data[BLOCK_SIZE - 1]);
        data.extend_from_slice(payload);
        data.extend_from_slice(&MDC_HEADER);
        let mdc = Sha1::digest(&data);
        data.extend_from_slice(&mdc);

        cfb_encrypt(cipher, session_key.as_bytes(), &mut data)?;
        Ok(Seipd::V1 { ciphertext: data })
    }

    pub fn to_body(&self) -> Vec<u8> {
        match self {
            Seipd::V1 { ciphertext } => {
                let mut body = Vec::with_capacity(1 + ciphertext.len());
                body.push(VERSION_1);
                body.extend_from_slice(ciphertext);
                body
            }
            Seipd::V2 {
                cipher,
                aead,
                chunk_size_octet,
                salt,
                ciphertext,
            } => {
                let mut body = Vec::with_capacity(4 + SALT_LEN + ciphertext.len());
                body.extend_from_slice(&[
                    VERSION_2,
                    cipher.algorithm_id(),
                    aead.algorithm_id(),
                    *chunk_size_octet,
                ]);
                body.extend_from_slice(salt);
                body.extend_from_slice(ciphertext);
                body
            }
        }
    }

    pub fn parse(body: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(body);
        match reader.u8()? {
            VERSION_1 => {
                let ciphertext = reader.rest().to_vec();
                if ciphertext.len() < PREFIX_LEN + MDC_LEN {
                    return Err(SealpadError::malformed("SEIPD v1 packet too short"));
                }
                Ok(Seipd::V1 { ciphertext })
            }
            VERSION_2 => {
                let cipher = cipher_from_id(reader.u8()?)?;
                let aead = AeadMode::from_algorithm_id(reader.u8()?)?;
                let chunk_size_octet = reader.u8()?;
                if chunk_size_octet > MAX_CHUNK_SIZE_OCTET {
                    return Err(SealpadError::malformed(format!(
                        "invalid chunk size octet {}",
                        chunk_size_octet
                    )));
                }
                let mut salt = [0u8; SALT_LEN];
                salt.copy_from_slice(reader.take(SALT_LEN)?);
                let ciphertext = reader.rest().to_vec();
                if ciphertext.len() < GCM_TAG_LEN {
                    return Err(SealpadError::malformed("SEIPD v2 packet missing final tag"));
                }
                Ok(Seipd::V2 {
                    cipher,
                    aead,
                    chunk_size_octet,
                    salt,
                    ciphertext,
                })
            }
            other => Err(SealpadError::malformed(format!(
                "unsupported SEIPD version {}",
                other
            ))),
        }
    }

    /// Decrypt and verify, returning the payload packets.
    ///
    /// `cipher` is used for v1 only; v2 names its own cipher. Nothing is
    /// returned unless every chunk and the final tag verify.
    pub fn open(&self, cipher: SymmetricCipher, session_key: &KeyMaterial) -> Result<Vec<u8>> {
        match self {
            Seipd::V1 { ciphertext } => open_v1(cipher, session_key, ciphertext),
            Seipd::V2 {
                cipher,
                aead,
                chunk_size_octet,
                salt,
                ciphertext,
            } => open_v2(*cipher, *aead, *chunk_size_octet, salt, session_key, ciphertext),
        }
    }
}

fn open_v1(cipher: SymmetricCipher, session_key: &KeyMaterial, ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.len() < PREFIX_LEN + MDC_LEN {
        return Err(SealpadError::malformed("SEIPD v1 packet too short"));
    }
    let mut data = ciphertext.to_vec();
    cfb_decrypt(cipher, session_key.as_bytes(), &mut data)?;

    if data[BLOCK_SIZE - 2..BLOCK_SIZE] != data[BLOCK_SIZE..PREFIX_LEN] {
        return Err(SealpadError::IntegrityCheckFailed);
    }

    let mdc_start = data.len() - MDC_LEN;
    let (protected, mdc) = data.split_at(mdc_start + MDC_HEADER.len());
    if protected[mdc_start..] != MDC_HEADER || Sha1::digest(protected).as_slice() != mdc {
        return Err(SealpadError::IntegrityCheckFailed);
    }

    Ok(data[PREFIX_LEN..mdc_start].to_vec())
}

fn open_v2(
    cipher: SymmetricCipher,
    aead: AeadMode,
    chunk_size_octet: u8,
    salt: &[u8; SALT_LEN],
    session_key: &KeyMaterial,
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    if session_key.len() != cipher.key_len() {
        return Err(SealpadError::malformed(
            "session key length does not match the data cipher",
        ));
    }

    let ad = chunk_ad(cipher, aead, chunk_size_octet);
    let (message_key, iv) = message_key(cipher, session_key, salt, &ad)?;
    let key = &message_key.as_bytes()[..cipher.key_len()];

    if ciphertext.len() < GCM_TAG_LEN {
        return Err(SealpadError::malformed("SEIPD v2 packet missing final tag"));
    }
    let (chunks, final_tag) = ciphertext.split_at(ciphertext.len() - GCM_TAG_LEN);
    let sealed_chunk = chunk_size(chunk_size_octet) + GCM_TAG_LEN;

    let mut plaintext = Vec::with_capacity(chunks.len());
    let mut count = 0u64;
    for (index, chunk) in chunks.chunks(sealed_chunk).enumerate() {
        let nonce = chunk_nonce(iv, index as u64);
        plaintext.extend(gcm_open(cipher, key, &nonce, &ad, chunk)?);
        count += 1;
    }

    let final_ad = final_ad(&ad, plaintext.len() as u64);
    gcm_open(cipher, key, &chunk_nonce(iv, count), &final_ad, final_tag)?;

    Ok(plaintext)
}

fn chunk_ad(cipher: SymmetricCipher, aead: AeadMode, chunk_size_octet: u8) -> [u8; 5] {
    [
        Tag::Seipd.header_octet(),
        VERSION_2,
        cipher.algorithm_id(),
        aead.algorithm_id(),
        chunk_size_octet,
    ]
}

fn final_ad(ad: &[u8; 5], total: u64) -> [u8; 13] {
    let mut out = [0u8; 13];
    out[..5].copy_from_slice(ad);
    out[5..].copy_from_slice(&total.to_be_bytes());
    out
}

/// HKDF output split as message key followed by the nonce IV.
fn message_key(
    cipher: SymmetricCipher,
    session_key: &KeyMaterial,
    salt: &[u8; SALT_LEN],
    info: &[u8],
) -> Result<(KeyMaterial, [u8; 4])> {
    let derived = hkdf_sha256(session_key.as_bytes(), Some(salt), info, cipher.key_len() + 4)?;
    let mut iv = [0u8; 4];
    iv.copy_from_slice(&derived.as_bytes()[cipher.key_len()..]);
    Ok((derived, iv))
}

fn chunk_nonce(iv: [u8; 4], index: u64) -> [u8; 12] {
    let mut nonce = [0u8; 12];
    nonce[..4].copy_from_slice(&iv);
    nonce[4..].copy_from_slice(&index.to_be_bytes());
    nonce
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::random_key;

    #[test]
    fn test_v2_multi_chunk_and_boundaries() {
        let key = random_key(32).unwrap();
        let size = chunk_size(CHUNK_SIZE_OCTET);
        for len in [1, size - 1, size, size + 1, 2 * size] {
            let payload: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
            let packet = Seipd::seal_v2(SymmetricCipher::Aes256, &key, &payload).unwrap();
            let parsed = Seipd::parse(&packet.to_body()).unwrap();
            let expected_chunks = len.div_ceil(size);
            if let Seipd::V2 { ciphertext, .. } = &parsed {
                assert_eq!(ciphertext.len(), len + (expected_chunks + 1) * GCM_TAG_LEN);
            }
            assert_eq!(parsed.open(SymmetricCipher::Aes256, &key).unwrap(), payload);
        }
    }

    #[test]
    fn test_v2_dropped_chunk_fails_final_tag() {
        let key = random_key(16).unwrap();
        let size = chunk_size(CHUNK_SIZE_OCTET);
        let payload = vec![7u8; 2 * size];
        let packet = Seipd::seal_v2(SymmetricCipher::Aes128, &key, &payload).unwrap();

        let Seipd::V2 {
            cipher,
            aead,
            chunk_size_octet,
            salt,
            ciphertext,
        } = packet
        else {
            panic!("expected v2");
        };
        // Remove the second chunk entirely; the first still verifies.
        let sealed = size + GCM_TAG_LEN;
        let mut truncated = ciphertext[..sealed].to_vec();
        truncated.extend_from_slice(&ciphertext[2 * sealed..]);
        let tampered = Seipd::V2 {
            cipher,
            aead,
            chunk_size_octet,
            salt,
            ciphertext: truncated,
        };
        assert!(matches!(
            tampered.open(cipher, &key),
            Err(SealpadError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_v2_flipped_bit_fails() {
        let key = random_key(24).unwrap();
        let packet = Seipd::seal_v2(SymmetricCipher::Aes192, &key, b"payload").unwrap();
        let mut body = packet.to_body();
        let last = body.len() - 20;
        body[last] ^= 0x01;
        assert!(matches!(
            Seipd::parse(&body).unwrap().open(SymmetricCipher::Aes192, &key),
            Err(SealpadError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_v1_round_trip_and_layout() {
        let key = random_key(16).unwrap();
        let packet = Seipd::seal_v1(SymmetricCipher::Aes128, &key, b"legacy").unwrap();
        let body = packet.to_body();
        assert_eq!(body[0], 1);
        assert_eq!(body.len(), 1 + PREFIX_LEN + 6 + MDC_LEN);
        let parsed = Seipd::parse(&body).unwrap();
        assert_eq!(parsed.open(SymmetricCipher::Aes128, &key).unwrap(), b"legacy");
    }

    #[test]
    fn test_v1_wrong_key_or_tamper_fails_integrity() {
        let key = random_key(32).unwrap();
        let packet = Seipd::seal_v1(SymmetricCipher::Aes256, &key, b"legacy text").unwrap();
        let wrong = random_key(32).unwrap();
        assert!(matches!(
            packet.open(SymmetricCipher::Aes256, &wrong),
            Err(SealpadError::IntegrityCheckFailed)
        ));

        let mut body = packet.to_body();
        body[PREFIX_LEN + 3] ^= 0x80;
        assert!(matches!(
            Seipd::parse(&body).unwrap().open(SymmetricCipher::Aes256, &key),
            Err(SealpadError::IntegrityCheckFailed)
        ));
    }

    #[test]
    fn test_parse_rejects_bad_headers() {
        assert!(Seipd::parse(&[3]).is_err());
        assert!(Seipd::parse(&[1, 0, 0]).is_err());
        let mut body = vec![2, 9, 3, 17];
        body.extend_from_slice(&[0u8; SALT_LEN + GCM_TAG_LEN]);
        assert!(Seipd::parse(&body).is_err());
        body[3] = 12;
        body[2] = 1;
        assert!(Seipd::parse(&body).is_err());
    }
}
