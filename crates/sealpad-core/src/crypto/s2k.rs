//! String-to-key (S2K) passphrase derivation.
//!
//! Implements the OpenPGP S2K specifiers: simple, salted, and
//! iterated+salted. Envelopes are always written with iterated+salted
//! SHA-256 and a fresh 8-byte salt; the other forms are accepted when
//! reading.
//!
//! The iteration count is the number of octets fed to the hash (salt and
//! passphrase repeated), stored as a one-octet coded value:
//! `count = (16 + (c & 15)) << ((c >> 4) + 6)`.

use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

use crate::config::KdfIterations;
use crate::error::{Result, SealpadError};

use super::key::{fill_random, KeyMaterial};

/// Smallest count the coded octet can express (`c = 0`).
pub const MIN_ITERATION_COUNT: u32 = 1024;

/// Largest count the coded octet can express (`c = 255`).
pub const MAX_ITERATION_COUNT: u32 = 65_011_712;

const SALT_LEN: usize = 8;

const S2K_SIMPLE: u8 = 0;
const S2K_SALTED: u8 = 1;
const S2K_ITERATED: u8 = 3;

/// Decode a coded count octet.
pub fn decode_count(coded: u8) -> u32 {
    (16 + u32::from(coded & 15)) << ((coded >> 4) + 6)
}

/// Smallest coded octet whose count is at least `requested`.
///
/// Saturates at 255 for requests above [`MAX_ITERATION_COUNT`].
pub fn encode_count(requested: u32) -> u8 {
    (0..=u8::MAX)
        .find(|coded| decode_count(*coded) >= requested)
        .unwrap_or(u8::MAX)
}

/// Hash algorithm used by the S2K function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha1,
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    pub(crate) fn algorithm_id(&self) -> u8 {
        match self {
            Self::Sha1 => 2,
            Self::Sha256 => 8,
            Self::Sha512 => 10,
        }
    }

    pub(crate) fn from_algorithm_id(id: u8) -> Option<Self> {
        match id {
            2 => Some(Self::Sha1),
            8 => Some(Self::Sha256),
            10 => Some(Self::Sha512),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }
}

/// A parsed or freshly generated S2K specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum S2k {
    Simple {
        hash: HashAlgorithm,
    },
    Salted {
        hash: HashAlgorithm,
        salt: [u8; SALT_LEN],
    },
    Iterated {
        hash: HashAlgorithm,
        salt: [u8; SALT_LEN],
        count: KdfIterations,
    },
}

impl S2k {
    /// Iterated+salted SHA-256 with a fresh random salt.
    pub fn iterated(count: KdfIterations) -> Result<Self> {
        let mut salt = [0u8; SALT_LEN];
        fill_random(&mut salt)?;
        Ok(S2k::Iterated {
            hash: HashAlgorithm::Sha256,
            salt,
            count,
        })
    }

    pub fn hash(&self) -> HashAlgorithm {
        match self {
            S2k::Simple { hash } | S2k::Salted { hash, .. } | S2k::Iterated { hash, .. } => *hash,
        }
    }

    pub fn salt(&self) -> Option<&[u8; SALT_LEN]> {
        match self {
            S2k::Simple { .. } => None,
            S2k::Salted { salt, .. } | S2k::Iterated { salt, .. } => Some(salt),
        }
    }

    /// Effective iteration count (octets hashed), if iterated.
    pub fn count(&self) -> Option<KdfIterations> {
        match self {
            S2k::Iterated { count, .. } => Some(*count),
            _ => None,
        }
    }

    /// Serialize the specifier.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            S2k::Simple { hash } => vec![S2K_SIMPLE, hash.algorithm_id()],
            S2k::Salted { hash, salt } => {
                let mut out = vec![S2K_SALTED, hash.algorithm_id()];
                out.extend_from_slice(salt);
                out
            }
            S2k::Iterated { hash, salt, count } => {
                let mut out = vec![S2K_ITERATED, hash.algorithm_id()];
                out.extend_from_slice(salt);
                out.push(count.coded());
                out
            }
        }
    }

    /// Parse a specifier from the front of `input`.
    ///
    /// Returns the specifier and the number of bytes consumed.
    pub fn parse(input: &[u8]) -> Result<(Self, usize)> {
        let kind = *input
            .first()
            .ok_or_else(|| SealpadError::malformed("S2K specifier is empty"))?;
        let hash_id = *input
            .get(1)
            .ok_or_else(|| SealpadError::malformed("S2K specifier truncated"))?;
        let hash = HashAlgorithm::from_algorithm_id(hash_id).ok_or_else(|| {
            SealpadError::malformed(format!("unsupported S2K hash algorithm {}", hash_id))
        })?;

        let salt = |input: &[u8]| -> Result<[u8; SALT_LEN]> {
            input
                .get(2..2 + SALT_LEN)
                .and_then(|bytes| bytes.try_into().ok())
                .ok_or_else(|| SealpadError::malformed("S2K salt truncated"))
        };

        match kind {
            S2K_SIMPLE => Ok((S2k::Simple { hash }, 2)),
            S2K_SALTED => Ok((
                S2k::Salted {
                    hash,
                    salt: salt(input)?,
                },
                2 + SALT_LEN,
            )),
            S2K_ITERATED => {
                let salt = salt(input)?;
                let coded = *input
                    .get(2 + SALT_LEN)
                    .ok_or_else(|| SealpadError::malformed("S2K count truncated"))?;
                Ok((
                    S2k::Iterated {
                        hash,
                        salt,
                        count: KdfIterations::from_coded(coded),
                    },
                    3 + SALT_LEN,
                ))
            }
            other => Err(SealpadError::malformed(format!(
                "unsupported S2K type {}",
                other
            ))),
        }
    }

    /// Derive `key_len` bytes of key material from `passphrase`.
    ///
    /// Deterministic: the same specifier and passphrase always give the
    /// same key. Cost grows linearly with the iteration count.
    pub fn derive_key(&self, passphrase: &str, key_len: usize) -> Result<KeyMaterial> {
        if passphrase.is_empty() {
            return Err(SealpadError::EmptyPassphrase);
        }
        let key = match self.hash() {
            HashAlgorithm::Sha1 => self.derive_with::<Sha1>(passphrase.as_bytes(), key_len),
            HashAlgorithm::Sha256 => self.derive_with::<Sha256>(passphrase.as_bytes(), key_len),
            HashAlgorithm::Sha512 => self.derive_with::<Sha512>(passphrase.as_bytes(), key_len),
        };
        Ok(key)
    }

    fn derive_with<D: Digest>(&self, passphrase: &[u8], key_len: usize) -> KeyMaterial {
        let mut seed = Vec::with_capacity(SALT_LEN + passphrase.len());
        if let Some(salt) = self.salt() {
            seed.extend_from_slice(salt);
        }
        seed.extend_from_slice(passphrase);
        let seed = zeroize::Zeroizing::new(seed);

        // Octets to feed per context; never less than one full copy of the seed.
        let total = match self {
            S2k::Iterated { count, .. } => (count.get() as usize).max(seed.len()),
            _ => seed.len(),
        };

        let mut output = Vec::with_capacity(key_len + 64);
        let mut preload = 0usize;
        while output.len() < key_len {
            let mut hasher = D::new();
            hasher.update(vec![0u8; preload]);
            let mut remaining = total;
            while remaining >= seed.len() {
                hasher.update(&seed[..]);
                remaining -= seed.len();
            }
            hasher.update(&seed[..remaining]);
            output.extend_from_slice(&hasher.finalize());
            preload += 1;
        }
        output.truncate(key_len);
        KeyMaterial::from_vec(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALT: [u8; 8] = [0xa8, 0x42, 0x8f, 0x3a, 0x0e, 0x6e, 0x1c, 0x31];

    fn iterated(hash: HashAlgorithm) -> S2k {
        S2k::Iterated {
            hash,
            salt: SALT,
            count: KdfIterations::default(),
        }
    }

    #[test]
    fn test_coded_count_bounds() {
        assert_eq!(decode_count(0), MIN_ITERATION_COUNT);
        assert_eq!(decode_count(255), MAX_ITERATION_COUNT);
        assert_eq!(decode_count(0x60), 65536);
        assert_eq!(encode_count(65536), 0x60);
        assert_eq!(encode_count(65537), 0x61);
        assert_eq!(decode_count(0x61), 69632);
        assert_eq!(encode_count(1), 0);
    }

    #[test]
    fn test_coded_count_is_monotonic() {
        for coded in 0..u8::MAX {
            assert!(decode_count(coded) < decode_count(coded + 1));
        }
    }

    #[test]
    fn test_iterated_sha256_known_vector() {
        let key = iterated(HashAlgorithm::Sha256)
            .derive_key("correct-horse", 32)
            .unwrap();
        assert_eq!(
            hex::encode(key.as_bytes()),
            "e70ef4529e934067a7afde96b5a945c81ebd9fbb0d6ba76f7250d761831577c9"
        );
    }

    #[test]
    fn test_short_key_is_prefix() {
        let key = iterated(HashAlgorithm::Sha256)
            .derive_key("correct-horse", 16)
            .unwrap();
        assert_eq!(hex::encode(key.as_bytes()), "e70ef4529e934067a7afde96b5a945c8");
    }

    #[test]
    fn test_multiple_hash_contexts() {
        // SHA-1 yields 20 bytes, so a 32-byte key needs a second preloaded context.
        let key = iterated(HashAlgorithm::Sha1)
            .derive_key("correct-horse", 32)
            .unwrap();
        assert_eq!(
            hex::encode(key.as_bytes()),
            "2e59aa047b1c1b65eecb88da7c04b0c3bb4c45451d85451e199f0643ad3bbe50"
        );
    }

    #[test]
    fn test_salted_and_simple_vectors() {
        let salted = S2k::Salted {
            hash: HashAlgorithm::Sha256,
            salt: SALT,
        };
        assert_eq!(
            hex::encode(salted.derive_key("hello", 32).unwrap().as_bytes()),
            "2f184c1392bbd25bff51528dc3023ab89141c666bd5d00a93c9a83d55b716cdf"
        );

        let simple = S2k::Simple {
            hash: HashAlgorithm::Sha256,
        };
        assert_eq!(
            hex::encode(simple.derive_key("hello", 32).unwrap().as_bytes()),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_fresh_salts_differ() {
        let a = S2k::iterated(KdfIterations::default()).unwrap();
        let b = S2k::iterated(KdfIterations::default()).unwrap();
        assert_ne!(a.salt(), b.salt());
    }

    #[test]
    fn test_specifier_parse_matches_serialized() {
        let s2k = iterated(HashAlgorithm::Sha256);
        let mut bytes = s2k.to_bytes();
        bytes.push(0xff); // trailing data belongs to the caller
        let (parsed, consumed) = S2k::parse(&bytes).unwrap();
        assert_eq!(parsed, s2k);
        assert_eq!(consumed, 11);
    }

    #[test]
    fn test_parse_rejects_unknown_type_and_truncation() {
        assert!(S2k::parse(&[]).is_err());
        assert!(S2k::parse(&[101, 8]).is_err());
        assert!(S2k::parse(&[3, 8, 1, 2, 3]).is_err());
        assert!(S2k::parse(&[3, 99]).is_err());
    }

    #[test]
    fn test_empty_passphrase_rejected() {
        let result = iterated(HashAlgorithm::Sha256).derive_key("", 32);
        assert!(matches!(result, Err(SealpadError::EmptyPassphrase)));
    }
}
