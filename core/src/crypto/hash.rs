//! # Hashing Utilities
//!
//! The hash functions the two ecosystems lean on, and nothing else:
//!
//! - **Keccak-256**: Ethereum's message hash. This is the *original* Keccak
//!   submission with the `0x01` padding byte, not FIPS-202 SHA3-256 (`0x06`).
//!   Same permutation, different pad, completely different digests. Getting
//!   this wrong produces a well-formed signature over the wrong message, and
//!   nothing downstream will tell you. It is the single most expensive
//!   mistake available in this crate.
//!
//! - **SHA-256**: what EOS signs when handed a plain message, and (doubled)
//!   the WIF checksum.
//!
//! - **RIPEMD-160**: the EOS public-key and tagged-form checksum.
//!
//! ## Which message hash?
//!
//! [`HashAlgorithm`] names the digest used for signing. Signer and verifier
//! must agree on it; the algorithm is never inferred from the message.

use std::fmt;
use std::str::FromStr;

use ripemd::Ripemd160;
use serde::{Deserialize, Serialize};
use sha2::Digest as _;
use sha2::Sha256;
use sha3::Keccak256;

use crate::codec::hex as hex_codec;
use crate::config::DIGEST_LENGTH;
use crate::error::{Error, Result};

/// A 32-byte message digest.
///
/// Opaque on purpose: it is never reinterpreted as text except through
/// [`Digest::to_hex`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LENGTH]);

impl Digest {
    /// Wraps raw digest bytes.
    pub const fn from_bytes(bytes: [u8; DIGEST_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parses a digest from hex, with or without `0x`.
    pub fn from_hex(text: &str) -> Result<Self> {
        hex_codec::decode_array(text)
            .map(Self)
            .map_err(|e| e.in_field("digest"))
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LENGTH] {
        &self.0
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        hex_codec::encode_prefixed(&self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

/// Message hash applied before signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// Legacy Keccak-256. Ethereum, and EOS `signHash` over an Ethereum digest.
    #[default]
    Keccak256,
    /// SHA-256. What EOS signs when given a raw message.
    Sha256,
}

impl HashAlgorithm {
    /// Hashes `message` with this algorithm.
    pub fn digest(self, message: &[u8]) -> Digest {
        match self {
            HashAlgorithm::Keccak256 => Digest(keccak256(message)),
            HashAlgorithm::Sha256 => Digest(sha256(message)),
        }
    }

    /// Canonical lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Keccak256 => "keccak256",
            HashAlgorithm::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    /// Accepts `keccak256`/`keccak-256` and `sha256`/`sha-256`.
    ///
    /// `sha3-256` is rejected rather than aliased to Keccak: it is a
    /// different function and silently treating it as one is exactly the
    /// bug we're trying to make impossible.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "keccak256" | "keccak-256" | "keccak" => Ok(HashAlgorithm::Keccak256),
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            _ => Err(Error::UnsupportedHashAlgorithm(s.to_string())),
        }
    }
}

/// Legacy Keccak-256, as used by Ethereum.
///
/// # Example
///
/// ```
/// use keybridge_core::crypto::hash::keccak256;
///
/// assert_eq!(
///     hex::encode(keccak256(b"")),
///     "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
/// );
/// ```
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// SHA-256.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// `SHA-256(SHA-256(data))`, the WIF checksum hash.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// RIPEMD-160. Only ever used here for 4-byte checksums.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}
