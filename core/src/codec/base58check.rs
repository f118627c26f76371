//! # Base58check
//!
//! `base58(version? ‖ payload ‖ checksum4)`, where the checksum routine is a
//! parameter rather than a constant. Bitcoin-style WIF keys use double
//! SHA-256; EOS public keys use RIPEMD-160; EOS tagged forms (`PUB_K1_`,
//! `PVT_K1_`, `SIG_K1_`) use RIPEMD-160 over the payload with the curve tag
//! appended. Same shape, three different trailers.
//!
//! ## Decode order
//!
//! 1. Alphabet (`MalformedInput`).
//! 2. Total length (`InvalidLength`).
//! 3. Checksum (`ChecksumMismatch`).
//! 4. Version byte (`VersionMismatch`).
//!
//! The checksum is checked before the version so a corrupted version byte
//! reports as corruption, not as a different kind of key.

use crate::config::{CurveTag, CHECKSUM_LENGTH};
use crate::crypto::hash::{double_sha256, ripemd160};
use crate::error::{Error, Result};

/// Routine producing the 4-byte checksum trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    /// `sha256(sha256(data))[..4]`: WIF private keys.
    Sha256x2,
    /// `ripemd160(data)[..4]`: legacy `EOS…` public keys.
    Ripemd160,
    /// `ripemd160(data ‖ tag)[..4]`: tagged EOS keys and signatures.
    Ripemd160Tagged(CurveTag),
}

impl ChecksumAlgorithm {
    /// Computes the checksum trailer over `data`.
    pub fn checksum(self, data: &[u8]) -> [u8; CHECKSUM_LENGTH] {
        let digest = match self {
            ChecksumAlgorithm::Sha256x2 => double_sha256(data).to_vec(),
            ChecksumAlgorithm::Ripemd160 => ripemd160(data).to_vec(),
            ChecksumAlgorithm::Ripemd160Tagged(tag) => {
                ripemd160(&[data, tag.as_str().as_bytes()].concat()).to_vec()
            }
        };
        let mut out = [0u8; CHECKSUM_LENGTH];
        out.copy_from_slice(&digest[..CHECKSUM_LENGTH]);
        out
    }
}

/// Encodes `version? ‖ payload` with a checksum trailer.
pub fn encode(version: Option<u8>, payload: &[u8], algorithm: ChecksumAlgorithm) -> String {
    let versioned = match version {
        Some(v) => [&[v][..], payload].concat(),
        None => payload.to_vec(),
    };
    let checksum = algorithm.checksum(&versioned);
    bs58::encode([versioned.as_slice(), &checksum[..]].concat()).into_string()
}

/// Decodes and validates a base58check string, returning the payload.
///
/// `version` is the expected leading byte (or `None` for unversioned forms)
/// and `payload_len` the exact payload size the caller requires.
pub fn decode(
    text: &str,
    version: Option<u8>,
    payload_len: usize,
    algorithm: ChecksumAlgorithm,
) -> Result<Vec<u8>> {
    let raw = bs58::decode(text)
        .into_vec()
        .map_err(|e| Error::MalformedInput {
            field: "payload",
            reason: e.to_string(),
        })?;

    let version_len = usize::from(version.is_some());
    let expected = version_len + payload_len + CHECKSUM_LENGTH;
    if raw.len() != expected {
        return Err(Error::InvalidLength {
            field: "payload",
            expected,
            actual: raw.len(),
        });
    }

    let (body, checksum) = raw.split_at(raw.len() - CHECKSUM_LENGTH);
    if algorithm.checksum(body).as_slice() != checksum {
        return Err(Error::ChecksumMismatch { field: "payload" });
    }

    if let Some(expected_version) = version {
        if body[0] != expected_version {
            return Err(Error::VersionMismatch {
                field: "payload",
                expected: expected_version,
                actual: body[0],
            });
        }
    }

    Ok(body[version_len..].to_vec())
}

/// Splits a tagged form like `SIG_K1_<base58>` into its curve tag and body.
///
/// `kind` is the leading `SIG_` / `PUB_` / `PVT_`. A recognisable shape with
/// an unfamiliar tag is [`Error::UnknownCurveTag`]; anything else is malformed.
pub fn split_tagged<'a>(text: &'a str, kind: &str) -> Result<(CurveTag, &'a str)> {
    let rest = text.strip_prefix(kind).ok_or_else(|| Error::MalformedInput {
        field: "payload",
        reason: format!("expected `{kind}` prefix"),
    })?;
    let (tag, body) = rest.split_once('_').ok_or_else(|| Error::MalformedInput {
        field: "payload",
        reason: "missing curve tag separator".to_string(),
    })?;
    Ok((tag.parse()?, body))
}

/// Builds a tagged form: `kind ‖ tag ‖ "_" ‖ base58(payload ‖ checksum)`.
pub fn encode_tagged(kind: &str, tag: CurveTag, payload: &[u8]) -> String {
    format!(
        "{kind}{tag}_{}",
        encode(None, payload, ChecksumAlgorithm::Ripemd160Tagged(tag))
    )
}

/// Inverse of [`encode_tagged`], returning the tag and the checked payload.
pub fn decode_tagged(text: &str, kind: &str, payload_len: usize) -> Result<(CurveTag, Vec<u8>)> {
    let (tag, body) = split_tagged(text, kind)?;
    let payload = decode(body, None, payload_len, ChecksumAlgorithm::Ripemd160Tagged(tag))?;
    Ok((tag, payload))
}
