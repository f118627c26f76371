//! # Key Material
//!
//! secp256k1 private and public keys, and every text form either ecosystem
//! uses for them.
//!
//! | Form             | Private key                     | Public key                    |
//! |------------------|---------------------------------|-------------------------------|
//! | Ethereum         | `0x` + 64 hex                   | `0x` + 128 hex (x ‖ y)        |
//! | EOS legacy       | WIF: base58(0x80 ‖ k ‖ dsha4)   | `EOS` + base58(P ‖ rmd4)      |
//! | EOS tagged       | `PVT_K1_` + base58(k ‖ rmdK1₄)  | `PUB_K1_` + base58(P ‖ rmdK1₄)|
//!
//! where `P` is the 33-byte compressed point.
//!
//! ## Security considerations
//!
//! - The secret scalar lives inside a `k256::ecdsa::SigningKey`, which
//!   zeroizes on drop.
//! - Range is checked at construction: zero and anything ≥ n are rejected,
//!   never reduced.
//! - Neither `PrivateKey` nor `KeyMaterial` implements `Clone`, `Serialize`
//!   or a `Debug` that prints secrets. Exporting a key is always an explicit
//!   method call.

use std::fmt;
use std::hash::{Hash, Hasher};

use k256::ecdsa::{SigningKey, VerifyingKey};
use k256::elliptic_curve::zeroize::Zeroize;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::codec::base58check::{self, ChecksumAlgorithm};
use crate::codec::hex as hex_codec;
use crate::config::{
    CurveTag, COMPRESSED_PUBLIC_KEY_LENGTH, EOS_PUBLIC_KEY_PREFIX, PRIVATE_KEY_LENGTH,
    PRIVATE_KEY_TAGGED_PREFIX, PUBLIC_KEY_LENGTH, PUBLIC_KEY_TAGGED_PREFIX, WIF_VERSION,
};
use crate::crypto::hash::keccak256;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// PrivateKey
// ---------------------------------------------------------------------------

/// A secp256k1 secret scalar in `[1, n-1]`.
pub struct PrivateKey {
    signing_key: SigningKey,
}

impl PrivateKey {
    /// Draws a fresh key from the OS CSPRNG.
    ///
    /// An entropy failure is surfaced immediately as [`Error::Entropy`]; we
    /// don't retry a broken RNG. Draws that land outside `[1, n-1]`
    /// (probability ~2⁻¹²⁸) are simply redrawn.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; PRIVATE_KEY_LENGTH];
        loop {
            OsRng
                .try_fill_bytes(&mut bytes)
                .map_err(|e| Error::Entropy(e.to_string()))?;
            if let Ok(key) = Self::from_bytes(&bytes) {
                bytes.zeroize();
                return Ok(key);
            }
        }
    }

    /// Builds a key from 32 big-endian bytes, rejecting 0 and values ≥ n.
    pub fn from_bytes(bytes: &[u8; PRIVATE_KEY_LENGTH]) -> Result<Self> {
        let signing_key = SigningKey::from_slice(bytes).map_err(|_| Error::OutOfRange {
            field: "private_key",
        })?;
        Ok(Self { signing_key })
    }

    /// Like [`from_bytes`](Self::from_bytes) but length-checks a slice first.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: &[u8; PRIVATE_KEY_LENGTH] =
            bytes.try_into().map_err(|_| Error::InvalidLength {
                field: "private_key",
                expected: PRIVATE_KEY_LENGTH,
                actual: bytes.len(),
            })?;
        Self::from_bytes(arr)
    }

    /// Exports the raw 32-byte scalar. Handle with care.
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        self.signing_key.to_bytes().into()
    }

    /// Derives the public key. Deterministic scalar multiplication, no randomness.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(self.signing_key.verifying_key())
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

impl PartialEq for PrivateKey {
    /// Compared through the public key, so no secret bytes are compared
    /// in variable time.
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for PrivateKey {}

// ---------------------------------------------------------------------------
// KeyMaterial
// ---------------------------------------------------------------------------

/// A private key together with the public key derived from it.
///
/// This is the unit both signing conventions operate on. It owns exactly one
/// [`PrivateKey`] and caches its [`PublicKey`].
///
/// # Examples
///
/// ```
/// use keybridge_core::crypto::keys::KeyMaterial;
///
/// let key = KeyMaterial::from_hex_private_key(
///     "0x95040f2b28c185eb630d61665369b3a70e2c2d2819d84aa58998e4a4de9e5899",
/// )
/// .unwrap();
/// let wif = key.to_wif();
/// assert_eq!(wif, "5JwuzTsHk4cN2Pekt8vsBWyGZqSGVAefw6QFLH31pxCzpq9jEdd");
/// assert_eq!(KeyMaterial::from_wif(&wif).unwrap(), key);
/// ```
pub struct KeyMaterial {
    private_key: PrivateKey,
    public_key: PublicKey,
}

impl KeyMaterial {
    /// Generates a new identity from the OS CSPRNG.
    pub fn generate() -> Result<Self> {
        Ok(Self::from_private_key(PrivateKey::generate()?))
    }

    /// Wraps an existing private key.
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key();
        Self {
            private_key,
            public_key,
        }
    }

    /// From 32 raw big-endian bytes. Fails with `OutOfRange` for 0 or ≥ n.
    pub fn from_raw_private_key(bytes: &[u8; PRIVATE_KEY_LENGTH]) -> Result<Self> {
        PrivateKey::from_bytes(bytes).map(Self::from_private_key)
    }

    /// From the Ethereum form, `0x` + 64 hex (prefix optional).
    pub fn from_hex_private_key(text: &str) -> Result<Self> {
        let bytes = hex_codec::decode_array::<PRIVATE_KEY_LENGTH>(text)
            .map_err(|e| e.in_field("private_key"))?;
        Self::from_raw_private_key(&bytes)
    }

    /// To the Ethereum form, `0x` + 64 lowercase hex.
    pub fn to_hex_private_key(&self) -> String {
        hex_codec::encode_prefixed(&self.private_key.to_bytes())
    }

    /// From a version-prefixed, double-SHA-256-checked base58 string.
    pub fn from_checked_private_key(text: &str, version: u8) -> Result<Self> {
        let payload = base58check::decode(
            text,
            Some(version),
            PRIVATE_KEY_LENGTH,
            ChecksumAlgorithm::Sha256x2,
        )
        .map_err(|e| e.in_field("private_key"))?;
        PrivateKey::from_slice(&payload).map(Self::from_private_key)
    }

    /// To `base58(version ‖ key ‖ sha256x2[..4])`.
    pub fn to_checked_private_key(&self, version: u8) -> String {
        base58check::encode(
            Some(version),
            &self.private_key.to_bytes(),
            ChecksumAlgorithm::Sha256x2,
        )
    }

    /// From WIF (version `0x80`), the legacy EOS private key form.
    pub fn from_wif(text: &str) -> Result<Self> {
        Self::from_checked_private_key(text, WIF_VERSION)
    }

    /// To WIF (version `0x80`).
    pub fn to_wif(&self) -> String {
        self.to_checked_private_key(WIF_VERSION)
    }

    /// From the tagged form, e.g. `PVT_K1_…`.
    pub fn from_tagged_private_key(text: &str) -> Result<Self> {
        let (_, payload) =
            base58check::decode_tagged(text, PRIVATE_KEY_TAGGED_PREFIX, PRIVATE_KEY_LENGTH)
                .map_err(|e| e.in_field("private_key"))?;
        PrivateKey::from_slice(&payload).map(Self::from_private_key)
    }

    /// To the tagged form, e.g. `PVT_K1_…`.
    pub fn to_tagged_private_key(&self, tag: CurveTag) -> String {
        base58check::encode_tagged(PRIVATE_KEY_TAGGED_PREFIX, tag, &self.private_key.to_bytes())
    }

    /// Parses any supported private key text form.
    ///
    /// `PVT_` → tagged, `0x` or 64 hex digits → hex, otherwise WIF.
    pub fn parse_private_key(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.starts_with(PRIVATE_KEY_TAGGED_PREFIX) {
            Self::from_tagged_private_key(text)
        } else if text.starts_with("0x")
            || text.starts_with("0X")
            || (text.len() == 2 * PRIVATE_KEY_LENGTH
                && text.bytes().all(|b| b.is_ascii_hexdigit()))
        {
            Self::from_hex_private_key(text)
        } else {
            Self::from_wif(text)
        }
    }

    /// The secret half.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// The public half.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyMaterial(pub={})", self.public_key.to_hex())
    }
}

impl PartialEq for KeyMaterial {
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key
    }
}

impl Eq for KeyMaterial {}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// A secp256k1 point, stored as the 64-byte x ‖ y without the SEC1 tag.
///
/// Every constructor checks the point is on the curve.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    bytes: [u8; PUBLIC_KEY_LENGTH],
}

impl PublicKey {
    pub(crate) fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(false);
        let mut bytes = [0u8; PUBLIC_KEY_LENGTH];
        // Uncompressed SEC1 is 0x04 ‖ x ‖ y.
        bytes.copy_from_slice(&point.as_bytes()[1..]);
        Self { bytes }
    }

    /// From the 64-byte x ‖ y.
    pub fn from_uncompressed(bytes: &[u8; PUBLIC_KEY_LENGTH]) -> Result<Self> {
        Self::from_sec1(&[&[0x04][..], bytes].concat())
    }

    /// From SEC1 bytes: 33-byte compressed or 65-byte uncompressed.
    pub fn from_sec1(bytes: &[u8]) -> Result<Self> {
        let key = VerifyingKey::from_sec1_bytes(bytes).map_err(|_| Error::MalformedInput {
            field: "public_key",
            reason: "not a point on secp256k1".to_string(),
        })?;
        Ok(Self::from_verifying_key(&key))
    }

    /// From `0x` + 128 hex, optionally with a leading `04`.
    pub fn from_hex(text: &str) -> Result<Self> {
        let digits = text.trim();
        let with_tag = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
            .unwrap_or(digits)
            .len()
            == 2 * (PUBLIC_KEY_LENGTH + 1);
        let expected = if with_tag {
            PUBLIC_KEY_LENGTH + 1
        } else {
            PUBLIC_KEY_LENGTH
        };
        let bytes = hex_codec::decode_prefixed(digits, expected)
            .map_err(|e| e.in_field("public_key"))?;
        if with_tag {
            Self::from_sec1(&bytes)
        } else {
            Self::from_sec1(&[&[0x04][..], &bytes[..]].concat())
        }
    }

    /// The raw 64-byte x ‖ y.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.bytes
    }

    /// `0x` + 128 hex, no SEC1 tag.
    pub fn to_hex(&self) -> String {
        hex_codec::encode_prefixed(&self.bytes)
    }

    /// `0x04` + 128 hex, the SEC1 interchange form.
    pub fn to_sec1_hex(&self) -> String {
        format!("0x04{}", hex::encode(self.bytes))
    }

    /// 33-byte SEC1 compressed form.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_PUBLIC_KEY_LENGTH] {
        let mut out = [0u8; COMPRESSED_PUBLIC_KEY_LENGTH];
        out[0] = 0x02 | (self.bytes[PUBLIC_KEY_LENGTH - 1] & 1);
        out[1..].copy_from_slice(&self.bytes[..PUBLIC_KEY_LENGTH / 2]);
        out
    }

    /// Legacy EOS form: `EOS` + base58(compressed ‖ ripemd160(compressed)[..4]).
    pub fn to_eos(&self) -> String {
        format!(
            "{EOS_PUBLIC_KEY_PREFIX}{}",
            base58check::encode(None, &self.to_compressed(), ChecksumAlgorithm::Ripemd160)
        )
    }

    /// Parses the legacy `EOS…` form.
    pub fn from_eos(text: &str) -> Result<Self> {
        let body = text
            .strip_prefix(EOS_PUBLIC_KEY_PREFIX)
            .ok_or_else(|| Error::MalformedInput {
                field: "public_key",
                reason: format!("expected `{EOS_PUBLIC_KEY_PREFIX}` prefix"),
            })?;
        let payload = base58check::decode(
            body,
            None,
            COMPRESSED_PUBLIC_KEY_LENGTH,
            ChecksumAlgorithm::Ripemd160,
        )
        .map_err(|e| e.in_field("public_key"))?;
        Self::from_sec1(&payload)
    }

    /// Tagged form, e.g. `PUB_K1_…`.
    pub fn to_tagged(&self, tag: CurveTag) -> String {
        base58check::encode_tagged(PUBLIC_KEY_TAGGED_PREFIX, tag, &self.to_compressed())
    }

    /// Parses the tagged `PUB_<tag>_…` form.
    pub fn from_tagged(text: &str) -> Result<Self> {
        let (_, payload) = base58check::decode_tagged(
            text,
            PUBLIC_KEY_TAGGED_PREFIX,
            COMPRESSED_PUBLIC_KEY_LENGTH,
        )
        .map_err(|e| e.in_field("public_key"))?;
        Self::from_sec1(&payload)
    }

    /// Parses any supported public key text form.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.starts_with(PUBLIC_KEY_TAGGED_PREFIX) {
            Self::from_tagged(text)
        } else if text.starts_with(EOS_PUBLIC_KEY_PREFIX) {
            Self::from_eos(text)
        } else {
            Self::from_hex(text)
        }
    }

    /// The EIP-55 checksummed Ethereum address: last 20 bytes of
    /// keccak256(x ‖ y), with hex letters uppercased where the keccak of the
    /// lowercase address has a nibble ≥ 8.
    pub fn eth_address(&self) -> String {
        let hash = keccak256(&self.bytes);
        let lower = hex::encode(&hash[12..]);
        let checksum = keccak256(lower.as_bytes());

        let mixed: String = lower
            .chars()
            .enumerate()
            .map(|(i, c)| {
                let nibble = if i % 2 == 0 {
                    checksum[i / 2] >> 4
                } else {
                    checksum[i / 2] & 0x0f
                };
                if c.is_ascii_alphabetic() && nibble >= 8 {
                    c.to_ascii_uppercase()
                } else {
                    c
                }
            })
            .collect();
        format!("0x{mixed}")
    }

    pub(crate) fn to_verifying_key(self) -> Result<VerifyingKey> {
        VerifyingKey::from_sec1_bytes(&[&[0x04][..], &self.bytes[..]].concat()).map_err(|_| {
            Error::MalformedInput {
                field: "public_key",
                reason: "not a point on secp256k1".to_string(),
            }
        })
    }
}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..18])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY_HEX: &str = "0x95040f2b28c185eb630d61665369b3a70e2c2d2819d84aa58998e4a4de9e5899";
    const TEST_KEY_WIF: &str = "5JwuzTsHk4cN2Pekt8vsBWyGZqSGVAefw6QFLH31pxCzpq9jEdd";
    const TEST_PUB_HEX: &str = "0xf5e903db10253350e05a702a7b4c213e79bb1637b711b74109ee9027d741bc555e7edf74aedf04898899a5e78a79085267b9da31996da54f07aae34ed3d5293e";

    /// secp256k1 group order n.
    const ORDER: [u8; 32] =
        hex_literal::hex!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141");

    fn test_key() -> KeyMaterial {
        KeyMaterial::from_hex_private_key(TEST_KEY_HEX).unwrap()
    }

    #[test]
    fn test_known_key_vectors() {
        let key = test_key();
        assert_eq!(key.to_hex_private_key(), TEST_KEY_HEX);
        assert_eq!(key.to_wif(), TEST_KEY_WIF);
        assert_eq!(key.public_key().to_hex(), TEST_PUB_HEX);
        assert_eq!(
            key.public_key().to_eos(),
            "EOS6knoMaegPrRuE2b6uNRkkXRkpRGWx2rnaxHcyJkHrfrrv5rQEi"
        );
        assert_eq!(
            key.public_key().to_tagged(CurveTag::K1),
            "PUB_K1_6knoMaegPrRuE2b6uNRkkXRkpRGWx2rnaxHcyJkHrfrrtbKxLg"
        );
        assert_eq!(
            key.to_tagged_private_key(CurveTag::K1),
            "PVT_K1_28dQnRCfc3NmPGUqwUy6UE9MEcMH2nbDHLU76zGb5MMfBMCzHU"
        );
        assert_eq!(
            key.public_key().eth_address(),
            "0x8619bc7ca937A37aE54346A88545edC083cccb2C"
        );
    }

    #[test]
    fn wif_carries_version_0x80() {
        let raw = bs58::decode(TEST_KEY_WIF).into_vec().unwrap();
        assert_eq!(raw.len(), 37);
        assert_eq!(raw[0], WIF_VERSION);
        assert_eq!(&raw[1..33], &test_key().private_key().to_bytes());
    }

    #[test]
    fn zero_key_is_out_of_range() {
        let err = KeyMaterial::from_raw_private_key(&[0u8; 32]).unwrap_err();
        assert_eq!(err, Error::OutOfRange { field: "private_key" });
    }

    #[test]
    fn order_and_above_are_out_of_range() {
        assert!(matches!(
            KeyMaterial::from_raw_private_key(&ORDER),
            Err(Error::OutOfRange { .. })
        ));
        assert!(matches!(
            KeyMaterial::from_raw_private_key(&[0xff; 32]),
            Err(Error::OutOfRange { .. })
        ));

        // n - 1 is the largest valid scalar.
        let mut n_minus_one = ORDER;
        n_minus_one[31] -= 1;
        assert!(KeyMaterial::from_raw_private_key(&n_minus_one).is_ok());
    }

    #[test]
    fn hex_private_key_rejects_bad_lengths() {
        assert!(matches!(
            KeyMaterial::from_hex_private_key("0xdeadbeef"),
            Err(Error::InvalidLength { field: "private_key", .. })
        ));
        assert!(matches!(
            KeyMaterial::from_hex_private_key("not-hex-at-all"),
            Err(Error::MalformedInput { field: "private_key", .. })
        ));
    }

    #[test]
    fn roundtrip_all_private_forms() {
        let key = KeyMaterial::generate().unwrap();
        assert_eq!(KeyMaterial::from_hex_private_key(&key.to_hex_private_key()).unwrap(), key);
        assert_eq!(KeyMaterial::from_wif(&key.to_wif()).unwrap(), key);
        assert_eq!(
            KeyMaterial::from_tagged_private_key(&key.to_tagged_private_key(CurveTag::K1))
                .unwrap(),
            key
        );
        assert_eq!(
            key.private_key().to_bytes(),
            KeyMaterial::from_wif(&key.to_wif())
                .unwrap()
                .private_key()
                .to_bytes()
        );
    }

    #[test]
    fn parse_detects_form() {
        let key = test_key();
        for text in [
            TEST_KEY_HEX.to_string(),
            TEST_KEY_HEX.trim_start_matches("0x").to_string(),
            TEST_KEY_WIF.to_string(),
            key.to_tagged_private_key(CurveTag::K1),
        ] {
            assert_eq!(KeyMaterial::parse_private_key(&text).unwrap(), key, "{text}");
        }
    }

    #[test]
    fn wif_with_wrong_version_is_rejected() {
        let text = key_with_version(0xef);
        assert!(matches!(
            KeyMaterial::from_wif(&text),
            Err(Error::VersionMismatch {
                field: "private_key",
                expected: 0x80,
                actual: 0xef
            })
        ));
        assert!(KeyMaterial::from_checked_private_key(&text, 0xef).is_ok());
    }

    fn key_with_version(version: u8) -> String {
        test_key().to_checked_private_key(version)
    }

    #[test]
    fn wif_checksum_flip_is_rejected() {
        let mut raw = bs58::decode(TEST_KEY_WIF).into_vec().unwrap();
        raw[10] ^= 0x80;
        let text = bs58::encode(raw).into_string();
        assert_eq!(
            KeyMaterial::from_wif(&text),
            Err(Error::ChecksumMismatch { field: "private_key" })
        );
    }

    #[test]
    fn public_key_forms_roundtrip() {
        let pk = *test_key().public_key();
        assert_eq!(PublicKey::from_hex(&pk.to_hex()).unwrap(), pk);
        assert_eq!(PublicKey::from_hex(&pk.to_sec1_hex()).unwrap(), pk);
        assert_eq!(PublicKey::from_eos(&pk.to_eos()).unwrap(), pk);
        assert_eq!(PublicKey::from_tagged(&pk.to_tagged(CurveTag::K1)).unwrap(), pk);
        assert_eq!(PublicKey::parse(&pk.to_eos()).unwrap(), pk);
        assert_eq!(PublicKey::parse(&pk.to_tagged(CurveTag::K1)).unwrap(), pk);
        assert_eq!(PublicKey::from_sec1(&pk.to_compressed()).unwrap(), pk);
    }

    #[test]
    fn off_curve_point_rejected() {
        let mut bytes = *test_key().public_key().as_bytes();
        bytes[63] ^= 0x01;
        assert!(matches!(
            PublicKey::from_uncompressed(&bytes),
            Err(Error::MalformedInput { field: "public_key", .. })
        ));
    }

    #[test]
    fn compressed_parity_byte() {
        let pk = test_key().public_key().to_compressed();
        // y ends in 0x3e, which is even.
        assert_eq!(pk[0], 0x02);
        assert_eq!(&pk[1..], &test_key().public_key().as_bytes()[..32]);
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let key = test_key();
        let secret = hex::encode(key.private_key().to_bytes());
        assert!(!format!("{:?}", key).contains(&secret));
        assert_eq!(format!("{:?}", key.private_key()), "PrivateKey(<redacted>)");
    }

    #[test]
    fn test_two_generated_keys_are_different() {
        let a = KeyMaterial::generate().unwrap();
        let b = KeyMaterial::generate().unwrap();
        assert_ne!(a.public_key(), b.public_key());
    }
}
