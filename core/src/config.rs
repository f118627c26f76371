//! # Encoding Constants & Conventions
//!
//! Every magic byte the two ecosystems disagree on lives here. If you find a
//! literal `0x80` or `27` anywhere else in the crate, it should be one of these.
//!
//! Changing any of these breaks interoperability with the other side, which
//! is the only thing this crate exists to provide. Don't.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

// ---------------------------------------------------------------------------
// Byte lengths
// ---------------------------------------------------------------------------

/// Raw private key scalar, big-endian.
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// Uncompressed public key without the SEC1 `04` tag: x ‖ y.
pub const PUBLIC_KEY_LENGTH: usize = 64;

/// SEC1 compressed public key: parity byte ‖ x.
pub const COMPRESSED_PUBLIC_KEY_LENGTH: usize = 33;

/// Message digest length for every hash we support.
pub const DIGEST_LENGTH: usize = 32;

/// r ‖ s ‖ v.
pub const SIGNATURE_LENGTH: usize = 65;

/// Base58check trailer length.
pub const CHECKSUM_LENGTH: usize = 4;

// ---------------------------------------------------------------------------
// Checked (base58) encodings
// ---------------------------------------------------------------------------

/// Version byte of a WIF private key (Bitcoin mainnet, reused by EOS).
pub const WIF_VERSION: u8 = 0x80;

/// Prefix of the legacy EOS public key form.
pub const EOS_PUBLIC_KEY_PREFIX: &str = "EOS";

/// Prefix of tagged public keys, followed by the curve tag and `_`.
pub const PUBLIC_KEY_TAGGED_PREFIX: &str = "PUB_";

/// Prefix of tagged private keys, followed by the curve tag and `_`.
pub const PRIVATE_KEY_TAGGED_PREFIX: &str = "PVT_";

/// Prefix of checked signatures, followed by the curve tag and `_`.
pub const SIGNATURE_TAGGED_PREFIX: &str = "SIG_";

/// Upper bound on RFC 6979 retries when hunting for an EOS-canonical
/// signature. Each attempt passes with probability ~1/2, so hitting this
/// means the backend is broken, not unlucky.
pub const MAX_CANONICAL_ATTEMPTS: u32 = 256;

// ---------------------------------------------------------------------------
// Recovery id conventions
// ---------------------------------------------------------------------------

/// Additive offset applied to the raw recovery id before it is serialized.
///
/// The same signature carries `recid` in one place, `recid + 27` in another
/// and `recid + 31` in a third. Mixing them up yields a perfectly well-formed
/// signature that recovers somebody else's key, so the offset is always
/// passed explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryConvention {
    /// `v = recid`. Typed-transaction style, also what `k256` hands back.
    Raw,
    /// `v = recid + 27`. Classic Ethereum `eth_sign` / `ecrecover`.
    Ethereum,
    /// `i = recid + 27 + 4`. The `+4` flags a compressed public key (EOS).
    Eos,
}

impl RecoveryConvention {
    /// The additive offset this convention applies.
    pub const fn offset(self) -> u8 {
        match self {
            RecoveryConvention::Raw => 0,
            RecoveryConvention::Ethereum => 27,
            RecoveryConvention::Eos => 31,
        }
    }

    /// Maps a serialized recovery byte back to `(convention, recid)`.
    ///
    /// Returns `None` for bytes no convention produces.
    pub fn classify(byte: u8) -> Option<(Self, u8)> {
        [
            RecoveryConvention::Raw,
            RecoveryConvention::Ethereum,
            RecoveryConvention::Eos,
        ]
        .into_iter()
        .find_map(|convention| {
            let recid = byte.checked_sub(convention.offset())?;
            (recid <= 3).then_some((convention, recid))
        })
    }
}

// ---------------------------------------------------------------------------
// Ecosystems
// ---------------------------------------------------------------------------

/// Which ecosystem's text forms and signing rules to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// `0x` hex keys, `r ‖ s ‖ v` hex signatures with `v = recid + 27`.
    Ethereum,
    /// WIF / `EOS…` keys, `SIG_K1_` signatures, canonical-only signing.
    Eos,
}

impl Encoding {
    /// The recovery id offset this ecosystem serializes with.
    pub const fn recovery_convention(self) -> RecoveryConvention {
        match self {
            Encoding::Ethereum => RecoveryConvention::Ethereum,
            Encoding::Eos => RecoveryConvention::Eos,
        }
    }

    /// Canonical lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Encoding::Ethereum => "ethereum",
            Encoding::Eos => "eos",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eth" | "ethereum" => Ok(Encoding::Ethereum),
            "eos" => Ok(Encoding::Eos),
            _ => Err(Error::UnsupportedEncoding(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Curve tags
// ---------------------------------------------------------------------------

/// Curve identifier embedded in tagged text forms and mixed into their checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveTag {
    /// secp256k1.
    K1,
}

impl CurveTag {
    /// The tag as it appears in text and in the checksum input.
    pub const fn as_str(self) -> &'static str {
        match self {
            CurveTag::K1 => "K1",
        }
    }
}

impl fmt::Display for CurveTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurveTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "K1" => Ok(CurveTag::K1),
            other => Err(Error::UnknownCurveTag {
                tag: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_match_ecosystems() {
        assert_eq!(RecoveryConvention::Raw.offset(), 0);
        assert_eq!(RecoveryConvention::Ethereum.offset(), 27);
        assert_eq!(RecoveryConvention::Eos.offset(), 31);
    }

    #[test]
    fn classify_known_bytes() {
        assert_eq!(
            RecoveryConvention::classify(1),
            Some((RecoveryConvention::Raw, 1))
        );
        assert_eq!(
            RecoveryConvention::classify(28),
            Some((RecoveryConvention::Ethereum, 1))
        );
        assert_eq!(
            RecoveryConvention::classify(31),
            Some((RecoveryConvention::Eos, 0))
        );
        assert_eq!(
            RecoveryConvention::classify(34),
            Some((RecoveryConvention::Eos, 3))
        );
    }

    #[test]
    fn classify_rejects_gaps() {
        for byte in [4u8, 26, 35, 0xff] {
            assert_eq!(RecoveryConvention::classify(byte), None, "byte {byte}");
        }
    }

    #[test]
    fn encoding_parse() {
        assert_eq!("eth".parse::<Encoding>(), Ok(Encoding::Ethereum));
        assert_eq!("Ethereum".parse::<Encoding>(), Ok(Encoding::Ethereum));
        assert_eq!("eos".parse::<Encoding>(), Ok(Encoding::Eos));
        assert_eq!(
            "tron".parse::<Encoding>(),
            Err(Error::UnsupportedEncoding("tron".into()))
        );
        assert_eq!(
            Encoding::Eos.recovery_convention(),
            RecoveryConvention::Eos
        );
    }

    #[test]
    fn curve_tag_parse() {
        assert_eq!("K1".parse::<CurveTag>(), Ok(CurveTag::K1));
        assert_eq!(
            "R1".parse::<CurveTag>(),
            Err(Error::UnknownCurveTag { tag: "R1".into() })
        );
    }

    #[test]
    fn test_lengths_are_consistent() {
        assert_eq!(SIGNATURE_LENGTH, 2 * PRIVATE_KEY_LENGTH + 1);
        assert_eq!(COMPRESSED_PUBLIC_KEY_LENGTH, PUBLIC_KEY_LENGTH / 2 + 1);
    }
}
