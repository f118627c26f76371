//! # Signatures & Their Encodings
//!
//! One ECDSA signature, `(r, s, recid)`, two wire formats:
//!
//! - **Hex triple** (Ethereum): `0x ‖ r ‖ s ‖ v`, 65 bytes, where
//!   `v = recid + offset` and the offset is 27 for `eth_sign`-style
//!   signatures and 0 for raw ones.
//! - **Checked** (EOS): `SIG_K1_ ‖ base58(i ‖ r ‖ s ‖ checksum)`, where
//!   `i = recid + 31` and the checksum is `ripemd160(i ‖ r ‖ s ‖ "K1")[..4]`.
//!   Yes, the curve tag is mixed into the checksum input. That is how the
//!   other side computes it, so that is how we compute it.
//!
//! [`Signature`] always stores the *raw* recovery id (0..=3). Offsets only
//! ever exist in text, and every encode/decode names its [`RecoveryConvention`].

use std::fmt;

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature};

use crate::codec::base58check;
use crate::codec::hex as hex_codec;
use crate::config::{CurveTag, RecoveryConvention, SIGNATURE_LENGTH, SIGNATURE_TAGGED_PREFIX};
use crate::error::{Error, Result};

/// An ECDSA secp256k1 signature with its raw recovery id.
///
/// Fields are public so callers can build arbitrary (including invalid)
/// signatures; every consumer re-validates. Use [`Signature::new`] for a
/// checked constructor.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    /// Big-endian r, in `[1, n-1]` for a valid signature.
    pub r: [u8; 32],
    /// Big-endian s, in `[1, n-1]` for a valid signature.
    pub s: [u8; 32],
    /// Raw recovery id: bit 0 = y parity, bit 1 = x ≥ n.
    pub recovery_id: u8,
}

impl Signature {
    /// Builds a signature, checking `r`, `s` ∈ `[1, n-1]` and `recid` ≤ 3.
    pub fn new(r: [u8; 32], s: [u8; 32], recovery_id: u8) -> Result<Self> {
        let sig = Self { r, s, recovery_id };
        sig.to_ecdsa()?;
        sig.to_recovery_id()?;
        Ok(sig)
    }

    pub(crate) fn from_parts(signature: &EcdsaSignature, recovery_id: RecoveryId) -> Self {
        let bytes = signature.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Self {
            r,
            s,
            recovery_id: recovery_id.to_byte(),
        }
    }

    /// The `k256` view of `(r, s)`. Fails with `OutOfRange` if either is 0 or ≥ n.
    pub(crate) fn to_ecdsa(&self) -> Result<EcdsaSignature> {
        EcdsaSignature::from_scalars(self.r, self.s)
            .map_err(|_| Error::OutOfRange { field: "signature" })
    }

    pub(crate) fn to_recovery_id(&self) -> Result<RecoveryId> {
        RecoveryId::from_byte(self.recovery_id).ok_or(Error::InvalidRecoveryId(self.recovery_id))
    }

    /// `r ‖ s ‖ (recid + offset)`.
    ///
    /// Fails on the same inputs the decoders reject, so every encoded
    /// signature parses back.
    pub fn to_bytes(&self, convention: RecoveryConvention) -> Result<[u8; SIGNATURE_LENGTH]> {
        let recovery_id = self.validated_recovery_id()?;
        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = recovery_id + convention.offset();
        Ok(out)
    }

    /// Hex triple: `0x` + 64 hex (r) + 64 hex (s) + 2 hex (recid + offset).
    pub fn to_hex_triple(&self, convention: RecoveryConvention) -> Result<String> {
        Ok(hex_codec::encode_prefixed(&self.to_bytes(convention)?))
    }

    /// Parses a hex triple, inferring the convention from the trailing byte.
    ///
    /// `0..=3` is raw, `27..=30` Ethereum, `31..=34` EOS-style. Anything
    /// else is [`Error::UnrecognizedRecoveryByte`].
    pub fn from_hex_triple(text: &str) -> Result<(Self, RecoveryConvention)> {
        let bytes = hex_codec::decode_array::<SIGNATURE_LENGTH>(text)
            .map_err(|e| e.in_field("signature"))?;
        let (convention, recovery_id) = RecoveryConvention::classify(bytes[64])
            .ok_or(Error::UnrecognizedRecoveryByte(bytes[64]))?;
        Ok((Self::from_payload(&bytes[..64], recovery_id)?, convention))
    }

    /// Checked EOS form: `SIG_<tag>_` + base58(i ‖ r ‖ s ‖ checksum).
    pub fn to_checked(&self, tag: CurveTag) -> Result<String> {
        Ok(base58check::encode_tagged(
            SIGNATURE_TAGGED_PREFIX,
            tag,
            &self.eos_payload()?,
        ))
    }

    /// Parses the checked EOS form.
    ///
    /// The leading byte is `recid + 31` as EOS writes it today, or
    /// `recid + 27` from older tooling that leaves the compressed flag clear.
    /// Both name the same key, since EOS keys are always compressed.
    pub fn from_checked(text: &str) -> Result<Self> {
        let (_, payload) =
            base58check::decode_tagged(text.trim(), SIGNATURE_TAGGED_PREFIX, SIGNATURE_LENGTH)
                .map_err(|e| e.in_field("signature"))?;
        let (convention, recovery_id) = RecoveryConvention::classify(payload[0])
            .ok_or(Error::UnrecognizedRecoveryByte(payload[0]))?;
        if convention == RecoveryConvention::Raw {
            return Err(Error::UnrecognizedRecoveryByte(payload[0]));
        }
        Self::from_payload(&payload[1..], recovery_id)
    }

    /// Whether an EOS node will accept this signature.
    ///
    /// EOS requires r and s to DER-encode in exactly 32 bytes: no high bit
    /// set on the leading byte (which would need a 0x00 pad), and no leading
    /// zero byte unless the next byte needs it.
    pub fn is_eos_canonical(&self) -> bool {
        fn canonical(x: &[u8; 32]) -> bool {
            x[0] & 0x80 == 0 && !(x[0] == 0 && x[1] & 0x80 == 0)
        }
        canonical(&self.r) && canonical(&self.s)
    }

    fn eos_payload(&self) -> Result<Vec<u8>> {
        let recovery_id = self.validated_recovery_id()?;
        Ok([
            &[recovery_id + RecoveryConvention::Eos.offset()][..],
            &self.r[..],
            &self.s[..],
        ]
        .concat())
    }

    /// Range-checks r, s and the recovery id before anything is encoded.
    fn validated_recovery_id(&self) -> Result<u8> {
        self.to_ecdsa()?;
        Ok(self.to_recovery_id()?.to_byte())
    }

    fn from_payload(rs: &[u8], recovery_id: u8) -> Result<Self> {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&rs[..32]);
        s.copy_from_slice(&rs[32..64]);
        Self::new(r, s, recovery_id)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Signature(r={}, s={}, recid={})",
            hex::encode(self.r),
            hex::encode(self.s),
            self.recovery_id
        )
    }
}
