//! # Public Key Recovery & Verification
//!
//! Given `(r, s, recid)` and the digest, there are up to four curve points
//! that could have produced the signature; the recovery id picks one. Bit 0
//! is the parity of R's y coordinate, bit 1 says whether R's x overflowed the
//! group order (astronomically rare for honest signatures).
//!
//! Both ecosystems authenticate by recovery rather than by carrying the
//! public key, so a wrong offset or a flipped parity doesn't fail loudly. It
//! recovers a different, perfectly valid key. Callers that know whom they
//! expect should use [`recover_and_check`].
//!
//! High-s signatures are accepted on input: `(r, s, recid)` and
//! `(r, n - s, recid ^ 1)` recover the same key, and `ecrecover` takes both.

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};
use tracing::debug;

use super::hash::Digest;
use super::keys::PublicKey;
use super::signature::Signature;
use crate::error::{Error, Result};

/// Recovers the public key that produced `signature` over `digest`.
///
/// # Errors
///
/// - [`Error::InvalidRecoveryId`] if the recovery id is above 3.
/// - [`Error::OutOfRange`] if r or s is zero or not below the group order.
/// - [`Error::NoValidCandidate`] if the recovery id selects no curve point.
pub fn recover_public_key(signature: &Signature, digest: &Digest) -> Result<PublicKey> {
    let recovery_id = signature.to_recovery_id()?;
    let (ecdsa, recovery_id) = low_s(signature.to_ecdsa()?, recovery_id);

    let key = VerifyingKey::recover_from_prehash(digest.as_bytes(), &ecdsa, recovery_id)
        .map_err(|_| Error::NoValidCandidate)?;
    let public_key = PublicKey::from_verifying_key(&key);
    debug!(
        recovery_id = recovery_id.to_byte(),
        public_key = %public_key.to_eos(),
        "recovered public key"
    );
    Ok(public_key)
}

/// Standard ECDSA verification of `(r, s)` against a known public key.
///
/// The recovery id is ignored. Malformed signatures and off-curve keys
/// simply fail to verify.
pub fn verify(public_key: &PublicKey, signature: &Signature, digest: &Digest) -> bool {
    let Ok(verifying_key) = public_key.to_verifying_key() else {
        return false;
    };
    let Ok(ecdsa) = signature.to_ecdsa() else {
        return false;
    };
    let ecdsa = ecdsa.normalize_s().unwrap_or(ecdsa);
    verifying_key
        .verify_prehash(digest.as_bytes(), &ecdsa)
        .is_ok()
}

/// Recovers the signer and checks it against `expected`.
pub fn recover_and_check(
    signature: &Signature,
    digest: &Digest,
    expected: &PublicKey,
) -> Result<()> {
    let recovered = recover_public_key(signature, digest)?;
    if recovered != *expected {
        return Err(Error::SignerMismatch);
    }
    Ok(())
}

/// Flips a high-s signature into the low half and adjusts the parity bit.
fn low_s(signature: EcdsaSignature, recovery_id: RecoveryId) -> (EcdsaSignature, RecoveryId) {
    match signature.normalize_s() {
        Some(normalized) => (
            normalized,
            RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced()),
        ),
        None => (signature, recovery_id),
    }
}
