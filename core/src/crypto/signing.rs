//! # Signing
//!
//! Deterministic ECDSA over a 32-byte digest.
//!
//! Nonces come from RFC 6979: `k` is derived from the private key and the
//! digest, so the same `(key, digest)` always yields the same signature.
//! That rules out the classic ECDSA failure (reused or biased `k` leaking the
//! key) and makes golden-vector tests possible.
//!
//! `s` is always normalised to the low half of the group order (both
//! ecosystems reject high-s), and the recovery id is flipped to match.
//!
//! ## EOS canonical signatures
//!
//! EOS additionally rejects signatures whose r or s would need DER padding
//! (see [`Signature::is_eos_canonical`]). Its signer loops, mixing an attempt
//! counter into the nonce derivation until the result is canonical.
//! [`sign_canonical`] does the same through RFC 6979's additional-data input.
//! Attempt 0 is plain RFC 6979, so a signature that is already canonical is
//! byte-identical to the one [`sign`] produces.

use k256::ecdsa::signature::hazmat::RandomizedPrehashSigner;
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature};
use rand_core::{CryptoRng, RngCore};
use tracing::debug;

use super::hash::Digest;
use super::keys::KeyMaterial;
use super::signature::Signature;
use crate::config::{Encoding, MAX_CANONICAL_ATTEMPTS};
use crate::error::{Error, Result};

/// Signs `digest` with RFC 6979 nonces and low-s normalisation.
///
/// # Example
///
/// ```
/// use keybridge_core::crypto::{sign, verify, HashAlgorithm, KeyMaterial};
///
/// let key = KeyMaterial::generate().unwrap();
/// let digest = HashAlgorithm::Keccak256.digest(b"EOS can handle ETH signatures");
/// let sig = sign(&key, &digest).unwrap();
///
/// assert!(verify(key.public_key(), &sig, &digest));
/// assert_eq!(sign(&key, &digest).unwrap(), sig);
/// ```
pub fn sign(key: &KeyMaterial, digest: &Digest) -> Result<Signature> {
    let (signature, recovery_id) = key
        .private_key()
        .signing_key()
        .sign_prehash_recoverable(digest.as_bytes())
        .map_err(|e| Error::SigningFailed(e.to_string()))?;
    Ok(Signature::from_parts(&signature, recovery_id))
}

/// Signs `digest`, retrying until the signature is EOS-canonical.
pub fn sign_canonical(key: &KeyMaterial, digest: &Digest) -> Result<Signature> {
    let first = sign(key, digest)?;
    if first.is_eos_canonical() {
        return Ok(first);
    }

    let signing_key = key.private_key().signing_key();
    for attempt in 1..MAX_CANONICAL_ATTEMPTS {
        let signature: EcdsaSignature = signing_key
            .sign_prehash_with_rng(&mut AttemptCounter(attempt), digest.as_bytes())
            .map_err(|e| Error::SigningFailed(e.to_string()))?;
        let signature = signature.normalize_s().unwrap_or(signature);
        let recovery_id = RecoveryId::trial_recovery_from_prehash(
            signing_key.verifying_key(),
            digest.as_bytes(),
            &signature,
        )
        .map_err(|e| Error::SigningFailed(e.to_string()))?;

        let candidate = Signature::from_parts(&signature, recovery_id);
        if candidate.is_eos_canonical() {
            debug!(attempt, "found canonical signature");
            return Ok(candidate);
        }
    }

    Err(Error::SigningFailed(format!(
        "no canonical signature after {MAX_CANONICAL_ATTEMPTS} attempts"
    )))
}

/// Signs under the rules of the given ecosystem.
pub fn sign_with(key: &KeyMaterial, digest: &Digest, encoding: Encoding) -> Result<Signature> {
    match encoding {
        Encoding::Ethereum => sign(key, digest),
        Encoding::Eos => sign_canonical(key, digest),
    }
}

/// Feeds an attempt counter into RFC 6979 as additional data.
///
/// Not a source of randomness: the output is a pure function of the counter,
/// which keeps [`sign_canonical`] deterministic. The `CryptoRng` marker is
/// required by the signer's signature only; the secret nonce is still
/// derived by HMAC-DRBG from the private key and digest.
struct AttemptCounter(u32);

impl RngCore for AttemptCounter {
    fn next_u32(&mut self) -> u32 {
        self.0
    }

    fn next_u64(&mut self) -> u64 {
        u64::from(self.0)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
        let counter = self.0.to_be_bytes();
        let n = dest.len().min(counter.len());
        let len = dest.len();
        dest[len - n..].copy_from_slice(&counter[counter.len() - n..]);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for AttemptCounter {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CurveTag, RecoveryConvention};
    use crate::crypto::hash::HashAlgorithm;
    use crate::crypto::recovery::{recover_public_key, verify};

    const TEST_KEY_HEX: &str = "0x95040f2b28c185eb630d61665369b3a70e2c2d2819d84aa58998e4a4de9e5899";

    fn test_key() -> KeyMaterial {
        KeyMaterial::from_hex_private_key(TEST_KEY_HEX).unwrap()
    }

    fn bridge_digest() -> Digest {
        HashAlgorithm::Keccak256.digest(b"EOS can handle ETH signatures")
    }

    #[test]
    fn test_golden_signature() {
        let sig = sign(&test_key(), &bridge_digest()).unwrap();
        assert_eq!(
            sig.to_hex_triple(RecoveryConvention::Ethereum).unwrap(),
            "0x388862e1a8e03c0d5012ca201c65c0eaecbe13f7418444e8788cd2f358bf254214d413e7e033d08629cd3a50ed413e947d289e2bedf34a133048b39fa509d7cc1c"
        );
        assert_eq!(sig.recovery_id, 1);
    }

    #[test]
    fn test_golden_canonical_signature() {
        // Already canonical on the first attempt, so both paths agree.
        let sig = sign_canonical(&test_key(), &bridge_digest()).unwrap();
        assert_eq!(sig, sign(&test_key(), &bridge_digest()).unwrap());
        assert_eq!(
            sig.to_checked(CurveTag::K1).unwrap(),
            "SIG_K1_Kc9HqFMyRc9KYKCHSw6HXVVnuHiRHHTQNsng4VnRMB8q2nyA9sHmpuKkzNLDpYf3HNN1Geykjp79ftRDHpTMmdBuZ4obG4"
        );
    }

    #[test]
    fn test_deterministic_signatures() {
        let key = test_key();
        let digest = HashAlgorithm::Sha256.digest(b"determinism is underrated");
        assert_eq!(sign(&key, &digest).unwrap(), sign(&key, &digest).unwrap());
        assert_eq!(
            sign_canonical(&key, &digest).unwrap(),
            sign_canonical(&key, &digest).unwrap()
        );
    }

    #[test]
    fn signatures_are_low_s() {
        // n / 2, big-endian.
        let half_order =
            hex_literal::hex!("7fffffffffffffffffffffffffffffff5d576e7357a4501ddfe92f46681b20a0");
        let key = test_key();
        for i in 0u32..32 {
            let digest = HashAlgorithm::Keccak256.digest(&i.to_be_bytes());
            let sig = sign(&key, &digest).unwrap();
            assert!(sig.s <= half_order, "high s for message {i}");
        }
    }

    #[test]
    fn canonical_signatures_are_canonical_and_valid() {
        let key = test_key();
        let mut retried = 0;
        for i in 0u32..64 {
            let digest = HashAlgorithm::Keccak256.digest(&i.to_be_bytes());
            let plain = sign(&key, &digest).unwrap();
            let canonical = sign_canonical(&key, &digest).unwrap();

            assert!(canonical.is_eos_canonical());
            assert!(verify(key.public_key(), &canonical, &digest));
            assert_eq!(
                recover_public_key(&canonical, &digest).unwrap(),
                *key.public_key()
            );
            if plain != canonical {
                retried += 1;
            }
        }
        // About half of plain signatures have a high bit set in r.
        assert!(retried > 0);
    }

    #[test]
    fn sign_with_dispatches_by_encoding() {
        let key = test_key();
        let digest = bridge_digest();
        assert_eq!(
            sign_with(&key, &digest, Encoding::Ethereum).unwrap(),
            sign(&key, &digest).unwrap()
        );
        assert!(sign_with(&key, &digest, Encoding::Eos)
            .unwrap()
            .is_eos_canonical());
    }

    #[test]
    fn attempt_counter_fills_big_endian_tail() {
        let mut buf = [0xaau8; 8];
        AttemptCounter(0x0102_0304).fill_bytes(&mut buf);
        assert_eq!(buf, [0, 0, 0, 0, 1, 2, 3, 4]);

        let mut short = [0u8; 2];
        AttemptCounter(0x0102_0304).fill_bytes(&mut short);
        assert_eq!(short, [3, 4]);
    }
}
