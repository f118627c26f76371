//! # Bridge
//!
//! The end-to-end flow: make (or load) a key, hash a message, sign it under
//! one ecosystem's rules, and recover the signer from the resulting text.
//! Every stage takes its inputs as arguments and returns its outputs; nothing
//! is kept between calls.
//!
//! All text in and out of this module is in the formats the two ecosystems
//! actually exchange, so a CLI or RPC layer can pass strings straight through.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::config::{CurveTag, Encoding, RecoveryConvention};
use crate::crypto::hash::HashAlgorithm;
use crate::crypto::keys::{KeyMaterial, PublicKey};
use crate::crypto::recovery::recover_public_key;
use crate::crypto::signature::Signature;
use crate::crypto::signing::{sign, sign_canonical, sign_with};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// A key pair in every text form either side needs.
///
/// This is the one type in the crate that serializes a private key: it
/// exists to hand a freshly generated identity to its owner. `Debug` still
/// redacts it.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// `0x` + 64 hex.
    pub private_key_hex: String,
    /// WIF, version `0x80`.
    pub private_key_wif: String,
    /// `0x` + 128 hex, x ‖ y.
    pub public_key_hex: String,
    /// Legacy `EOS…` form.
    pub public_key_eos: String,
    /// EIP-55 checksummed Ethereum address.
    pub address: String,
}

impl Identity {
    /// Renders an existing key pair.
    pub fn from_key(key: &KeyMaterial) -> Self {
        let public_key = key.public_key();
        Self {
            private_key_hex: key.to_hex_private_key(),
            private_key_wif: key.to_wif(),
            public_key_hex: public_key.to_hex(),
            public_key_eos: public_key.to_eos(),
            address: public_key.eth_address(),
        }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("public_key_eos", &self.public_key_eos)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Generates a fresh key pair from the OS CSPRNG.
pub fn generate_identity() -> Result<Identity> {
    let key = KeyMaterial::generate()?;
    let identity = Identity::from_key(&key);
    debug!(address = %identity.address, "generated identity");
    Ok(identity)
}

// ---------------------------------------------------------------------------
// Sign / recover over text
// ---------------------------------------------------------------------------

/// Signs `message` with a private key given in any supported text form.
///
/// Returns the signature in `encoding`'s text form: an `r ‖ s ‖ v` hex triple
/// with `v = recid + 27` for Ethereum, or a canonical `SIG_K1_…` for EOS.
pub fn sign_message(
    private_key_text: &str,
    message: &[u8],
    encoding: Encoding,
    hash: HashAlgorithm,
) -> Result<String> {
    let key = KeyMaterial::parse_private_key(private_key_text)?;
    let digest = hash.digest(message);
    let signature = sign_with(&key, &digest, encoding)?;
    debug!(%encoding, %hash, digest = %digest, "signed message");
    encode_signature(&signature, encoding)
}

/// Recovers the signer of `message` from a signature in `encoding`'s form.
///
/// Ethereum signatures may carry any recovery offset (0, 27 or 31); the
/// signer comes back as `0x` + 128 hex. EOS signatures must be `SIG_K1_…`;
/// the signer comes back as `EOS…`.
pub fn recover_signer(
    signature_text: &str,
    message: &[u8],
    encoding: Encoding,
    hash: HashAlgorithm,
) -> Result<String> {
    let signature = decode_signature(signature_text, encoding)?;
    let digest = hash.digest(message);
    let public_key = recover_public_key(&signature, &digest)?;
    debug!(%encoding, %hash, digest = %digest, "recovered signer");
    Ok(encode_public_key(&public_key, encoding))
}

fn encode_signature(signature: &Signature, encoding: Encoding) -> Result<String> {
    match encoding {
        Encoding::Ethereum => signature.to_hex_triple(encoding.recovery_convention()),
        Encoding::Eos => signature.to_checked(CurveTag::K1),
    }
}

fn decode_signature(text: &str, encoding: Encoding) -> Result<Signature> {
    match encoding {
        Encoding::Ethereum => Signature::from_hex_triple(text).map(|(sig, _)| sig),
        Encoding::Eos => Signature::from_checked(text),
    }
}

fn encode_public_key(public_key: &PublicKey, encoding: Encoding) -> String {
    match encoding {
        Encoding::Ethereum => public_key.to_hex(),
        Encoding::Eos => public_key.to_eos(),
    }
}

// ---------------------------------------------------------------------------
// Cross-validation
// ---------------------------------------------------------------------------

/// Everything [`cross_validate`] produced, in both ecosystems' forms.
///
/// Public material only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeReport {
    /// Keccak-256 of the message, `0x` + 64 hex.
    pub digest: String,
    /// Signer's public key, `0x` + 128 hex.
    pub public_key_hex: String,
    /// Signer's public key, `EOS…`.
    pub public_key_eos: String,
    /// Signer's Ethereum address.
    pub address: String,
    /// Ethereum signature over the digest, `v = recid + 27`.
    pub eth_signature: String,
    /// EOS-canonical signature over the same digest (EOS `signHash`).
    pub eos_signature: String,
    /// EOS-canonical signature over SHA-256 of the message (EOS `sign`).
    pub eos_message_signature: String,
    /// Key recovered from `eth_signature`, hex form.
    pub eth_recovered: String,
    /// Key recovered from `eos_signature`, `EOS…` form.
    pub eos_recovered: String,
    /// Key recovered from `eos_message_signature`, `EOS…` form.
    pub eos_message_recovered: String,
    /// Whether both signatures carry the same `(r, s, recid)`. False when
    /// the EOS canonical loop had to retry.
    pub same_signature: bool,
    /// Whether every recovery returned the signer's key.
    pub consistent: bool,
}

/// Signs `message` under both ecosystems with one key, re-parses both
/// signature strings, recovers from each and compares against the key.
///
/// The shared digest is Keccak-256, so the EOS signature is the equivalent
/// of `signHash` over the Ethereum digest. A third signature covers
/// SHA-256 of the message, which is what EOS signs when handed the message
/// itself.
pub fn cross_validate(key: &KeyMaterial, message: &[u8]) -> Result<BridgeReport> {
    let public_key = key.public_key();
    let digest = HashAlgorithm::Keccak256.digest(message);
    debug!(digest = %digest, signer = %public_key.to_eos(), "cross-validating");

    let message_digest = HashAlgorithm::Sha256.digest(message);

    let eth_signature = sign(key, &digest)?.to_hex_triple(RecoveryConvention::Ethereum)?;
    let eos_signature = sign_canonical(key, &digest)?.to_checked(CurveTag::K1)?;
    let eos_message_signature = sign_canonical(key, &message_digest)?.to_checked(CurveTag::K1)?;

    let (eth_parsed, _) = Signature::from_hex_triple(&eth_signature)?;
    let eos_parsed = Signature::from_checked(&eos_signature)?;
    let eos_message_parsed = Signature::from_checked(&eos_message_signature)?;
    let eth_recovered = recover_public_key(&eth_parsed, &digest)?;
    let eos_recovered = recover_public_key(&eos_parsed, &digest)?;
    let eos_message_recovered = recover_public_key(&eos_message_parsed, &message_digest)?;

    let consistent = [&eth_recovered, &eos_recovered, &eos_message_recovered]
        .into_iter()
        .all(|recovered| recovered == public_key);
    debug!(consistent, "cross-validation finished");

    Ok(BridgeReport {
        digest: digest.to_hex(),
        public_key_hex: public_key.to_hex(),
        public_key_eos: public_key.to_eos(),
        address: public_key.eth_address(),
        eth_signature,
        eos_signature,
        eos_message_signature,
        eth_recovered: eth_recovered.to_hex(),
        eos_recovered: eos_recovered.to_eos(),
        eos_message_recovered: eos_message_recovered.to_eos(),
        same_signature: eth_parsed == eos_parsed,
        consistent,
    })
}
