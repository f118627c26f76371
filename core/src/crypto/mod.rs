//! # Cryptographic Primitives
//!
//! Everything that touches the curve or a hash function. All of it is pure:
//! no global state, no I/O, and the only randomness is key generation.
//!
//! ## Modules
//!
//! - `hash`: Keccak-256, SHA-256 and the checksum hashes (RIPEMD-160,
//!   double SHA-256).
//! - `keys`: Private/public keys and their text forms in both ecosystems.
//! - `signature`: The `(r, s, recid)` value and its hex/base58 encodings.
//! - `signing`: RFC 6979 signing, plus the EOS canonical retry loop.
//! - `recovery`: Public key recovery and plain verification.
//!
//! ## Curve
//!
//! secp256k1 only, via `k256`. Both ecosystems use it, and it is the only
//! curve the `K1` tag names.

pub mod hash;
pub mod keys;
pub mod recovery;
pub mod signature;
pub mod signing;

pub use hash::{Digest, HashAlgorithm};
pub use keys::{KeyMaterial, PrivateKey, PublicKey};
pub use recovery::{recover_and_check, recover_public_key, verify};
pub use signature::Signature;
pub use signing::{sign, sign_canonical, sign_with};
