// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # KeyBridge Core Library
//!
//! One secp256k1 key, two ecosystems that refuse to agree on how to write it
//! down. Ethereum spells keys and signatures as `0x`-prefixed hex with a
//! `v = recid + 27` trailer. EOS spells them as checksummed base58 with a
//! version byte, a curve tag folded into the checksum, and `recid + 31` in
//! front. The math underneath is identical; the bytes on the wire are not.
//!
//! This crate converts between the two, signs under either convention, and
//! recovers signers so every conversion can be checked end to end.
//!
//! ## Architecture
//!
//! - **codec**: Hex and base58check text codecs. Leaves; no curve math.
//! - **crypto**: Hashing, key material, signatures, signing and recovery.
//! - **bridge**: Thin orchestration across both ecosystems.
//! - **config**: Version bytes, prefixes, offsets and other constants.
//! - **error**: The one error type every fallible call returns.
//!
//! ## Design Philosophy
//!
//! 1. Every decode either returns exactly what was encoded or a typed error.
//!    No truncation, no zero-padding, no "close enough".
//! 2. The curve arithmetic is `k256`. We glue; we don't roll.
//! 3. Everything is a pure function over owned values. Share freely across
//!    threads.

pub mod bridge;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;

pub use bridge::{BridgeReport, Identity};
pub use config::{CurveTag, Encoding, RecoveryConvention};
pub use crypto::{Digest, HashAlgorithm, KeyMaterial, PrivateKey, PublicKey, Signature};
pub use error::{Error, Result};
