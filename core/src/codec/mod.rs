//! # Text Codecs
//!
//! The two text encodings everything else is built from:
//!
//! - **hex**: `0x`-prefixed lowercase big-endian hex, the Ethereum way.
//! - **base58check**: version byte, payload, 4-byte checksum, base58. The
//!   Bitcoin way, which EOS inherited and then decorated with curve tags.
//!
//! Neither codec knows anything about curves. They move bytes to text and
//! back, and refuse anything that doesn't round-trip exactly.

pub mod base58check;
pub mod hex;

pub use base58check::ChecksumAlgorithm;
