//! Error types for key and signature conversion.
//!
//! Every fallible operation in the crate returns an [`Error`]. Variants name
//! the offending field where one exists so callers can tell the user which
//! input to fix. Nothing here ever carries secret key material.

use thiserror::Error;

/// Failure kinds for decoding, signing and recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Characters outside the expected alphabet, odd hex length, missing prefix.
    #[error("malformed {field}: {reason}")]
    MalformedInput {
        /// The input that failed to parse.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// The decoded byte count does not match what the format requires.
    #[error("invalid length for {field}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// The input with the wrong length.
        field: &'static str,
        /// Byte count the format requires.
        expected: usize,
        /// Byte count actually decoded.
        actual: usize,
    },

    /// The trailing 4-byte checksum does not match the recomputed one.
    #[error("checksum mismatch in {field}")]
    ChecksumMismatch {
        /// The input whose checksum failed.
        field: &'static str,
    },

    /// The leading version byte is not the one this format uses.
    #[error("version mismatch in {field}: expected 0x{expected:02x}, got 0x{actual:02x}")]
    VersionMismatch {
        /// The input with the wrong version byte.
        field: &'static str,
        /// Version byte the format requires.
        expected: u8,
        /// Version byte actually found.
        actual: u8,
    },

    /// A `SIG_<tag>_`-style prefix named a curve we do not handle.
    #[error("unknown curve tag `{tag}`")]
    UnknownCurveTag {
        /// The tag as it appeared in the input.
        tag: String,
    },

    /// The trailing `v` byte of a hex signature fits no known convention.
    #[error("unrecognized recovery byte 0x{0:02x}")]
    UnrecognizedRecoveryByte(u8),

    /// A scalar (private key, r or s) is zero or not below the group order.
    #[error("{field} is out of range: scalar must be in [1, n-1]")]
    OutOfRange {
        /// The scalar that was out of range.
        field: &'static str,
    },

    /// Recovery id outside `0..=3`.
    #[error("invalid recovery id {0}: expected 0..=3")]
    InvalidRecoveryId(u8),

    /// No curve point matches the signature under the given recovery id.
    #[error("no valid public key candidate for this signature")]
    NoValidCandidate,

    /// A hash algorithm name we do not implement.
    #[error("unsupported hash algorithm `{0}`")]
    UnsupportedHashAlgorithm(String),

    /// An encoding name other than the two ecosystems in scope.
    #[error("unsupported encoding `{0}`")]
    UnsupportedEncoding(String),

    /// Recovery produced a valid key, just not the one we expected.
    #[error("recovered signer does not match the expected public key")]
    SignerMismatch,

    /// The signing backend refused the input or the canonical loop ran dry.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// The OS randomness source failed while generating a key.
    #[error("entropy source failure: {0}")]
    Entropy(String),
}

impl Error {
    /// Re-labels the field of a field-carrying error.
    ///
    /// Codecs report errors against a generic `"payload"`; callers that know
    /// what the payload was (a private key, a signature) rename it here.
    pub fn in_field(self, name: &'static str) -> Self {
        match self {
            Error::MalformedInput { reason, .. } => Error::MalformedInput {
                field: name,
                reason,
            },
            Error::InvalidLength {
                expected, actual, ..
            } => Error::InvalidLength {
                field: name,
                expected,
                actual,
            },
            Error::ChecksumMismatch { .. } => Error::ChecksumMismatch { field: name },
            Error::VersionMismatch {
                expected, actual, ..
            } => Error::VersionMismatch {
                field: name,
                expected,
                actual,
            },
            Error::OutOfRange { .. } => Error::OutOfRange { field: name },
            other => other,
        }
    }

    /// Short machine-friendly name of the failure kind, for CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MalformedInput { .. } => "MalformedInput",
            Error::InvalidLength { .. } => "InvalidLength",
            Error::ChecksumMismatch { .. } => "ChecksumMismatch",
            Error::VersionMismatch { .. } => "VersionMismatch",
            Error::UnknownCurveTag { .. } => "UnknownCurveTag",
            Error::UnrecognizedRecoveryByte(_) => "UnrecognizedRecoveryByte",
            Error::OutOfRange { .. } => "OutOfRange",
            Error::InvalidRecoveryId(_) => "InvalidRecoveryId",
            Error::NoValidCandidate => "NoValidCandidate",
            Error::UnsupportedHashAlgorithm(_) => "UnsupportedHashAlgorithm",
            Error::UnsupportedEncoding(_) => "UnsupportedEncoding",
            Error::SignerMismatch => "SignerMismatch",
            Error::SigningFailed(_) => "SigningFailed",
            Error::Entropy(_) => "Entropy",
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
