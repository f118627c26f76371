//! # CLI Interface
//!
//! Defines the command-line argument structure for `keybridge` using `clap`
//! derive. Subcommands: `generate`, `convert-key`, `sign`, `recover`,
//! `bridge` and `version`.
//!
//! Secrets can come from the environment (`KEYBRIDGE_PRIVATE_KEY`) so they
//! stay out of shell history.

use clap::{Args, Parser, Subcommand};

use keybridge_core::{Encoding, HashAlgorithm};

/// Convert, sign and recover secp256k1 keys across Ethereum and EOS encodings.
#[derive(Parser, Debug)]
#[command(
    name = "keybridge",
    about = "secp256k1 key and signature bridge between Ethereum and EOS encodings",
    version,
    propagate_version = true
)]
pub struct KeyBridgeCli {
    /// Print results as JSON instead of aligned text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log output format: `pretty` or `json`. Logs always go to stderr.
    #[arg(long, global = true, env = "KEYBRIDGE_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, global = true, env = "KEYBRIDGE_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the `keybridge` binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a fresh key pair and print it in every form.
    Generate,
    /// Print a private or public key in every form it can take.
    ConvertKey(ConvertKeyArgs),
    /// Sign a message and print the signature.
    Sign(SignArgs),
    /// Recover the signer of a message from its signature.
    Recover(RecoverArgs),
    /// Sign under both ecosystems and check that each recovers the signer.
    Bridge(BridgeArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `convert-key` subcommand.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ConvertKeyArgs {
    /// Private key: `0x` hex, WIF, or `PVT_K1_…`.
    #[arg(long, env = "KEYBRIDGE_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Public key: `0x` hex (optionally `04`-tagged), `EOS…`, or `PUB_K1_…`.
    #[arg(long)]
    pub public_key: Option<String>,
}

/// Arguments for the `sign` subcommand.
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Private key: `0x` hex, WIF, or `PVT_K1_…`.
    #[arg(long, env = "KEYBRIDGE_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Message to sign, taken as UTF-8 bytes.
    #[arg(long, short = 'm')]
    pub message: String,

    /// Signature form: `ethereum` (hex, v = recid + 27) or `eos` (`SIG_K1_…`).
    #[arg(long, short = 'e', env = "KEYBRIDGE_ENCODING", default_value = "ethereum")]
    pub encoding: Encoding,

    /// Message hash: `keccak256` or `sha256`.
    #[arg(long, env = "KEYBRIDGE_HASH", default_value = "keccak256")]
    pub hash: HashAlgorithm,
}

/// Arguments for the `recover` subcommand.
#[derive(Args, Debug)]
pub struct RecoverArgs {
    /// Signature: hex triple or `SIG_K1_…`, matching `--encoding`.
    #[arg(long, short = 's')]
    pub signature: String,

    /// The signed message, taken as UTF-8 bytes.
    #[arg(long, short = 'm')]
    pub message: String,

    /// Signature form and the form the signer is printed in.
    #[arg(long, short = 'e', env = "KEYBRIDGE_ENCODING", default_value = "ethereum")]
    pub encoding: Encoding,

    /// Message hash: `keccak256` or `sha256`.
    #[arg(long, env = "KEYBRIDGE_HASH", default_value = "keccak256")]
    pub hash: HashAlgorithm,

    /// Fail unless the recovered signer is this public key (any form).
    #[arg(long)]
    pub expect: Option<String>,
}

/// Arguments for the `bridge` subcommand.
#[derive(Args, Debug)]
pub struct BridgeArgs {
    /// Private key in any form. A fresh key is generated when omitted.
    #[arg(long, env = "KEYBRIDGE_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Message to sign under both ecosystems.
    #[arg(long, short = 'm', default_value = "EOS can handle ETH signatures")]
    pub message: String,
}
