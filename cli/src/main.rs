// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # KeyBridge CLI
//!
//! Entry point for the `keybridge` binary. Parses CLI arguments, initializes
//! logging, and runs one conversion/sign/recover step per invocation.
//!
//! The binary supports six subcommands:
//!
//! - `generate`: fresh key pair in every form
//! - `convert-key`: re-encode a private or public key
//! - `sign`: sign a message under Ethereum or EOS rules
//! - `recover`: recover (and optionally check) a signer
//! - `bridge`: sign under both and cross-check recovery
//! - `version`: print build version information
//!
//! Results go to stdout, logs and errors to stderr. Any failure exits with
//! status 1 after printing the error kind and the offending field.

mod cli;
mod logging;

use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;

use keybridge_core::bridge::{cross_validate, generate_identity, recover_signer, sign_message};
use keybridge_core::config::{CurveTag, WIF_VERSION};
use keybridge_core::{Encoding, KeyMaterial, PublicKey};

use cli::{Commands, KeyBridgeCli};
use logging::LogFormat;

fn main() -> ExitCode {
    let cli = KeyBridgeCli::parse();
    logging::init_logging(&cli.log_level, LogFormat::from_str_lossy(&cli.log_format));

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let kind = err
                .chain()
                .find_map(|cause| cause.downcast_ref::<keybridge_core::Error>())
                .map(keybridge_core::Error::kind)
                .unwrap_or("error");
            tracing::error!(kind, "{err:#}");
            eprintln!("{kind}: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: KeyBridgeCli) -> Result<()> {
    let json = cli.json;
    match cli.command {
        Commands::Generate => {
            let identity = generate_identity().context("failed to generate key pair")?;
            emit(json, &identity, |id| {
                vec![
                    ("private key (hex)", id.private_key_hex.clone()),
                    ("private key (wif)", id.private_key_wif.clone()),
                    ("public key (hex)", id.public_key_hex.clone()),
                    ("public key (eos)", id.public_key_eos.clone()),
                    ("address", id.address.clone()),
                ]
            })
        }
        Commands::ConvertKey(args) => {
            let forms = match (args.private_key, args.public_key) {
                (Some(text), _) => {
                    let key = KeyMaterial::parse_private_key(&text)
                        .context("failed to parse --private-key")?;
                    KeyForms::from_private(&key)
                }
                (None, Some(text)) => {
                    let public_key =
                        PublicKey::parse(&text).context("failed to parse --public-key")?;
                    KeyForms::from_public(&public_key)
                }
                (None, None) => bail!("one of --private-key or --public-key is required"),
            };
            emit(json, &forms, KeyForms::rows)
        }
        Commands::Sign(args) => {
            tracing::info!(encoding = %args.encoding, hash = %args.hash, "signing message");
            let signature = sign_message(
                &args.private_key,
                args.message.as_bytes(),
                args.encoding,
                args.hash,
            )
            .context("failed to sign message")?;
            emit(json, &SignOutput { signature }, |out| {
                vec![("signature", out.signature.clone())]
            })
        }
        Commands::Recover(args) => {
            let signer = recover_signer(
                &args.signature,
                args.message.as_bytes(),
                args.encoding,
                args.hash,
            )
            .context("failed to recover signer from --signature")?;

            let matches = match &args.expect {
                Some(text) => {
                    let expected =
                        PublicKey::parse(text).context("failed to parse --expect")?;
                    let recovered = PublicKey::parse(&signer)
                        .context("recovered signer did not re-parse")?;
                    if recovered != expected {
                        return Err(keybridge_core::Error::SignerMismatch)
                            .context("signature does not match --expect");
                    }
                    Some(true)
                }
                None => None,
            };

            emit(json, &RecoverOutput { signer, matches }, |out| {
                vec![("signer", out.signer.clone())]
            })
        }
        Commands::Bridge(args) => {
            let key = match &args.private_key {
                Some(text) => KeyMaterial::parse_private_key(text)
                    .context("failed to parse --private-key")?,
                None => KeyMaterial::generate().context("failed to generate key pair")?,
            };
            let report = cross_validate(&key, args.message.as_bytes())
                .context("cross-validation failed")?;
            tracing::info!(consistent = report.consistent, "bridge finished");

            emit(json, &report, |r| {
                vec![
                    ("message hash", r.digest.clone()),
                    ("public key (hex)", r.public_key_hex.clone()),
                    ("public key (eos)", r.public_key_eos.clone()),
                    ("address", r.address.clone()),
                    ("eth signature", r.eth_signature.clone()),
                    ("eos signature", r.eos_signature.clone()),
                    ("eos message signature", r.eos_message_signature.clone()),
                    ("eth recovered", r.eth_recovered.clone()),
                    ("eos recovered", r.eos_recovered.clone()),
                    ("eos message recovered", r.eos_message_recovered.clone()),
                    ("consistent", r.consistent.to_string()),
                ]
            })?;

            if !report.consistent {
                bail!("recovered keys do not match the signer");
            }
            Ok(())
        }
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SignOutput {
    signature: String,
}

#[derive(Serialize)]
struct RecoverOutput {
    signer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    matches: Option<bool>,
}

/// Every text form of a key. Private forms are absent when only the public
/// key was given.
#[derive(Serialize)]
struct KeyForms {
    #[serde(skip_serializing_if = "Option::is_none")]
    private_key_hex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    private_key_wif: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    private_key_k1: Option<String>,
    public_key_hex: String,
    public_key_eos: String,
    public_key_k1: String,
    address: String,
}

impl KeyForms {
    fn from_private(key: &KeyMaterial) -> Self {
        Self {
            private_key_hex: Some(key.to_hex_private_key()),
            private_key_wif: Some(key.to_checked_private_key(WIF_VERSION)),
            private_key_k1: Some(key.to_tagged_private_key(CurveTag::K1)),
            ..Self::from_public(key.public_key())
        }
    }

    fn from_public(public_key: &PublicKey) -> Self {
        Self {
            private_key_hex: None,
            private_key_wif: None,
            private_key_k1: None,
            public_key_hex: public_key.to_hex(),
            public_key_eos: public_key.to_eos(),
            public_key_k1: public_key.to_tagged(CurveTag::K1),
            address: public_key.eth_address(),
        }
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        let private = [
            ("private key (hex)", &self.private_key_hex),
            ("private key (wif)", &self.private_key_wif),
            ("private key (k1)", &self.private_key_k1),
        ];
        private
            .into_iter()
            .filter_map(|(label, value)| value.clone().map(|v| (label, v)))
            .chain([
                ("public key (hex)", self.public_key_hex.clone()),
                ("public key (eos)", self.public_key_eos.clone()),
                ("public key (k1)", self.public_key_k1.clone()),
                ("address", self.address.clone()),
            ])
            .collect()
    }
}

/// Prints `value` as pretty JSON, or as aligned `label : value` rows.
fn emit<T, F>(json: bool, value: &T, rows: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> Vec<(&'static str, String)>,
{
    if json {
        let text = serde_json::to_string_pretty(value).context("failed to serialize output")?;
        println!("{text}");
        return Ok(());
    }

    let rows = rows(value);
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in rows {
        println!("{label:<width$} : {value}");
    }
    Ok(())
}

/// Prints version information.
fn print_version() {
    println!("keybridge {}", env!("CARGO_PKG_VERSION"));
    println!("curves    {}", CurveTag::K1);
    println!(
        "formats   {} (hex, v+27), {} (WIF 0x{WIF_VERSION:02x}, SIG_K1_)",
        Encoding::Ethereum,
        Encoding::Eos
    );
    println!("rustc     {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY_HEX: &str = "0x95040f2b28c185eb630d61665369b3a70e2c2d2819d84aa58998e4a4de9e5899";

    #[test]
    fn key_forms_from_private_include_everything() {
        let key = KeyMaterial::from_hex_private_key(TEST_KEY_HEX).unwrap();
        let forms = KeyForms::from_private(&key);
        let rows = forms.rows();
        assert_eq!(rows.len(), 7);
        assert_eq!(
            forms.private_key_wif.as_deref(),
            Some("5JwuzTsHk4cN2Pekt8vsBWyGZqSGVAefw6QFLH31pxCzpq9jEdd")
        );
        assert_eq!(
            forms.public_key_eos,
            "EOS6knoMaegPrRuE2b6uNRkkXRkpRGWx2rnaxHcyJkHrfrrv5rQEi"
        );
    }

    #[test]
    fn key_forms_from_public_omit_secrets() {
        let key = KeyMaterial::from_hex_private_key(TEST_KEY_HEX).unwrap();
        let forms = KeyForms::from_public(key.public_key());
        assert_eq!(forms.rows().len(), 4);

        let json = serde_json::to_value(&forms).unwrap();
        assert!(json.get("private_key_hex").is_none());
        assert_eq!(json["address"], "0x8619bc7ca937A37aE54346A88545edC083cccb2C");
    }

    #[test]
    fn recover_output_skips_unset_match() {
        let out = RecoverOutput {
            signer: "EOS…".into(),
            matches: None,
        };
        let json = serde_json::to_value(&out).unwrap();
        assert!(json.get("matches").is_none());
    }
}
