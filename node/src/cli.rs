//! # CLI Interface
//!
//! Defines the command-line argument structure for `stellar-signer-node`
//! using `clap` derive. Supports four subcommands: `sign`, `address`,
//! `serve`, and `version`.
//!
//! The secret seed is deliberately not a flag. It comes from
//! `STELLAR_SECRET_KEY` or a file, so it never shows up in shell history or
//! `ps` output.

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

use stellar_signer::config::DEFAULT_NETWORK_SELECTOR;
use stellar_signer::Network;

use crate::logging::LogFormat;

/// Stellar transaction signer.
///
/// Signs base-64 XDR transaction envelopes with a Stellar secret seed for
/// mainnet or testnet, either as a one-shot batch or as a small HTTP
/// service for workflow engines.
#[derive(Parser, Debug)]
#[command(
    name = "stellar-signer-node",
    about = "Stellar transaction envelope signer",
    version,
    propagate_version = true
)]
pub struct SignerCli {
    /// Log output format.
    #[arg(
        long,
        global = true,
        value_enum,
        env = "STELLAR_SIGNER_LOG_FORMAT",
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign a JSON array of items and print the results.
    Sign(SignArgs),
    /// Print the public address of the configured secret.
    Address(CredentialArgs),
    /// Serve the signing API over HTTP.
    Serve(ServeArgs),
    /// Print version information and exit.
    Version,
}

/// Where the secret comes from when `STELLAR_SECRET_KEY` is not set.
#[derive(Args, Debug)]
pub struct CredentialArgs {
    /// File holding the `S...` secret seed. Surrounding whitespace is ignored.
    #[arg(long, env = "STELLAR_SECRET_KEY_FILE")]
    pub secret_key_file: Option<PathBuf>,
}

/// Arguments for the `sign` subcommand.
#[derive(Args, Debug)]
pub struct SignArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// JSON file with an array of items (`{"xdr": ..., "network": ...}`).
    /// Reads stdin when omitted.
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Network for items that don't name one.
    #[arg(
        long,
        short = 'n',
        env = "STELLAR_SIGNER_NETWORK",
        default_value = DEFAULT_NETWORK_SELECTOR
    )]
    pub network: Network,

    /// Record failures on the item and keep going instead of aborting.
    #[arg(long)]
    pub continue_on_fail: bool,
}

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Address to listen on.
    #[arg(long, env = "STELLAR_SIGNER_LISTEN", default_value = "127.0.0.1:9750")]
    pub listen: SocketAddr,

    /// Network for items that don't name one.
    #[arg(
        long,
        short = 'n',
        env = "STELLAR_SIGNER_NETWORK",
        default_value = DEFAULT_NETWORK_SELECTOR
    )]
    pub network: Network,
}
