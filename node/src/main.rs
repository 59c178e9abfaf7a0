// Copyright (c) 2026 Stellar Signer Contributors. MIT License.
// See LICENSE for details.

//! # Stellar Signer Node
//!
//! Entry point for the `stellar-signer-node` binary. Parses CLI arguments,
//! loads the secret, initializes logging, and runs the chosen subcommand.
//!
//! - `sign`    — sign a JSON array of items from a file or stdin
//! - `address` — print the public address of the configured secret
//! - `serve`   — serve the signing API over HTTP
//! - `version` — print build version information

mod api;
mod cli;
mod credentials;
mod logging;
mod metrics;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use std::io::Read;
use std::sync::Arc;
use tokio::signal;
use zeroize::Zeroizing;

use stellar_signer::pipeline::{process_items_with_network, FailureMode};
use stellar_signer::StellarKeypair;

use cli::{Commands, SignerCli};
use logging::{LogFormat, DEFAULT_FILTER};
use metrics::NodeMetrics;

fn main() -> Result<()> {
    let cli = SignerCli::parse();

    match cli.command {
        Commands::Sign(args) => sign_items(args, cli.log_format),
        Commands::Address(args) => print_address(args),
        Commands::Serve(args) => {
            // Read the secret before any runtime threads exist; loading
            // clears it from the environment.
            let secret = credentials::load_secret(args.credentials.secret_key_file.as_deref())?;
            logging::init_logging(DEFAULT_FILTER, cli.log_format);
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("failed to start tokio runtime")?
                .block_on(serve(args, secret))
        }
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Signs a batch from a file or stdin and prints the outputs as JSON.
fn sign_items(args: cli::SignArgs, log_format: LogFormat) -> Result<()> {
    let secret = credentials::load_secret(args.credentials.secret_key_file.as_deref())?;
    logging::init_logging(DEFAULT_FILTER, log_format);

    let raw = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read items from stdin")?;
            buf
        }
    };
    let items: Vec<Value> =
        serde_json::from_str(&raw).context("input must be a JSON array of items")?;

    let mode = FailureMode::from_continue_on_fail(args.continue_on_fail);
    let outputs = process_items_with_network(&items, &secret, mode, args.network)?;

    let failed = outputs.iter().filter(|o| !o.is_success()).count();
    tracing::info!(items = outputs.len(), failed, "batch complete");

    println!(
        "{}",
        serde_json::to_string_pretty(&outputs).context("failed to encode outputs")?
    );
    Ok(())
}

/// Prints the `G...` address for the configured secret.
fn print_address(args: cli::CredentialArgs) -> Result<()> {
    let secret = credentials::load_secret(args.secret_key_file.as_deref())?;
    let keypair = StellarKeypair::from_secret(&secret).context("invalid secret key")?;
    println!("{}", keypair.address());
    Ok(())
}

/// Runs the HTTP API until SIGINT or SIGTERM.
async fn serve(args: cli::ServeArgs, secret: Zeroizing<String>) -> Result<()> {
    // Fail at startup rather than on every request.
    let keypair = StellarKeypair::from_secret(&secret).context("invalid secret key")?;
    let public_key = keypair.address();
    drop(keypair);

    let node_metrics = Arc::new(NodeMetrics::new().context("failed to register metrics")?);

    let app_state = api::AppState::new(
        env!("CARGO_PKG_VERSION").to_string(),
        public_key.clone(),
        args.network,
        secret,
        node_metrics,
    );
    let router = api::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("failed to bind listener on {}", args.listen))?;
    tracing::info!(
        listen = %args.listen,
        network = %args.network,
        public_key = %public_key,
        "stellar-signer-node serving"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("stellar-signer-node stopped");
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("stellar-signer-node {}", env!("CARGO_PKG_VERSION"));
    println!("stellar-signer      {}", stellar_signer::config::SIGNER_VERSION);
    println!("networks            mainnet, testnet");
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported. If a handler cannot be
/// installed, that signal is ignored and the other one still works.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received, draining connections");
}
