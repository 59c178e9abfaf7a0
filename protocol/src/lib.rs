// Copyright (c) 2026 Stellar Signer Contributors. MIT License.
// See LICENSE for details.

//! # Stellar Signer — Core Library
//!
//! Signs Stellar transaction envelopes with an Ed25519 secret seed, for a
//! chosen network, inside an automation pipeline. It does one thing: take
//! an unsigned (or partly signed) envelope and hand back the same envelope
//! with one more signature on it. No network calls, no submission, no
//! account lookups.
//!
//! ## Architecture
//!
//! - **crypto** — Strkey codec, keypairs, SHA-256, Ed25519 sign/verify.
//! - **network** — `mainnet` / `testnet` selectors and their passphrases.
//! - **transaction** — Envelope codec, signature payload, signer, verifier.
//! - **pipeline** — Batch processing with strict or tolerant failure handling.
//! - **config** — Protocol constants: passphrases, version bytes, limits.
//! - **error** — `SignerError` and `BatchError`.
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use stellar_signer::pipeline::{process_items, FailureMode};
//!
//! let items = vec![json!({ "xdr": "", "network": "testnet" })];
//! let out = process_items(
//!     &items,
//!     "SAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAABSU2",
//!     FailureMode::ContinueOnFail,
//! )
//! .unwrap();
//! assert!(!out[0].is_success());
//! ```
//!
//! ## Ground Rules
//!
//! 1. The secret seed never leaves the keypair: not in logs, errors, or output.
//! 2. Inputs are never mutated. Signing returns a new envelope.
//! 3. Unknown networks are an error, never a default.

pub mod config;
pub mod crypto;
pub mod error;
pub mod network;
pub mod pipeline;
pub mod transaction;

pub use crypto::{StellarKeypair, StellarPublicKey};
pub use error::{BatchError, ErrorKind, SignerError};
pub use network::{resolve_network, Network};
pub use pipeline::{process_items, process_items_with_network, FailureMode, ItemOutput};
pub use transaction::{decode_envelope, encode_envelope, sign_envelope, sign_xdr, Envelope};
