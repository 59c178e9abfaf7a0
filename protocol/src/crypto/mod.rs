//! # Cryptographic Primitives
//!
//! Everything between a secret string and a signature:
//!
//! - **strkey** — Stellar's base-32 key text with version byte and CRC-16.
//! - **keys** — Ed25519 keypairs decoded from seeds, public keys, signatures.
//! - **hash** — SHA-256, network ids.
//! - **signatures** — verification of raw signatures pulled from envelopes.
//!
//! Nothing here is novel cryptography. These are type-safe wrappers around
//! audited implementations plus the encoding rules Stellar layers on top.

pub mod hash;
pub mod keys;
pub mod signatures;
pub mod strkey;

pub use hash::{network_id, sha256};
pub use keys::{StellarKeypair, StellarPublicKey, StellarSignature};
pub use signatures::verify_raw;
pub use strkey::{
    decode_account_id, decode_check, decode_seed, encode_account_id, encode_check, StrkeyError,
    VersionByte,
};
