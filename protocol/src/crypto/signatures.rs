//! # Digital Signatures
//!
//! Ed25519 verification of signatures as they sit in an envelope.
//!
//! Stellar signs the 32-byte transaction hash, never the raw envelope, so
//! the message checked here is always a digest.
//!
//! Verification uses ed25519-dalek's default (cofactorless) check, which is
//! what stellar-core does too. Being stricter than the validators would
//! reject signatures the network accepts.

use super::keys::{StellarPublicKey, StellarSignature};

/// Verify using raw byte components, as they come out of an envelope.
///
/// Signatures that are not exactly 64 bytes fail rather than panic; the
/// XDR schema allows up to 64, so a short one is well-formed on the wire
/// and simply invalid.
pub fn verify_raw(public_key: &[u8; 32], message: &[u8], signature: &[u8]) -> bool {
    match StellarSignature::try_from_slice(signature) {
        Some(sig) => StellarPublicKey::from_bytes(*public_key).verify(message, &sig),
        None => false,
    }
}
