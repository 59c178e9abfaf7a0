//! Signature verification against an envelope.
//!
//! The network never tells you which key produced a signature; it gives
//! a four-byte hint and leaves the rest to you. Verification here mirrors
//! that: filter by hint, then check the Ed25519 signature over the
//! transaction hash for the given network.

use crate::crypto::keys::StellarPublicKey;
use crate::crypto::signatures::verify_raw;
use crate::error::Result;

use super::envelope::Envelope;
use super::payload::transaction_hash;

/// Whether `envelope` carries a valid signature by `public_key` for the
/// network identified by `passphrase`.
///
/// A signature made for another network does not count.
///
/// # Errors
///
/// Only if the transaction hash cannot be computed.
pub fn verify_signature(
    envelope: &Envelope,
    public_key: &StellarPublicKey,
    passphrase: &str,
) -> Result<bool> {
    let hash = transaction_hash(envelope, passphrase)?;
    Ok(has_signature_from(envelope, public_key, &hash))
}

/// The subset of `candidates` with a valid signature on `envelope`, in the
/// order given.
pub fn signers_matching<'a>(
    envelope: &Envelope,
    candidates: &'a [StellarPublicKey],
    passphrase: &str,
) -> Result<Vec<&'a StellarPublicKey>> {
    let hash = transaction_hash(envelope, passphrase)?;
    Ok(candidates
        .iter()
        .filter(|key| has_signature_from(envelope, key, &hash))
        .collect())
}

fn has_signature_from(envelope: &Envelope, public_key: &StellarPublicKey, hash: &[u8]) -> bool {
    let key = public_key.as_bytes();
    envelope
        .signatures()
        .iter()
        .filter(|sig| sig.hint_matches(key))
        .any(|sig| verify_raw(key, hash, &sig.signature))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PUBLIC_NETWORK_PASSPHRASE, TESTNET_NETWORK_PASSPHRASE};
    use crate::crypto::keys::StellarKeypair;
    use crate::transaction::{decode_envelope, sign_envelope};

    const V1_UNSIGNED: &str = "AAAAAgAAAADXWpgBgrEKt9VL/tPJZAc6DuFy89qmIyWvAhpo9wdRGgAAAGQAAAABAAAAAQAAAAEAAAAAAAAAAAAAAABlU/EAAAAAAAAAAAEAAAAAAAAAAQAAAADqSmxj4pxSCr71UHsTLsX5lUd2rr6+e5JCHuppFEbSLAAAAAAAAAAAAJiWgAAAAAAAAAAA";

    fn signed_by(seeds: &[[u8; 32]]) -> Envelope {
        let mut envelope = decode_envelope(V1_UNSIGNED).unwrap();
        for seed in seeds {
            let kp = StellarKeypair::from_seed(seed);
            envelope = sign_envelope(&envelope, &kp, TESTNET_NETWORK_PASSPHRASE)
                .unwrap()
                .into_envelope();
        }
        envelope
    }

    #[test]
    fn finds_own_signature() {
        let envelope = signed_by(&[[1u8; 32]]);
        let pk = StellarKeypair::from_seed(&[1u8; 32]).public_key();
        assert!(verify_signature(&envelope, &pk, TESTNET_NETWORK_PASSPHRASE).unwrap());
    }

    #[test]
    fn wrong_network_does_not_verify() {
        let envelope = signed_by(&[[1u8; 32]]);
        let pk = StellarKeypair::from_seed(&[1u8; 32]).public_key();
        assert!(!verify_signature(&envelope, &pk, PUBLIC_NETWORK_PASSPHRASE).unwrap());
    }

    #[test]
    fn unsigned_envelope_has_no_signers() {
        let envelope = signed_by(&[]);
        let pk = StellarKeypair::from_seed(&[1u8; 32]).public_key();
        assert!(!verify_signature(&envelope, &pk, TESTNET_NETWORK_PASSPHRASE).unwrap());
    }

    #[test]
    fn signers_matching_filters_candidates() {
        let envelope = signed_by(&[[1u8; 32], [3u8; 32]]);
        let candidates: Vec<StellarPublicKey> = [[1u8; 32], [2u8; 32], [3u8; 32]]
            .iter()
            .map(|s| StellarKeypair::from_seed(s).public_key())
            .collect();

        let found = signers_matching(&envelope, &candidates, TESTNET_NETWORK_PASSPHRASE).unwrap();
        assert_eq!(found, vec![&candidates[0], &candidates[2]]);
    }
}
