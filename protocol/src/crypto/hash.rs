//! # Hashing Utilities
//!
//! SHA-256 is the only hash Stellar uses on the signing path: once to turn a
//! network passphrase into a network id, and once over the signature
//! payload to produce the transaction hash that actually gets signed.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 digest of `data`.
///
/// # Example
///
/// ```
/// use stellar_signer::crypto::sha256;
///
/// let hash = sha256(b"stellar");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// The network id for a passphrase: `SHA-256(passphrase as UTF-8)`.
///
/// Any string is accepted. Custom and standalone networks pick their own
/// passphrases and we have no business second-guessing them.
pub fn network_id(passphrase: &str) -> [u8; 32] {
    sha256(passphrase.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PUBLIC_NETWORK_PASSPHRASE, TESTNET_NETWORK_PASSPHRASE};

    #[test]
    fn sha256_empty_vector() {
        assert_eq!(
            hex::encode(sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn well_known_network_ids() {
        assert_eq!(
            hex::encode(network_id(TESTNET_NETWORK_PASSPHRASE)),
            "cee0302d59844d32bdca915c8203dd44b33fbb7edc19051ea37abedf28ecd472"
        );
        assert_eq!(
            hex::encode(network_id(PUBLIC_NETWORK_PASSPHRASE)),
            "7ac33997544e3175d266bd022439b22cdb16508c01163f26e5cb2a3e1045a979"
        );
    }

    #[test]
    fn arbitrary_passphrases_are_accepted() {
        let standalone = network_id("Standalone Network ; February 2017");
        assert_ne!(standalone, network_id(TESTNET_NETWORK_PASSPHRASE));
        assert_eq!(network_id(""), sha256(b""));
    }
}
