//! Network selection.
//!
//! Callers pick a network by name; the signer only ever sees the
//! passphrase. Only `mainnet` and `testnet` are named here. An unknown
//! selector is an error, never a silent fallback to some default network,
//! since signing for the wrong network produces a transaction that can
//! never be submitted where the user meant it to go.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::{
    passphrase_for_selector, MAINNET_SELECTOR, PUBLIC_NETWORK_PASSPHRASE, TESTNET_NETWORK_PASSPHRASE,
    TESTNET_SELECTOR,
};
use crate::crypto::hash::network_id;
use crate::error::SignerError;

/// A named Stellar network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// The public network. Default, matching the workflow node.
    #[default]
    Mainnet,
    /// The SDF test network.
    Testnet,
}

impl Network {
    /// The passphrase mixed into every signature payload.
    pub fn passphrase(self) -> &'static str {
        match self {
            Network::Mainnet => PUBLIC_NETWORK_PASSPHRASE,
            Network::Testnet => TESTNET_NETWORK_PASSPHRASE,
        }
    }

    /// The selector string (`mainnet` / `testnet`).
    pub fn as_str(self) -> &'static str {
        match self {
            Network::Mainnet => MAINNET_SELECTOR,
            Network::Testnet => TESTNET_SELECTOR,
        }
    }

    /// `SHA-256(passphrase)`.
    pub fn network_id(self) -> [u8; 32] {
        network_id(self.passphrase())
    }
}

impl FromStr for Network {
    type Err = SignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            MAINNET_SELECTOR => Ok(Network::Mainnet),
            TESTNET_SELECTOR => Ok(Network::Testnet),
            other => Err(SignerError::UnknownNetwork(other.to_string())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a selector to its passphrase.
///
/// # Errors
///
/// [`SignerError::UnknownNetwork`] for anything but `mainnet` or `testnet`.
/// Matching is exact; `Mainnet` is unknown.
pub fn resolve_network(selector: &str) -> Result<&'static str, SignerError> {
    passphrase_for_selector(selector).ok_or_else(|| SignerError::UnknownNetwork(selector.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn resolves_both_networks() {
        assert_eq!(resolve_network("mainnet").unwrap(), PUBLIC_NETWORK_PASSPHRASE);
        assert_eq!(resolve_network("testnet").unwrap(), TESTNET_NETWORK_PASSPHRASE);
    }

    #[test]
    fn unknown_selector_is_rejected() {
        for selector in ["", "futurenet", "MAINNET", " testnet", "public"] {
            let err = resolve_network(selector).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnknownNetwork, "selector {selector:?}");
        }
    }

    #[test]
    fn parse_and_display_roundtrip() {
        for network in [Network::Mainnet, Network::Testnet] {
            assert_eq!(network.to_string().parse::<Network>().unwrap(), network);
            assert_eq!(resolve_network(network.as_str()).unwrap(), network.passphrase());
        }
    }

    #[test]
    fn serde_uses_selector_names() {
        assert_eq!(serde_json::to_string(&Network::Testnet).unwrap(), "\"testnet\"");
        let parsed: Network = serde_json::from_str("\"mainnet\"").unwrap();
        assert_eq!(parsed, Network::Mainnet);
        assert!(serde_json::from_str::<Network>("\"devnet\"").is_err());
    }

    #[test]
    fn default_is_mainnet() {
        assert_eq!(Network::default(), Network::Mainnet);
        assert_eq!(Network::default().as_str(), crate::config::DEFAULT_NETWORK_SELECTOR);
    }

    #[test]
    fn network_ids_differ() {
        assert_ne!(Network::Mainnet.network_id(), Network::Testnet.network_id());
    }
}
