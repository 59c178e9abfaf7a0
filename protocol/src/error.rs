//! Error types for the signer.
//!
//! Every fallible operation in this crate returns a [`SignerError`]. All of
//! them are caused by bad input and are deterministic: retrying with the
//! same arguments fails the same way. Messages never contain key material.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::strkey::StrkeyError;

/// Errors surfaced by seed decoding, envelope decoding, and signing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    /// Not valid base-32, or the decoded length is wrong.
    #[error("invalid strkey encoding")]
    InvalidEncoding,

    /// The trailing CRC-16 does not match the version byte and payload.
    #[error("invalid strkey checksum")]
    InvalidChecksum,

    /// The version byte names a different key type than the one expected.
    #[error("wrong key type: expected {expected}, found {found}")]
    WrongKeyType {
        /// What the caller asked for (e.g. "secret seed").
        expected: &'static str,
        /// What the version byte actually says.
        found: &'static str,
    },

    /// Base-64 or XDR structure could not be decoded.
    #[error("malformed transaction XDR: {0}")]
    MalformedXdr(String),

    /// The XDR input was empty or whitespace.
    #[error("Transaction XDR is required")]
    EmptyXdr,

    /// The network selector is neither `mainnet` nor `testnet`.
    #[error("unknown network '{0}': expected 'mainnet' or 'testnet'")]
    UnknownNetwork(String),

    /// The envelope already carries the maximum number of signatures.
    #[error("envelope already carries {max} signatures")]
    TooManySignatures {
        /// The schema limit.
        max: usize,
    },

    /// Anything unexpected inside the cryptographic primitives.
    #[error("signing failed: {0}")]
    SigningFailed(String),
}

/// Flat, serializable classification of a [`SignerError`].
///
/// This is what per-item error records carry across the host boundary, so
/// callers can branch on the kind without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidEncoding,
    InvalidChecksum,
    WrongKeyType,
    MalformedXdr,
    EmptyXdr,
    UnknownNetwork,
    TooManySignatures,
    SigningFailed,
}

impl SignerError {
    /// The flat kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SignerError::InvalidEncoding => ErrorKind::InvalidEncoding,
            SignerError::InvalidChecksum => ErrorKind::InvalidChecksum,
            SignerError::WrongKeyType { .. } => ErrorKind::WrongKeyType,
            SignerError::MalformedXdr(_) => ErrorKind::MalformedXdr,
            SignerError::EmptyXdr => ErrorKind::EmptyXdr,
            SignerError::UnknownNetwork(_) => ErrorKind::UnknownNetwork,
            SignerError::TooManySignatures { .. } => ErrorKind::TooManySignatures,
            SignerError::SigningFailed(_) => ErrorKind::SigningFailed,
        }
    }
}

impl From<StrkeyError> for SignerError {
    fn from(err: StrkeyError) -> Self {
        match err {
            StrkeyError::InvalidEncoding => SignerError::InvalidEncoding,
            StrkeyError::InvalidChecksum => SignerError::InvalidChecksum,
            StrkeyError::WrongVersion { expected, found } => SignerError::WrongKeyType {
                expected: expected.describe(),
                found: found.describe(),
            },
        }
    }
}

impl From<stellar_xdr::curr::Error> for SignerError {
    fn from(err: stellar_xdr::curr::Error) -> Self {
        SignerError::MalformedXdr(err.to_string())
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SignerError>;

/// Errors that abort a whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    /// No secret was supplied. Checked before any item is looked at.
    #[error("Stellar wallet credentials are required")]
    MissingCredentials,

    /// An item failed in strict mode.
    #[error("item {index}: {source}")]
    Item {
        index: usize,
        #[source]
        source: SignerError,
    },

    /// An item is not a JSON object, so there is nothing to merge into.
    #[error("item {index} is not a JSON object: {reason}")]
    InvalidItem { index: usize, reason: String },
}

impl BatchError {
    /// Index of the offending item, when there is one.
    pub fn item_index(&self) -> Option<usize> {
        match self {
            BatchError::MissingCredentials => None,
            BatchError::Item { index, .. } | BatchError::InvalidItem { index, .. } => Some(*index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::strkey::VersionByte;

    #[test]
    fn strkey_errors_map_to_kinds() {
        let err: SignerError = StrkeyError::InvalidChecksum.into();
        assert_eq!(err.kind(), ErrorKind::InvalidChecksum);

        let err: SignerError = StrkeyError::WrongVersion {
            expected: VersionByte::Seed,
            found: VersionByte::AccountId,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::WrongKeyType);
        assert_eq!(
            err.to_string(),
            "wrong key type: expected secret seed, found public key"
        );
    }

    #[test]
    fn empty_xdr_message_matches_node_contract() {
        assert_eq!(SignerError::EmptyXdr.to_string(), "Transaction XDR is required");
    }

    #[test]
    fn batch_error_names_the_item() {
        let err = BatchError::Item {
            index: 2,
            source: SignerError::EmptyXdr,
        };
        assert_eq!(err.item_index(), Some(2));
        assert_eq!(err.to_string(), "item 2: Transaction XDR is required");
        assert_eq!(BatchError::MissingCredentials.item_index(), None);
    }

    #[test]
    fn error_kind_serializes_as_variant_name() {
        let json = serde_json::to_string(&ErrorKind::MalformedXdr).unwrap();
        assert_eq!(json, "\"MalformedXdr\"");
    }
}
