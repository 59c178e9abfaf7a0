//! Transaction signing with Ed25519 keypairs.
//!
//! Signing computes the network-bound transaction hash, signs it, and
//! appends a decorated signature (hint + signature) to a copy of the
//! envelope. Existing signatures are kept in order; nothing already on the
//! envelope is touched or deduplicated. Signing the same envelope twice
//! with the same key therefore yields two identical entries, which is
//! harmless on the network and cheaper than guessing at caller intent.

use std::fmt;

use stellar_xdr::curr::{DecoratedSignature, Signature, SignatureHint};
use tracing::debug;

use crate::config::HASH_LENGTH;
use crate::crypto::keys::{StellarKeypair, StellarPublicKey};
use crate::error::{Result, SignerError};

use super::envelope::{decode_envelope, encode_envelope, Envelope};
use super::payload::transaction_hash;

/// The outcome of signing one envelope.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    envelope: Envelope,
    hash: [u8; HASH_LENGTH],
    public_key: StellarPublicKey,
}

impl SignedTransaction {
    /// The envelope with the new signature appended.
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn into_envelope(self) -> Envelope {
        self.envelope
    }

    /// The transaction hash that was signed.
    pub fn hash(&self) -> &[u8; HASH_LENGTH] {
        &self.hash
    }

    /// Lowercase hex of [`hash`](Self::hash), as block explorers show it.
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// The signer's public key.
    pub fn public_key(&self) -> &StellarPublicKey {
        &self.public_key
    }

    /// The signed envelope as base-64 text.
    pub fn to_xdr(&self) -> Result<String> {
        encode_envelope(&self.envelope)
    }
}

impl fmt::Debug for SignedTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedTransaction")
            .field("version", &self.envelope.version())
            .field("hash", &self.hash_hex())
            .field("public_key", &self.public_key.to_address())
            .field("signatures", &self.envelope.signature_count())
            .finish()
    }
}

/// Sign `envelope` for the network identified by `passphrase`.
///
/// The input is left unchanged; the returned [`SignedTransaction`] holds a
/// new envelope with exactly one more signature.
///
/// # Errors
///
/// - [`SignerError::TooManySignatures`] if the envelope already carries 20.
/// - [`SignerError::MalformedXdr`] if the body cannot be re-encoded.
pub fn sign_envelope(
    envelope: &Envelope,
    keypair: &StellarKeypair,
    passphrase: &str,
) -> Result<SignedTransaction> {
    let hash = transaction_hash(envelope, passphrase)?;
    let signature = keypair.sign(&hash);

    let decorated = DecoratedSignature {
        hint: SignatureHint(keypair.signature_hint()),
        signature: Signature(
            signature
                .as_bytes()
                .to_vec()
                .try_into()
                .map_err(|e: stellar_xdr::curr::Error| SignerError::SigningFailed(e.to_string()))?,
        ),
    };
    let signed = envelope.with_signature(decorated)?;

    let public_key = keypair.public_key();
    debug!(
        version = ?envelope.version(),
        operations = envelope.operation_count(),
        signatures = signed.signature_count(),
        signer = %public_key,
        hash = %hex::encode(hash),
        "envelope signed"
    );

    Ok(SignedTransaction {
        envelope: signed,
        hash,
        public_key,
    })
}

/// Decode, sign, and return in one step.
///
/// Checks run in a fixed order: empty XDR, then the secret, then the
/// envelope. A blank transaction is reported as such even when the secret
/// is also bad.
///
/// # Errors
///
/// [`SignerError::EmptyXdr`], any key decoding error from
/// [`StellarKeypair::from_secret`], [`SignerError::MalformedXdr`], or the
/// errors of [`sign_envelope`].
///
/// # Example
///
/// ```
/// use stellar_signer::transaction::sign_xdr;
/// use stellar_signer::SignerError;
///
/// let err = sign_xdr("SAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAABSU2", "  ", "x")
///     .unwrap_err();
/// assert_eq!(err, SignerError::EmptyXdr);
/// ```
pub fn sign_xdr(secret: &str, xdr: &str, passphrase: &str) -> Result<SignedTransaction> {
    if xdr.trim().is_empty() {
        return Err(SignerError::EmptyXdr);
    }
    let keypair = StellarKeypair::from_secret(secret)?;
    let envelope = decode_envelope(xdr)?;
    sign_envelope(&envelope, &keypair, passphrase)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
