//! Signature payload and transaction hash.
//!
//! What gets signed is never the envelope itself but
//!
//! ```text
//! SHA-256( network_id || envelope_type (u32 BE) || XDR(body) )
//! ```
//!
//! where `network_id = SHA-256(passphrase)`. Binding the network id into
//! the preimage is what stops a testnet signature from being replayed on
//! mainnet. Legacy v0 bodies are lifted to v1 form first, so a v0 envelope
//! and its v1 equivalent share one hash.

use stellar_xdr::curr::{Limits, Transaction, TransactionEnvelope, WriteXdr};

use crate::config::{ENVELOPE_TYPE_TX, ENVELOPE_TYPE_TX_FEE_BUMP, HASH_LENGTH};
use crate::crypto::hash::{network_id, sha256};
use crate::error::Result;

use super::envelope::Envelope;

/// The exact bytes hashed to produce the transaction hash.
///
/// # Errors
///
/// [`SignerError::MalformedXdr`](crate::error::SignerError::MalformedXdr)
/// if the body cannot be re-encoded.
pub fn signature_payload(envelope: &Envelope, passphrase: &str) -> Result<Vec<u8>> {
    let (tag, body) = match envelope.as_xdr_envelope() {
        TransactionEnvelope::TxV0(env) => {
            let lifted: Transaction = env.tx.clone().into();
            (ENVELOPE_TYPE_TX, lifted.to_xdr(Limits::none())?)
        }
        TransactionEnvelope::Tx(env) => (ENVELOPE_TYPE_TX, env.tx.to_xdr(Limits::none())?),
        TransactionEnvelope::TxFeeBump(env) => {
            (ENVELOPE_TYPE_TX_FEE_BUMP, env.tx.to_xdr(Limits::none())?)
        }
    };

    let mut payload = Vec::with_capacity(HASH_LENGTH + 4 + body.len());
    payload.extend_from_slice(&network_id(passphrase));
    payload.extend_from_slice(&tag.to_be_bytes());
    payload.extend_from_slice(&body);
    Ok(payload)
}

/// `SHA-256` of [`signature_payload`]. This is what the network calls the
/// transaction hash and what every signer signs.
pub fn transaction_hash(envelope: &Envelope, passphrase: &str) -> Result<[u8; HASH_LENGTH]> {
    Ok(sha256(&signature_payload(envelope, passphrase)?))
}
