//! Transaction envelope codec.
//!
//! An envelope travels as base-64 text wrapping the XDR encoding of a
//! `TransactionEnvelope` union: the transaction body plus the signatures
//! collected so far. Three arms exist on the wire:
//!
//! | Discriminant | Arm        | Signed body                    |
//! |--------------|------------|--------------------------------|
//! | 0            | legacy v0  | `TransactionV0`, lifted to v1  |
//! | 2            | v1         | `Transaction`                  |
//! | 5            | fee bump   | `FeeBumpTransaction`           |
//!
//! The full schema (every operation type, Soroban payloads, preconditions)
//! is handled by `stellar-xdr`. This module owns the text boundary and the
//! handful of accessors the signer and its callers need.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use stellar_xdr::curr::{
    DecoratedSignature, FeeBumpTransactionInnerTx, Limits, MuxedAccount, Operation, ReadXdr,
    TransactionEnvelope, TransactionV1Envelope, VecM, WriteXdr,
};

use crate::config::{MAX_ENVELOPE_XDR_LEN, MAX_SIGNATURES, SIGNATURE_HINT_LENGTH, XDR_DEPTH_LIMIT};
use crate::crypto::strkey::encode_account_id;
use crate::error::{Result, SignerError};

/// Which arm of the envelope union we're holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EnvelopeVersion {
    /// Pre-protocol-13 envelope with a bare Ed25519 source.
    V0,
    /// The current envelope.
    V1,
    /// A fee-bump wrapping a v1 envelope.
    FeeBump,
}

/// A signature already attached to an envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedSignature {
    /// Last four bytes of the signer's public key.
    pub hint: [u8; SIGNATURE_HINT_LENGTH],
    /// Raw signature bytes. The schema allows up to 64; a valid Ed25519
    /// signature is exactly 64.
    pub signature: Vec<u8>,
}

impl AttachedSignature {
    /// Whether this signature could belong to `public_key`. Hints collide;
    /// a match only means "worth verifying".
    pub fn hint_matches(&self, public_key: &[u8; 32]) -> bool {
        public_key[32 - SIGNATURE_HINT_LENGTH..] == self.hint
    }
}

impl From<&DecoratedSignature> for AttachedSignature {
    fn from(sig: &DecoratedSignature) -> Self {
        Self {
            hint: sig.hint.0,
            signature: sig.signature.0.to_vec(),
        }
    }
}

/// A decoded transaction envelope.
///
/// Immutable: signing produces a new `Envelope` and leaves this one alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    inner: TransactionEnvelope,
}

impl Envelope {
    /// Wrap an already-built XDR envelope.
    pub fn from_xdr_envelope(inner: TransactionEnvelope) -> Self {
        Self { inner }
    }

    /// The underlying XDR value.
    pub fn as_xdr_envelope(&self) -> &TransactionEnvelope {
        &self.inner
    }

    pub fn version(&self) -> EnvelopeVersion {
        match &self.inner {
            TransactionEnvelope::TxV0(_) => EnvelopeVersion::V0,
            TransactionEnvelope::Tx(_) => EnvelopeVersion::V1,
            TransactionEnvelope::TxFeeBump(_) => EnvelopeVersion::FeeBump,
        }
    }

    /// The account that pays the fee, as a `G...` address.
    ///
    /// For fee-bumps that is the fee source, not the inner transaction's
    /// source. Muxed accounts are reported by their underlying key.
    pub fn source_account(&self) -> String {
        let key = match &self.inner {
            TransactionEnvelope::TxV0(env) => env.tx.source_account_ed25519.0,
            TransactionEnvelope::Tx(env) => muxed_key(&env.tx.source_account),
            TransactionEnvelope::TxFeeBump(env) => muxed_key(&env.tx.fee_source),
        };
        encode_account_id(&key)
    }

    /// Sequence number of the (inner) transaction.
    pub fn sequence_number(&self) -> i64 {
        match &self.inner {
            TransactionEnvelope::TxV0(env) => env.tx.seq_num.0,
            TransactionEnvelope::Tx(env) => env.tx.seq_num.0,
            TransactionEnvelope::TxFeeBump(env) => fee_bump_inner(&env.tx.inner_tx).tx.seq_num.0,
        }
    }

    /// The fee in stroops. For a fee-bump this is the outer fee.
    pub fn fee(&self) -> i64 {
        match &self.inner {
            TransactionEnvelope::TxV0(env) => i64::from(env.tx.fee),
            TransactionEnvelope::Tx(env) => i64::from(env.tx.fee),
            TransactionEnvelope::TxFeeBump(env) => env.tx.fee,
        }
    }

    pub fn operation_count(&self) -> usize {
        self.operations().len()
    }

    fn operations(&self) -> &VecM<Operation, 100> {
        match &self.inner {
            TransactionEnvelope::TxV0(env) => &env.tx.operations,
            TransactionEnvelope::Tx(env) => &env.tx.operations,
            TransactionEnvelope::TxFeeBump(env) => &fee_bump_inner(&env.tx.inner_tx).tx.operations,
        }
    }

    /// Signatures on the outer envelope, in order. A fee-bump's inner
    /// signatures belong to the inner transaction and are not listed.
    pub fn signatures(&self) -> Vec<AttachedSignature> {
        self.decorated_signatures().iter().map(AttachedSignature::from).collect()
    }

    pub fn signature_count(&self) -> usize {
        self.decorated_signatures().len()
    }

    pub(crate) fn decorated_signatures(&self) -> &VecM<DecoratedSignature, 20> {
        match &self.inner {
            TransactionEnvelope::TxV0(env) => &env.signatures,
            TransactionEnvelope::Tx(env) => &env.signatures,
            TransactionEnvelope::TxFeeBump(env) => &env.signatures,
        }
    }

    /// A copy of this envelope with `signature` appended.
    ///
    /// # Errors
    ///
    /// [`SignerError::TooManySignatures`] if the list is already full.
    pub(crate) fn with_signature(&self, signature: DecoratedSignature) -> Result<Envelope> {
        let mut signatures = self.decorated_signatures().to_vec();
        if signatures.len() >= MAX_SIGNATURES {
            return Err(SignerError::TooManySignatures { max: MAX_SIGNATURES });
        }
        signatures.push(signature);
        let signatures: VecM<DecoratedSignature, 20> = signatures
            .try_into()
            .map_err(|_| SignerError::TooManySignatures { max: MAX_SIGNATURES })?;

        let mut inner = self.inner.clone();
        match &mut inner {
            TransactionEnvelope::TxV0(env) => env.signatures = signatures,
            TransactionEnvelope::Tx(env) => env.signatures = signatures,
            TransactionEnvelope::TxFeeBump(env) => env.signatures = signatures,
        }
        Ok(Envelope { inner })
    }

    /// Encode back to base-64 text. Same as [`encode_envelope`].
    pub fn to_xdr_base64(&self) -> Result<String> {
        encode_envelope(self)
    }
}

impl std::str::FromStr for Envelope {
    type Err = SignerError;

    fn from_str(s: &str) -> Result<Self> {
        decode_envelope(s)
    }
}

fn muxed_key(account: &MuxedAccount) -> [u8; 32] {
    match account {
        MuxedAccount::Ed25519(key) => key.0,
        MuxedAccount::MuxedEd25519(muxed) => muxed.ed25519.0,
    }
}

fn fee_bump_inner(inner: &FeeBumpTransactionInnerTx) -> &TransactionV1Envelope {
    match inner {
        FeeBumpTransactionInnerTx::Tx(env) => env,
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Decode base-64 envelope text.
///
/// Leading and trailing whitespace is ignored; anything else that is not
/// canonical base-64 of exactly one envelope, with no trailing bytes, is
/// rejected.
///
/// # Errors
///
/// [`SignerError::MalformedXdr`] for oversized input, bad base-64, or XDR
/// that doesn't parse as a `TransactionEnvelope`.
///
/// # Example
///
/// ```
/// use stellar_signer::transaction::decode_envelope;
///
/// assert!(decode_envelope("not an envelope").is_err());
/// ```
pub fn decode_envelope(xdr: &str) -> Result<Envelope> {
    let text = xdr.trim();
    if text.len() > MAX_ENVELOPE_XDR_LEN {
        return Err(SignerError::MalformedXdr(format!(
            "envelope text is {} bytes, limit is {MAX_ENVELOPE_XDR_LEN}",
            text.len()
        )));
    }

    let bytes = STANDARD
        .decode(text)
        .map_err(|e| SignerError::MalformedXdr(format!("invalid base64: {e}")))?;

    let limits = Limits {
        depth: XDR_DEPTH_LIMIT,
        len: bytes.len(),
    };
    let inner = TransactionEnvelope::from_xdr(&bytes, limits)?;
    Ok(Envelope { inner })
}

/// Encode an envelope as canonical base-64 text (standard alphabet, padded).
///
/// # Errors
///
/// [`SignerError::MalformedXdr`] if the XDR writer refuses the value, which
/// only happens for envelopes built by hand with out-of-range contents.
pub fn encode_envelope(envelope: &Envelope) -> Result<String> {
    let bytes = envelope.inner.to_xdr(Limits::none())?;
    Ok(STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const SOURCE: &str = "GDLVVGABQKYQVN6VJP7NHSLEA45A5YLS6PNKMIZFV4BBU2HXA5IRVHUR";
    const DEST: &str = "GDVEU3DD4KOFECV66VIHWEZOYX4ZKR3WV27L464SIIPOU2IUI3JCZA57";

    const V1_UNSIGNED: &str = "AAAAAgAAAADXWpgBgrEKt9VL/tPJZAc6DuFy89qmIyWvAhpo9wdRGgAAAGQAAAABAAAAAQAAAAEAAAAAAAAAAAAAAABlU/EAAAAAAAAAAAEAAAAAAAAAAQAAAADqSmxj4pxSCr71UHsTLsX5lUd2rr6+e5JCHuppFEbSLAAAAAAAAAAAAJiWgAAAAAAAAAAA";
    const V1_SIGNED: &str = "AAAAAgAAAADXWpgBgrEKt9VL/tPJZAc6DuFy89qmIyWvAhpo9wdRGgAAAGQAAAABAAAAAQAAAAEAAAAAAAAAAAAAAABlU/EAAAAAAAAAAAEAAAAAAAAAAQAAAADqSmxj4pxSCr71UHsTLsX5lUd2rr6+e5JCHuppFEbSLAAAAAAAAAAAAJiWgAAAAAAAAAAB9wdRGgAAAEAUgeEp1qB7j9k+R+mmOniM5LVeXe5ortZKV1RYc3aAo2/SBpfdDW2IvEBW2/Wm8UTLdDZxA4c24oKd+yaqYzsD";
    const V0_UNSIGNED: &str = "AAAAANdamAGCsQq31Uv+08lkBzoO4XLz2qYjJa8CGmj3B1EaAAAAZAAAAAEAAAABAAAAAAAAAAAAAAABAAAAAAAAAAEAAAAA6kpsY+KcUgq+9VB7Ey7F+ZVHdq6+vnuSQh7qaRRG0iwAAAAAAAAAAACYloAAAAAAAAAAAA==";
    const FEE_BUMP: &str = "AAAABQAAAADqSmxj4pxSCr71UHsTLsX5lUd2rr6+e5JCHuppFEbSLAAAAAAAAAGQAAAAAgAAAADXWpgBgrEKt9VL/tPJZAc6DuFy89qmIyWvAhpo9wdRGgAAAGQAAAABAAAAAQAAAAEAAAAAAAAAAAAAAABlU/EAAAAAAAAAAAEAAAAAAAAAAQAAAADqSmxj4pxSCr71UHsTLsX5lUd2rr6+e5JCHuppFEbSLAAAAAAAAAAAAJiWgAAAAAAAAAAAAAAAAAAAAAA=";

    #[test]
    fn decodes_v1_envelope() {
        let env = decode_envelope(V1_UNSIGNED).unwrap();
        assert_eq!(env.version(), EnvelopeVersion::V1);
        assert_eq!(env.source_account(), SOURCE);
        assert_eq!(env.sequence_number(), 4_294_967_297);
        assert_eq!(env.fee(), 100);
        assert_eq!(env.operation_count(), 1);
        assert_eq!(env.signature_count(), 0);
    }

    #[test]
    fn decodes_v0_envelope() {
        let env = decode_envelope(V0_UNSIGNED).unwrap();
        assert_eq!(env.version(), EnvelopeVersion::V0);
        assert_eq!(env.source_account(), SOURCE);
        assert_eq!(env.sequence_number(), 4_294_967_297);
        assert_eq!(env.operation_count(), 1);
    }

    #[test]
    fn decodes_fee_bump_envelope() {
        let env = decode_envelope(FEE_BUMP).unwrap();
        assert_eq!(env.version(), EnvelopeVersion::FeeBump);
        assert_eq!(env.source_account(), DEST);
        assert_eq!(env.fee(), 400);
        assert_eq!(env.sequence_number(), 4_294_967_297);
        assert_eq!(env.operation_count(), 1);
        assert!(env.signatures().is_empty());
    }

    #[test]
    fn muxed_source_reports_underlying_key() {
        use stellar_xdr::curr::{MuxedAccountMed25519, Uint256};

        let mut inner = decode_envelope(V1_UNSIGNED).unwrap().as_xdr_envelope().clone();
        if let TransactionEnvelope::Tx(env) = &mut inner {
            let key = muxed_key(&env.tx.source_account);
            env.tx.source_account = MuxedAccount::MuxedEd25519(MuxedAccountMed25519 {
                id: 42,
                ed25519: Uint256(key),
            });
        }
        let env = Envelope::from_xdr_envelope(inner);
        assert_eq!(env.source_account(), SOURCE);
    }

    #[test]
    fn encode_reproduces_input() {
        for text in [V1_UNSIGNED, V1_SIGNED, V0_UNSIGNED, FEE_BUMP] {
            let env = decode_envelope(text).unwrap();
            assert_eq!(encode_envelope(&env).unwrap(), text);
        }
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let padded = format!("  {V1_UNSIGNED}\n");
        assert_eq!(decode_envelope(&padded).unwrap(), decode_envelope(V1_UNSIGNED).unwrap());
    }

    #[test]
    fn signed_envelope_exposes_hint() {
        let env = decode_envelope(V1_SIGNED).unwrap();
        let sigs = env.signatures();
        assert_eq!(sigs.len(), 1);
        assert_eq!(hex::encode(sigs[0].hint), "f707511a");
        assert_eq!(sigs[0].signature.len(), 64);

        let source = crate::crypto::StellarPublicKey::from_address(SOURCE).unwrap();
        assert!(sigs[0].hint_matches(source.as_bytes()));
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "not base64!", "AAAA", "AAAAAgAAAA=="] {
            let err = decode_envelope(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedXdr, "input {bad:?}");
        }
    }

    #[test]
    fn rejects_unknown_discriminant() {
        // Discriminant 7 is not an envelope type.
        let err = decode_envelope("AAAABwAAAAA=").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedXdr);
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut bytes = STANDARD.decode(V1_UNSIGNED).unwrap();
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        let err = decode_envelope(&STANDARD.encode(bytes)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedXdr);
    }

    #[test]
    fn rejects_truncated_envelope() {
        let bytes = STANDARD.decode(V1_UNSIGNED).unwrap();
        let err = decode_envelope(&STANDARD.encode(&bytes[..bytes.len() - 4])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedXdr);
    }

    #[test]
    fn rejects_oversized_text() {
        let huge = "A".repeat(MAX_ENVELOPE_XDR_LEN + 4);
        let err = decode_envelope(&huge).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedXdr);
    }

    #[test]
    fn with_signature_leaves_original_untouched() {
        let env = decode_envelope(V1_SIGNED).unwrap();
        let extra = env.decorated_signatures()[0].clone();
        let twice = env.with_signature(extra).unwrap();
        assert_eq!(env.signature_count(), 1);
        assert_eq!(twice.signature_count(), 2);
    }

    #[test]
    fn with_signature_enforces_limit() {
        let mut env = decode_envelope(V1_SIGNED).unwrap();
        let sig = env.decorated_signatures()[0].clone();
        while env.signature_count() < MAX_SIGNATURES {
            env = env.with_signature(sig.clone()).unwrap();
        }
        let err = env.with_signature(sig).unwrap_err();
        assert_eq!(err, SignerError::TooManySignatures { max: MAX_SIGNATURES });
    }
}
