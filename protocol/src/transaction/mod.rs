//! # Transaction Module
//!
//! Decoding, hashing, signing, and verification of Stellar transaction
//! envelopes.
//!
//! ## Architecture
//!
//! ```text
//! envelope.rs     — Base-64 XDR codec and read-only envelope accessors
//! payload.rs      — Network-bound signature payload and transaction hash
//! signing.rs      — Appending a decorated signature to a new envelope
//! verification.rs — Checking which keys have signed an envelope
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Decode** — [`decode_envelope`] turns the caller's text into an [`Envelope`].
//! 2. **Hash** — [`transaction_hash`] binds the body to a network passphrase.
//! 3. **Sign** — [`sign_envelope`] signs the hash and appends the signature.
//! 4. **Encode** — [`encode_envelope`] (or [`SignedTransaction::to_xdr`]) for submission.
//!
//! Envelopes are never mutated in place. Each step returns a new value.

pub mod envelope;
pub mod payload;
pub mod signing;
pub mod verification;

pub use envelope::{decode_envelope, encode_envelope, AttachedSignature, Envelope, EnvelopeVersion};
pub use payload::{signature_payload, transaction_hash};
pub use signing::{sign_envelope, sign_xdr, SignedTransaction};
pub use verification::{signers_matching, verify_signature};
