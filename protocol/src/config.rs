//! # Protocol Configuration & Constants
//!
//! Every magic number the signer relies on lives here: network passphrases,
//! strkey version bytes, envelope type tags, and the size limits we enforce
//! before handing untrusted input to the XDR decoder.
//!
//! These values are fixed by the Stellar protocol. Changing any of them
//! produces signatures no validator will ever accept, so treat this file as
//! read-only unless the network itself changes.

/// Version of this library.
pub const SIGNER_VERSION: &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// Network Passphrases
// ---------------------------------------------------------------------------

/// The public (production) network. Signatures made with this passphrase
/// move real money.
pub const PUBLIC_NETWORK_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

/// The SDF test network. Reset periodically; balances are play money.
pub const TESTNET_NETWORK_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// Selector strings accepted from callers.
pub const MAINNET_SELECTOR: &str = "mainnet";
pub const TESTNET_SELECTOR: &str = "testnet";

/// Network a work item signs for when it does not name one. Matches the
/// default of the workflow node this crate backs.
pub const DEFAULT_NETWORK_SELECTOR: &str = MAINNET_SELECTOR;

// ---------------------------------------------------------------------------
// Strkey
// ---------------------------------------------------------------------------

/// Version byte for an ed25519 public key (`G...`). `6 << 3`.
pub const VERSION_BYTE_ACCOUNT_ID: u8 = 6 << 3;

/// Version byte for a muxed ed25519 account (`M...`). `12 << 3`.
pub const VERSION_BYTE_MUXED_ACCOUNT: u8 = 12 << 3;

/// Version byte for an ed25519 secret seed (`S...`). `18 << 3`.
pub const VERSION_BYTE_SEED: u8 = 18 << 3;

/// Version byte for a pre-authorized transaction hash (`T...`). `19 << 3`.
pub const VERSION_BYTE_PRE_AUTH_TX: u8 = 19 << 3;

/// Version byte for a SHA-256 hash signer (`X...`). `23 << 3`.
pub const VERSION_BYTE_SHA256_HASH: u8 = 23 << 3;

/// Raw payload length of an ed25519 key, public or secret.
pub const KEY_PAYLOAD_LENGTH: usize = 32;

/// Strkey checksum length (CRC-16, little-endian).
pub const CHECKSUM_LENGTH: usize = 2;

/// Decoded length of a key strkey: version byte + payload + checksum.
pub const DECODED_KEY_LENGTH: usize = 1 + KEY_PAYLOAD_LENGTH + CHECKSUM_LENGTH;

/// Encoded length of a key strkey. 35 bytes at 5 bits per character,
/// rounded up, no padding.
pub const ENCODED_KEY_LENGTH: usize = 56;

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// `ENVELOPE_TYPE_TX` — tag mixed into the payload of v0 and v1 envelopes.
pub const ENVELOPE_TYPE_TX: u32 = 2;

/// `ENVELOPE_TYPE_TX_FEE_BUMP` — tag mixed into the payload of fee-bump
/// envelopes.
pub const ENVELOPE_TYPE_TX_FEE_BUMP: u32 = 5;

/// Maximum number of decorated signatures an envelope can carry. Fixed by
/// the XDR schema (`DecoratedSignature signatures<20>`).
pub const MAX_SIGNATURES: usize = 20;

/// Number of trailing public key bytes used as a signature hint.
pub const SIGNATURE_HINT_LENGTH: usize = 4;

/// Ed25519 signature length.
pub const SIGNATURE_LENGTH: usize = 64;

/// SHA-256 digest length; network ids and transaction hashes are both this.
pub const HASH_LENGTH: usize = 32;

/// Upper bound on the base-64 envelope text we are willing to decode.
/// Well above anything the network accepts, small enough that a hostile
/// payload cannot make the decoder allocate without bound.
pub const MAX_ENVELOPE_XDR_LEN: usize = 256 * 1024;

/// Nesting limit handed to the XDR reader. Soroban values nest; stellar-core
/// caps them well below this.
pub const XDR_DEPTH_LIMIT: u32 = 500;

/// Returns the passphrase for a known selector, or `None`. We don't guess.
pub fn passphrase_for_selector(selector: &str) -> Option<&'static str> {
    match selector {
        MAINNET_SELECTOR => Some(PUBLIC_NETWORK_PASSPHRASE),
        TESTNET_SELECTOR => Some(TESTNET_NETWORK_PASSPHRASE),
        _ => None,
    }
}
