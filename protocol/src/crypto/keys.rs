//! # Key Management
//!
//! Ed25519 keypairs decoded from Stellar secret seeds, and the public keys
//! and signatures they produce.
//!
//! A Stellar secret seed *is* the 32-byte Ed25519 secret key; the strkey
//! wrapper only adds a version byte and a checksum. So decoding a seed is
//! strkey validation followed by `SigningKey::from_bytes`, nothing more.
//!
//! ## Security considerations
//!
//! - The signing key is zeroized on drop (ed25519-dalek does this for us).
//! - Re-encoded secrets come back in a [`Zeroizing`] buffer.
//! - Key bytes are never logged, and `Debug` prints only the public address.

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use std::fmt;
use std::hash::{Hash, Hasher};
use zeroize::Zeroizing;

use super::strkey::{decode_account_id, decode_seed, encode_account_id, encode_check, VersionByte};
use crate::config::{SIGNATURE_HINT_LENGTH, SIGNATURE_LENGTH};
use crate::error::SignerError;

/// A keypair bound to one Stellar secret seed.
///
/// Intentionally not `Serialize`. If a seed needs to leave this struct,
/// call [`secret_seed`](Self::secret_seed) and own that decision.
///
/// # Examples
///
/// ```
/// use stellar_signer::crypto::StellarKeypair;
///
/// let kp = StellarKeypair::from_secret(
///     "SCOWDMM5576VUYF2QRFPJEXMFTCEISOFNF5TE2IZOA52YAY4VZ7WBQNO",
/// ).unwrap();
/// assert_eq!(
///     kp.address(),
///     "GDLVVGABQKYQVN6VJP7NHSLEA45A5YLS6PNKMIZFV4BBU2HXA5IRVHUR",
/// );
/// ```
pub struct StellarKeypair {
    signing_key: SigningKey,
}

/// The public half of a keypair: 32 raw bytes, shown as a `G...` address.
#[derive(Clone, PartialEq, Eq)]
pub struct StellarPublicKey {
    bytes: [u8; 32],
}

/// A raw 64-byte Ed25519 signature.
#[derive(Clone, PartialEq, Eq)]
pub struct StellarSignature {
    bytes: [u8; SIGNATURE_LENGTH],
}

impl StellarKeypair {
    /// Decode an `S...` secret seed.
    ///
    /// # Errors
    ///
    /// `InvalidEncoding` for bad base-32 or length, `WrongKeyType` when the
    /// strkey is not a seed (a `G...` address, say), `InvalidChecksum` when
    /// the CRC does not match.
    pub fn from_secret(secret: &str) -> Result<Self, SignerError> {
        let seed = decode_seed(secret)?;
        Ok(Self::from_seed(&seed))
    }

    /// Build a keypair from a raw 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// The public key.
    pub fn public_key(&self) -> StellarPublicKey {
        StellarPublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// The public key as a `G...` address.
    pub fn address(&self) -> String {
        self.public_key().to_address()
    }

    /// The last four bytes of the public key, attached to every signature
    /// this keypair produces.
    pub fn signature_hint(&self) -> [u8; SIGNATURE_HINT_LENGTH] {
        self.public_key().hint()
    }

    /// Sign a message. Ed25519 is deterministic: same key, same message,
    /// same signature, every time.
    pub fn sign(&self, message: &[u8]) -> StellarSignature {
        StellarSignature {
            bytes: self.signing_key.sign(message).to_bytes(),
        }
    }

    /// Verify against this keypair's own public key.
    pub fn verify(&self, message: &[u8], signature: &StellarSignature) -> bool {
        self.public_key().verify(message, signature)
    }

    /// Re-encode the seed as an `S...` strkey.
    ///
    /// **Handle with care.** This is the whole account.
    pub fn secret_seed(&self) -> Zeroizing<String> {
        let seed = Zeroizing::new(self.signing_key.to_bytes());
        Zeroizing::new(encode_check(VersionByte::Seed, &*seed))
    }
}

impl Clone for StellarKeypair {
    fn clone(&self) -> Self {
        let seed = Zeroizing::new(self.signing_key.to_bytes());
        Self::from_seed(&seed)
    }
}

impl fmt::Debug for StellarKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret material, not even a prefix of it.
        write!(f, "StellarKeypair(pub={})", self.address())
    }
}

impl PartialEq for StellarKeypair {
    /// Compares public keys only, which avoids a non-constant-time
    /// comparison of secrets and identifies the same account anyway.
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for StellarKeypair {}

// ---------------------------------------------------------------------------
// StellarPublicKey
// ---------------------------------------------------------------------------

impl StellarPublicKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Parse a `G...` address.
    pub fn from_address(address: &str) -> Result<Self, SignerError> {
        let bytes = decode_account_id(address)?;
        Ok(Self { bytes })
    }

    /// Encode as a `G...` address.
    pub fn to_address(&self) -> String {
        encode_account_id(&self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Last four bytes of the key.
    pub fn hint(&self) -> [u8; SIGNATURE_HINT_LENGTH] {
        let mut hint = [0u8; SIGNATURE_HINT_LENGTH];
        hint.copy_from_slice(&self.bytes[32 - SIGNATURE_HINT_LENGTH..]);
        hint
    }

    /// Verify a signature. Invalid curve points and malformed signatures
    /// are just `false`.
    pub fn verify(&self, message: &[u8], signature: &StellarSignature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let dalek_sig = DalekSignature::from_bytes(&signature.bytes);
        verifying_key.verify(message, &dalek_sig).is_ok()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl Hash for StellarPublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Display for StellarPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_address())
    }
}

impl fmt::Debug for StellarPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StellarPublicKey({})", self.to_address())
    }
}

// ---------------------------------------------------------------------------
// StellarSignature
// ---------------------------------------------------------------------------

impl StellarSignature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Parse from a slice. `None` unless it is exactly 64 bytes.
    pub fn try_from_slice(slice: &[u8]) -> Option<Self> {
        let bytes: [u8; SIGNATURE_LENGTH] = slice.try_into().ok()?;
        Some(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl fmt::Debug for StellarSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        write!(f, "StellarSignature({}...{})", &hex_str[..8], &hex_str[120..])
    }
}
