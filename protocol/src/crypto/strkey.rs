//! # Strkey Encoding
//!
//! Stellar's text form for keys and addresses:
//!
//! ```text
//! version byte (1) | payload (n) | CRC-16/XMODEM (2, little-endian)
//!     -> RFC 4648 base-32, upper case, no padding
//! ```
//!
//! The version byte is chosen so its top five bits render as a fixed first
//! character: `G` for public keys, `S` for secret seeds, and so on.
//!
//! `G...` addresses go through `stellar-strkey`. It reports every failure
//! as one opaque error, so a rejected key is re-examined here to tell a bad
//! encoding from a wrong key type from a bad checksum. Secret seeds are
//! decoded here directly, into buffers that are wiped on drop.
//!
//! Seed decoding is strict: upper case only, no padding, zero trailing
//! bits.

use crc::{Crc, CRC_16_XMODEM};
use data_encoding::BASE32_NOPAD;
use stellar_strkey::ed25519;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::config::{
    CHECKSUM_LENGTH, ENCODED_KEY_LENGTH, KEY_PAYLOAD_LENGTH, VERSION_BYTE_ACCOUNT_ID,
    VERSION_BYTE_MUXED_ACCOUNT, VERSION_BYTE_PRE_AUTH_TX, VERSION_BYTE_SEED,
    VERSION_BYTE_SHA256_HASH,
};

const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

/// Errors produced while decoding a strkey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StrkeyError {
    #[error("not a canonical base-32 strkey of the expected length")]
    InvalidEncoding,

    #[error("strkey checksum mismatch")]
    InvalidChecksum,

    #[error("expected {} strkey, found {}", expected.describe(), found.describe())]
    WrongVersion {
        expected: VersionByte,
        found: VersionByte,
    },
}

/// The key type a strkey announces in its first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionByte {
    AccountId,
    MuxedAccount,
    Seed,
    PreAuthTx,
    Sha256Hash,
    Unknown(u8),
}

impl VersionByte {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            VERSION_BYTE_ACCOUNT_ID => VersionByte::AccountId,
            VERSION_BYTE_MUXED_ACCOUNT => VersionByte::MuxedAccount,
            VERSION_BYTE_SEED => VersionByte::Seed,
            VERSION_BYTE_PRE_AUTH_TX => VersionByte::PreAuthTx,
            VERSION_BYTE_SHA256_HASH => VersionByte::Sha256Hash,
            other => VersionByte::Unknown(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            VersionByte::AccountId => VERSION_BYTE_ACCOUNT_ID,
            VersionByte::MuxedAccount => VERSION_BYTE_MUXED_ACCOUNT,
            VersionByte::Seed => VERSION_BYTE_SEED,
            VersionByte::PreAuthTx => VERSION_BYTE_PRE_AUTH_TX,
            VersionByte::Sha256Hash => VERSION_BYTE_SHA256_HASH,
            VersionByte::Unknown(b) => b,
        }
    }

    /// Human-readable name, used in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            VersionByte::AccountId => "public key",
            VersionByte::MuxedAccount => "muxed account",
            VersionByte::Seed => "secret seed",
            VersionByte::PreAuthTx => "pre-auth transaction",
            VersionByte::Sha256Hash => "sha256 hash",
            VersionByte::Unknown(_) => "unknown",
        }
    }
}

/// CRC-16/XMODEM of `data`.
pub fn checksum(data: &[u8]) -> u16 {
    CRC16.checksum(data)
}

/// Encode `payload` under `version` as a strkey.
///
/// The intermediate buffer is wiped, so this is safe to call on seeds.
pub fn encode_check(version: VersionByte, payload: &[u8]) -> String {
    let mut data = Zeroizing::new(Vec::with_capacity(1 + payload.len() + CHECKSUM_LENGTH));
    data.push(version.to_byte());
    data.extend_from_slice(payload);
    let crc = checksum(&data);
    data.extend_from_slice(&crc.to_le_bytes());
    BASE32_NOPAD.encode(&data)
}

/// Decode a strkey of any length and return its payload.
///
/// Checks run in order: base-32 validity, version byte, checksum.
pub fn decode_check(
    expected: VersionByte,
    text: &str,
) -> Result<Zeroizing<Vec<u8>>, StrkeyError> {
    let data = Zeroizing::new(
        BASE32_NOPAD
            .decode(text.as_bytes())
            .map_err(|_| StrkeyError::InvalidEncoding)?,
    );
    if data.len() < 1 + CHECKSUM_LENGTH {
        return Err(StrkeyError::InvalidEncoding);
    }
    let (body, crc) = data.split_at(data.len() - CHECKSUM_LENGTH);

    let found = VersionByte::from_byte(body[0]);
    if found != expected {
        return Err(StrkeyError::WrongVersion { expected, found });
    }
    if checksum(body) != u16::from_le_bytes([crc[0], crc[1]]) {
        return Err(StrkeyError::InvalidChecksum);
    }
    Ok(Zeroizing::new(body[1..].to_vec()))
}

/// Decode an `S...` secret seed into its 32 raw bytes.
pub fn decode_seed(text: &str) -> Result<Zeroizing<[u8; KEY_PAYLOAD_LENGTH]>, StrkeyError> {
    let payload = decode_key_payload(VersionByte::Seed, text)?;
    let mut seed = Zeroizing::new([0u8; KEY_PAYLOAD_LENGTH]);
    seed.copy_from_slice(&payload);
    Ok(seed)
}

/// Decode a `G...` address into its 32 raw bytes.
pub fn decode_account_id(text: &str) -> Result<[u8; KEY_PAYLOAD_LENGTH], StrkeyError> {
    match ed25519::PublicKey::from_string(text) {
        Ok(key) => Ok(key.0),
        Err(_) => Err(decode_key_payload(VersionByte::AccountId, text)
            .err()
            .unwrap_or(StrkeyError::InvalidEncoding)),
    }
}

/// Encode 32 raw public-key bytes as a `G...` address.
pub fn encode_account_id(key: &[u8; KEY_PAYLOAD_LENGTH]) -> String {
    ed25519::PublicKey(*key).to_string()
}

/// Pins the overall length before anything else, so a muxed address or a
/// truncated seed is `InvalidEncoding` whatever its first character says.
fn decode_key_payload(
    expected: VersionByte,
    text: &str,
) -> Result<Zeroizing<Vec<u8>>, StrkeyError> {
    if text.len() != ENCODED_KEY_LENGTH {
        return Err(StrkeyError::InvalidEncoding);
    }
    let payload = decode_check(expected, text)?;
    if payload.len() != KEY_PAYLOAD_LENGTH {
        return Err(StrkeyError::InvalidEncoding);
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 8032 test 1 seed, rendered as a Stellar secret.
    const SEED: &str = "SCOWDMM5576VUYF2QRFPJEXMFTCEISOFNF5TE2IZOA52YAY4VZ7WBQNO";
    const SEED_HEX: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    const ADDRESS: &str = "GDLVVGABQKYQVN6VJP7NHSLEA45A5YLS6PNKMIZFV4BBU2HXA5IRVHUR";

    #[test]
    fn crc16_known_vector() {
        // CRC-16/XMODEM check value for "123456789".
        assert_eq!(checksum(b"123456789"), 0x31C3);
        assert_eq!(checksum(b""), 0);
    }

    #[test]
    fn zero_account_encodes_to_well_known_address() {
        let zero = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF";
        assert_eq!(encode_check(VersionByte::AccountId, &[0u8; 32]), zero);
        assert_eq!(encode_account_id(&[0u8; 32]), zero);
    }

    #[test]
    fn decode_known_seed() {
        let seed = decode_seed(SEED).unwrap();
        assert_eq!(hex::encode(*seed), SEED_HEX);
        assert_eq!(encode_check(VersionByte::Seed, &*seed), SEED);
    }

    #[test]
    fn seed_bytes_come_back_in_wiping_buffers() {
        let seed: Zeroizing<[u8; KEY_PAYLOAD_LENGTH]> = decode_seed(SEED).unwrap();
        let payload: Zeroizing<Vec<u8>> = decode_check(VersionByte::Seed, SEED).unwrap();
        assert_eq!(payload.as_slice(), seed.as_slice());
    }

    #[test]
    fn seed_codec_agrees_with_stellar_strkey() {
        let reference = ed25519::PrivateKey::from_string(SEED).unwrap();
        assert_eq!(*decode_seed(SEED).unwrap(), reference.0);
        assert_eq!(
            encode_check(VersionByte::Seed, &reference.0),
            reference.to_string()
        );
    }

    #[test]
    fn account_id_roundtrip() {
        let key = decode_account_id(ADDRESS).unwrap();
        assert_eq!(encode_account_id(&key), ADDRESS);
        assert_eq!(encode_check(VersionByte::AccountId, &key), ADDRESS);
    }

    #[test]
    fn arbitrary_payload_lengths_survive() {
        for len in [0usize, 1, 4, 20, 32, 40] {
            let payload: Vec<u8> = (0..len as u8).collect();
            let text = encode_check(VersionByte::Sha256Hash, &payload);
            assert_eq!(
                *decode_check(VersionByte::Sha256Hash, &text).unwrap(),
                payload
            );
        }
    }

    #[test]
    fn wrong_version_is_reported() {
        assert_eq!(
            decode_seed(ADDRESS),
            Err(StrkeyError::WrongVersion {
                expected: VersionByte::Seed,
                found: VersionByte::AccountId,
            })
        );
        assert_eq!(
            decode_account_id(SEED),
            Err(StrkeyError::WrongVersion {
                expected: VersionByte::AccountId,
                found: VersionByte::Seed,
            })
        );
    }

    #[test]
    fn unknown_version_is_reported() {
        let odd = encode_check(VersionByte::Unknown(0x08), &[1u8; 32]);
        assert!(matches!(
            decode_seed(&odd),
            Err(StrkeyError::WrongVersion {
                found: VersionByte::Unknown(0x08),
                ..
            })
        ));
    }

    #[test]
    fn corrupted_character_fails_checksum() {
        for text in [SEED, ADDRESS] {
            let mut chars: Vec<char> = text.chars().collect();
            chars[10] = if chars[10] == 'A' { 'B' } else { 'A' };
            let corrupted: String = chars.into_iter().collect();
            let err = if text == SEED {
                decode_seed(&corrupted).map(|_| ()).unwrap_err()
            } else {
                decode_account_id(&corrupted).map(|_| ()).unwrap_err()
            };
            assert_eq!(err, StrkeyError::InvalidChecksum, "input {text}");
        }
    }

    #[test]
    fn wrong_length_is_invalid_encoding() {
        let long = format!("{SEED}AA");
        for bad in [&SEED[..55], "", long.as_str()] {
            assert_eq!(decode_seed(bad), Err(StrkeyError::InvalidEncoding));
        }
        assert_eq!(
            decode_account_id(&ADDRESS[..50]),
            Err(StrkeyError::InvalidEncoding)
        );
    }

    #[test]
    fn muxed_address_is_not_an_account_id() {
        // Muxed payload: 32-byte key plus 8-byte id.
        let muxed = encode_check(VersionByte::MuxedAccount, &[7u8; 40]);
        assert_eq!(
            decode_account_id(&muxed),
            Err(StrkeyError::InvalidEncoding)
        );
    }

    #[test]
    fn lowercase_and_padding_are_rejected() {
        assert_eq!(
            decode_seed(&SEED.to_lowercase()),
            Err(StrkeyError::InvalidEncoding)
        );
        let padded = format!("{}=", &SEED[..55]);
        assert_eq!(decode_seed(&padded), Err(StrkeyError::InvalidEncoding));
    }

    #[test]
    fn non_canonical_trailing_bits_are_rejected() {
        // A 4-byte strkey spans 7 characters with 3 spare bits at the end.
        // The canonical last character has them zeroed; '6' and '7' don't.
        let text = encode_check(VersionByte::Sha256Hash, &[0xff]);
        let mut bytes = text.into_bytes();
        let last = bytes.len() - 1;
        bytes[last] = if bytes[last] == b'7' { b'6' } else { b'7' };
        let tampered = String::from_utf8(bytes).unwrap();
        assert!(decode_check(VersionByte::Sha256Hash, &tampered).is_err());
    }
}
