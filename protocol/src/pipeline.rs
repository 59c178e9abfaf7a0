//! # Batch Pipeline
//!
//! The host-facing contract: a list of JSON items goes in, each carrying an
//! `xdr` field and optionally a `network` selector; a list of outputs comes
//! out, one per item and in the same order.
//!
//! A successful item keeps all of its original fields and gains
//! `signedXdr`, `txHash`, `publicKey` and `network` (the passphrase, not the
//! selector). What happens on failure depends on [`FailureMode`]:
//!
//! - `Strict` stops at the first bad item and reports its index.
//! - `ContinueOnFail` emits the original item untouched plus an error
//!   record and `pairedItem`, then moves on.
//!
//! The secret is a parameter, never an item field, and never appears in
//! outputs, errors, or logs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::crypto::keys::StellarKeypair;
use crate::error::{BatchError, ErrorKind, SignerError};
use crate::network::Network;
use crate::transaction::{decode_envelope, sign_envelope};

/// What to do when an item fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureMode {
    /// Abort the batch on the first failing item.
    #[default]
    Strict,
    /// Record the failure on the item and keep going.
    ContinueOnFail,
}

impl FailureMode {
    pub fn from_continue_on_fail(continue_on_fail: bool) -> Self {
        if continue_on_fail {
            FailureMode::ContinueOnFail
        } else {
            FailureMode::Strict
        }
    }
}

/// Per-item parameters, as read from an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignParams {
    pub xdr: String,
    pub network: Network,
}

impl SignParams {
    /// Read parameters from an item.
    ///
    /// A missing or `null` `xdr` reads as empty and a missing or `null`
    /// `network` falls back to `default_network`. Checks happen in the
    /// order the signer reports them: the XDR must be non-blank before the
    /// network selector is looked at.
    pub fn from_item(
        item: &Map<String, Value>,
        default_network: Network,
    ) -> Result<Self, SignerError> {
        let xdr = match item.get("xdr") {
            None | Some(Value::Null) => "",
            Some(Value::String(s)) => s.as_str(),
            Some(other) => {
                return Err(SignerError::MalformedXdr(format!(
                    "expected a base64 string, got {}",
                    json_type(other)
                )))
            }
        };
        if xdr.trim().is_empty() {
            return Err(SignerError::EmptyXdr);
        }

        let network = match item.get("network") {
            None | Some(Value::Null) => default_network,
            Some(Value::String(s)) => s.parse()?,
            Some(other) => return Err(SignerError::UnknownNetwork(other.to_string())),
        };

        Ok(Self {
            xdr: xdr.to_string(),
            network,
        })
    }
}

/// A failure recorded on an item in tolerant mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&SignerError> for ItemError {
    fn from(err: &SignerError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// One output record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOutput {
    /// The item's fields, merged with the signing result on success.
    pub json: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ItemError>,
    /// Index of the input item this output pairs with; set on failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paired_item: Option<usize>,
}

impl ItemOutput {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Sign every item, defaulting to mainnet for items without a `network`.
///
/// # Errors
///
/// - [`BatchError::MissingCredentials`] if `secret` is blank, before any
///   item is processed.
/// - [`BatchError::InvalidItem`] if an item is not a JSON object.
/// - [`BatchError::Item`] for the first failing item in strict mode.
pub fn process_items(
    items: &[Value],
    secret: &str,
    mode: FailureMode,
) -> Result<Vec<ItemOutput>, BatchError> {
    process_items_with_network(items, secret, mode, Network::default())
}

/// Like [`process_items`] with a caller-chosen default network.
pub fn process_items_with_network(
    items: &[Value],
    secret: &str,
    mode: FailureMode,
    default_network: Network,
) -> Result<Vec<ItemOutput>, BatchError> {
    if secret.trim().is_empty() {
        return Err(BatchError::MissingCredentials);
    }

    info!(items = items.len(), ?mode, %default_network, "processing batch");

    // One decode per batch; items still report the key error individually.
    let keypair = StellarKeypair::from_secret(secret);

    let mut outputs = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Value::Object(fields) = item else {
            return Err(BatchError::InvalidItem {
                index,
                reason: format!("found {}", json_type(item)),
            });
        };

        match sign_item(fields, &keypair, default_network) {
            Ok(json) => {
                debug!(index, "item signed");
                outputs.push(ItemOutput {
                    json,
                    error: None,
                    paired_item: None,
                });
            }
            Err(source) => match mode {
                FailureMode::Strict => {
                    warn!(index, kind = ?source.kind(), "item failed, aborting batch");
                    return Err(BatchError::Item { index, source });
                }
                FailureMode::ContinueOnFail => {
                    warn!(index, kind = ?source.kind(), error = %source, "item failed, continuing");
                    outputs.push(ItemOutput {
                        json: fields.clone(),
                        error: Some(ItemError::from(&source)),
                        paired_item: Some(index),
                    });
                }
            },
        }
    }

    Ok(outputs)
}

fn sign_item(
    item: &Map<String, Value>,
    keypair: &Result<StellarKeypair, SignerError>,
    default_network: Network,
) -> Result<Map<String, Value>, SignerError> {
    // EmptyXdr is reported even when the key is also bad.
    if is_blank_xdr(item) {
        return Err(SignerError::EmptyXdr);
    }
    let keypair = keypair.as_ref().map_err(SignerError::clone)?;
    let params = SignParams::from_item(item, default_network)?;
    let passphrase = params.network.passphrase();

    let envelope = decode_envelope(&params.xdr)?;
    let signed = sign_envelope(&envelope, keypair, passphrase)?;

    let mut json = item.clone();
    json.insert("signedXdr".into(), Value::String(signed.to_xdr()?));
    json.insert("txHash".into(), Value::String(signed.hash_hex()));
    json.insert("publicKey".into(), Value::String(signed.public_key().to_address()));
    json.insert("network".into(), Value::String(passphrase.to_string()));
    Ok(json)
}

fn is_blank_xdr(item: &Map<String, Value>) -> bool {
    match item.get("xdr") {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
