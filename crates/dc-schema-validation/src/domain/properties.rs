//! # Property Allow-Lists
//!
//! Every structure has an exact canonical property set. Anything outside it
//! is rejected, which stops extra fields from being smuggled past the other
//! checks or from making two different objects hash to the same id.

use std::collections::HashSet;

use super::errors::{SchemaError, SchemaResult};
use super::primitives::Packet;

/// Envelope properties common to every transaction kind.
pub const BASE_TRANSACTION_PROPERTIES: &[&str] =
    &["id", "type", "senderAddress", "fee", "timestamp", "message"];

/// Key material of a single-signature sender. The signature (or its hash)
/// is added separately depending on the check mode.
pub const SIG_TRANSACTION_PROPERTIES: &[&str] =
    &["sigPublicKey", "nextSigPublicKey", "nextSigKeyIndex"];

pub const MULTISIG_TRANSACTION_PROPERTIES: &[&str] = &["signatures"];

/// Multisig signature packet, without the signature/hash field.
pub const MULTISIG_SIGNATURE_PROPERTIES: &[&str] = &[
    "signerAddress",
    "multisigPublicKey",
    "nextMultisigPublicKey",
    "nextMultisigKeyIndex",
];

/// Block signature, without the signature/hash field.
pub const BLOCK_SIGNATURE_PROPERTIES: &[&str] = &["signerAddress", "blockId"];

/// Block properties, without the forger signature/hash field.
pub const BLOCK_PROPERTIES: &[&str] = &[
    "id",
    "height",
    "timestamp",
    "previousBlockId",
    "numberOfTransactions",
    "transactions",
    "forgerAddress",
    "forgingPublicKey",
    "nextForgingPublicKey",
    "nextForgingKeyIndex",
    "signatures",
];

pub const BLOCK_INFO_PROPERTIES: &[&str] = &["id", "height", "signatures"];

pub const TRANSACTION_BUNDLE_PROPERTIES: &[&str] = &["transactions", "signature"];

pub const PAGINATION_PROPERTIES: &[&str] = &["offset", "limit", "order"];

/// Returns the first property of `object` that is not in `valid_properties`.
///
/// Properties are scanned in the object's key order, so the same input
/// always reports the same property.
pub fn find_invalid_property<'a>(object: &'a Packet, valid_properties: &[&str]) -> Option<&'a str> {
    let valid: HashSet<&str> = valid_properties.iter().copied().collect();
    object
        .keys()
        .map(String::as_str)
        .find(|property| !valid.contains(property))
}

/// Fails with `UnexpectedProperty` if `object` carries anything outside
/// `valid_properties`.
pub fn ensure_no_invalid_property(
    structure: &'static str,
    object: &Packet,
    valid_properties: &[&str],
) -> SchemaResult<()> {
    match find_invalid_property(object, valid_properties) {
        Some(property) => Err(SchemaError::UnexpectedProperty {
            structure,
            property: property.to_string(),
        }),
        None => Ok(()),
    }
}
