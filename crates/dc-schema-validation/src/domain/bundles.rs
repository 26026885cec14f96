//! Bundle and network response validators.
//!
//! These guard structures that arrive in bulk from peers. Signature lists
//! get the full per-signature and quorum treatment; block lists are only
//! checked to be arrays, since every block in them is validated on its own
//! before it is used.

use serde_json::Value;

use super::blocks::{validate_signature_quorum, QuorumRequirement};
use super::errors::{SchemaError, SchemaResult};
use super::primitives::{
    array_field, as_packet, json_kind, string_field, validate_limit, validate_offset,
    validate_sort_order,
};
use super::properties::{
    ensure_no_invalid_property, PAGINATION_PROPERTIES, TRANSACTION_BUNDLE_PROPERTIES,
};
use crate::config::ValidationPolicy;

/// Validate a `{transactions, signature}` bundle.
///
/// The bundle signature is only type-checked; verifying it is the caller's
/// job.
pub fn verify_transaction_bundle_schema(bundle: &Value) -> SchemaResult<()> {
    let packet = as_packet(bundle, "Transaction bundle")?;
    let transactions = array_field(packet, "transactions")?;
    if !transactions.iter().all(Value::is_object) {
        return Err(SchemaError::FieldType {
            field: "transactions",
            expected: "an array of objects",
            found: "an array containing a non-object",
        });
    }
    string_field(packet, "signature")?;
    ensure_no_invalid_property("Transaction bundle", packet, TRANSACTION_BUNDLE_PROPERTIES)
}

fn signature_list<'a>(value: &'a Value, field: &'static str) -> SchemaResult<&'a [Value]> {
    match value {
        Value::Array(signatures) => Ok(signatures),
        Value::Null => Err(SchemaError::MissingStructure { structure: field }),
        other => Err(SchemaError::FieldType {
            field,
            expected: "an array",
            found: json_kind(Some(other)),
        }),
    }
}

/// Validate a bare list of block signatures against a quorum of
/// `min_required` distinct signers.
pub fn verify_block_signatures_schema(
    signatures: &Value,
    policy: &ValidationPolicy,
    min_required: usize,
) -> SchemaResult<()> {
    let signatures = signature_list(signatures, "Block signatures")?;
    validate_signature_quorum(
        signatures,
        policy,
        QuorumRequirement {
            self_address: None,
            block_id: None,
            min_required,
            full_check: true,
        },
    )?;
    Ok(())
}

/// Validate the signatures a peer returned for the block `block_id`.
pub fn verify_block_signatures_response_schema(
    response: &Value,
    policy: &ValidationPolicy,
    block_id: &str,
    min_required: usize,
) -> SchemaResult<()> {
    let signatures = signature_list(response, "Block signatures response")?;
    validate_signature_quorum(
        signatures,
        policy,
        QuorumRequirement {
            self_address: None,
            block_id: Some(block_id),
            min_required,
            full_check: true,
        },
    )?;
    Ok(())
}

/// Only checks that a blocks response is an array.
pub fn verify_blocks_response(response: &Value) -> SchemaResult<()> {
    match response {
        Value::Array(_) => Ok(()),
        other => Err(SchemaError::FieldType {
            field: "blocks",
            expected: "an array",
            found: json_kind(Some(other)),
        }),
    }
}

/// Validate `{offset?, limit?, order?}` query parameters.
pub fn verify_pagination_schema(query: &Value, policy: &ValidationPolicy) -> SchemaResult<()> {
    let packet = as_packet(query, "Query")?;
    if packet.contains_key("offset") {
        validate_offset(packet, "offset")?;
    }
    if packet.contains_key("limit") {
        validate_limit(packet, "limit", policy.max_query_limit)?;
    }
    if packet.contains_key("order") {
        validate_sort_order(packet, "order")?;
    }
    ensure_no_invalid_property("Query", packet, PAGINATION_PROPERTIES)
}
