//! # Block Validators
//!
//! A block moves through three shapes on its way to finality:
//!
//! - **forged**: the forger has signed it, nobody else has yet
//! - **fully signed**: it carries a quorum of delegate signatures, each
//!   with the full signature body
//! - **stored**: as kept in history, where signatures may be reduced to
//!   their 44-character hashes
//!
//! All three share the same header checks. Block-info packets are the slim
//! `{id, height, signatures}` summary nodes exchange during sync.
//!
//! Transactions inside a block are only checked to be objects here. Their
//! full schema depends on account state (single-sig vs multisig, required
//! signature count) that only the caller has.

use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use super::primitives::{
    array_field, as_packet, string_field, validate_block_height, validate_block_id, validate_count,
    validate_key_index, validate_public_key, validate_signature, validate_signature_or_hash,
    validate_timestamp, validate_wallet_address, Packet,
};
use super::properties::{
    ensure_no_invalid_property, BLOCK_INFO_PROPERTIES, BLOCK_PROPERTIES, BLOCK_SIGNATURE_PROPERTIES,
};
use super::quorum::SignerSet;
use crate::config::ValidationPolicy;

/// What a list of block signatures must satisfy.
#[derive(Debug, Clone, Copy)]
pub struct QuorumRequirement<'a> {
    /// Address that may not appear as a signer (the forger).
    pub self_address: Option<&'a str>,
    /// Block every signature must reference, if known.
    pub block_id: Option<&'a str>,
    /// Distinct signers required.
    pub min_required: usize,
    pub full_check: bool,
}

/// Validate one delegate signature on a block. Returns the signer address
/// and the referenced block ID.
pub fn validate_block_signature_schema<'a>(
    signature: &'a Value,
    policy: &ValidationPolicy,
    full_check: bool,
) -> SchemaResult<(&'a str, &'a str)> {
    let packet = as_packet(signature, "Block signature")?;
    let signer_address = validate_wallet_address(packet, "signerAddress", &policy.network_symbol)?;
    validate_block_id(packet, "blockId")?;
    let block_id = string_field(packet, "blockId")?;
    let signature_field = validate_signature_or_hash(packet, "signature", "signatureHash", full_check)?;

    let mut properties = BLOCK_SIGNATURE_PROPERTIES.to_vec();
    properties.push(signature_field);
    ensure_no_invalid_property("Block signature", packet, &properties)?;
    Ok((signer_address, block_id))
}

/// Validate a list of block signatures against `requirement`.
///
/// Signatures are checked in order and the first failure wins, so a
/// malformed signature is reported before a repeated signer that follows
/// it. Returns the number of distinct signers.
pub fn validate_signature_quorum(
    signatures: &[Value],
    policy: &ValidationPolicy,
    requirement: QuorumRequirement<'_>,
) -> SchemaResult<usize> {
    if signatures.len() > policy.max_signatures {
        return Err(SchemaError::CountBounds {
            collection: "signatures",
            count: signatures.len(),
            min: requirement.min_required,
            max: policy.max_signatures,
        });
    }

    let mut signers = SignerSet::new(requirement.self_address);
    for signature in signatures {
        let (signer_address, block_id) =
            validate_block_signature_schema(signature, policy, requirement.full_check)?;
        if let Some(expected) = requirement.block_id {
            if block_id != expected {
                return Err(SchemaError::BlockIdMismatch {
                    expected: expected.to_string(),
                    actual: block_id.to_string(),
                });
            }
        }
        signers.admit(signer_address)?;
    }
    signers.require_quorum(requirement.min_required)?;
    Ok(signers.distinct_count())
}

/// Header fields shared by every block shape.
struct BlockHeader<'a> {
    packet: &'a Packet,
    id: &'a str,
    forger_address: &'a str,
}

fn validate_block_header<'a>(
    block: &'a Value,
    policy: &ValidationPolicy,
) -> SchemaResult<BlockHeader<'a>> {
    let packet = as_packet(block, "Block")?;

    validate_block_id(packet, "id")?;
    let id = string_field(packet, "id")?;
    validate_block_height(packet, "height")?;
    validate_timestamp(packet, "timestamp")?;

    // Only the genesis block has no predecessor.
    match packet.get("previousBlockId") {
        None | Some(Value::Null) => {}
        Some(_) => validate_block_id(packet, "previousBlockId")
            .map_err(|e| e.with_context("Invalid previous block ID"))?,
    }

    let declared = validate_count(packet, "numberOfTransactions")?;
    let transactions = array_field(packet, "transactions")?;
    if declared != transactions.len() as u64 {
        return Err(SchemaError::TransactionCountMismatch {
            declared,
            actual: transactions.len(),
        });
    }
    if transactions.len() < policy.min_transactions_per_block
        || transactions.len() > policy.max_transactions_per_block
    {
        return Err(SchemaError::CountBounds {
            collection: "transactions",
            count: transactions.len(),
            min: policy.min_transactions_per_block,
            max: policy.max_transactions_per_block,
        });
    }
    if !transactions.iter().all(Value::is_object) {
        return Err(SchemaError::FieldType {
            field: "transactions",
            expected: "an array of objects",
            found: "an array containing a non-object",
        });
    }

    let forger_address = validate_wallet_address(packet, "forgerAddress", &policy.network_symbol)?;
    validate_public_key(packet, "forgingPublicKey")?;
    validate_public_key(packet, "nextForgingPublicKey")?;
    validate_key_index(packet, "nextForgingKeyIndex")?;

    Ok(BlockHeader {
        packet,
        id,
        forger_address,
    })
}

/// Validate a block fresh from its forger, before delegates have signed.
pub fn validate_forged_block_schema(block: &Value, policy: &ValidationPolicy) -> SchemaResult<()> {
    let header = validate_block_header(block, policy)?;
    validate_signature(header.packet, "forgerSignature")
}

/// Validate a block carrying a full quorum of delegate signatures.
pub fn validate_fully_signed_block_schema(
    block: &Value,
    policy: &ValidationPolicy,
) -> SchemaResult<()> {
    let header = validate_block_header(block, policy)?;
    validate_signature(header.packet, "forgerSignature")?;

    let signatures = array_field(header.packet, "signatures")?;
    validate_signature_quorum(
        signatures,
        policy,
        QuorumRequirement {
            self_address: Some(header.forger_address),
            block_id: Some(header.id),
            min_required: policy.min_signatures,
            full_check: true,
        },
    )?;
    Ok(())
}

/// Validate a block in either full or hash-only form, including its
/// allow-list.
pub fn validate_block_schema(
    block: &Value,
    policy: &ValidationPolicy,
    full_check: bool,
) -> SchemaResult<()> {
    let header = validate_block_header(block, policy)?;
    let forger_signature_field = validate_signature_or_hash(
        header.packet,
        "forgerSignature",
        "forgerSignatureHash",
        full_check,
    )?;

    let signatures = array_field(header.packet, "signatures")?;
    validate_signature_quorum(
        signatures,
        policy,
        QuorumRequirement {
            self_address: Some(header.forger_address),
            block_id: Some(header.id),
            min_required: policy.min_signatures,
            full_check,
        },
    )?;

    let mut properties = BLOCK_PROPERTIES.to_vec();
    properties.push(forger_signature_field);
    ensure_no_invalid_property("Block", header.packet, &properties)
}

/// Validate a `{id, height, signatures}` block summary.
pub fn verify_block_info_schema(block_info: &Value, policy: &ValidationPolicy) -> SchemaResult<()> {
    let packet = as_packet(block_info, "Block info")?;
    validate_block_id(packet, "id")?;
    let id = string_field(packet, "id")?;
    validate_block_height(packet, "height")?;

    let signatures = array_field(packet, "signatures")?;
    validate_signature_quorum(
        signatures,
        policy,
        QuorumRequirement {
            self_address: None,
            block_id: Some(id),
            min_required: policy.min_signatures,
            full_check: true,
        },
    )?;

    ensure_no_invalid_property("Block info", packet, BLOCK_INFO_PROPERTIES)
}
