//! # Transaction Validators
//!
//! A transaction is validated in three stages:
//!
//! 1. The envelope common to every kind (`id`, `type`, `senderAddress`,
//!    `fee`, `timestamp`, `message`).
//! 2. The kind-specific fields, dispatched on [`TransactionType`].
//! 3. The authorization: either one sender signature or a set of multisig
//!    member signatures.
//!
//! The allow-list runs last, against the union of every property the three
//! stages declared.

use std::collections::HashSet;

use serde_json::Value;
use shared_types::TransactionType;

use super::errors::{SchemaError, SchemaResult};
use super::primitives::{
    array_field, as_packet, integer_field, string_field, validate_key_index, validate_public_key,
    validate_signature_or_hash, validate_timestamp, validate_transaction_amount,
    validate_transaction_fee, validate_transaction_id, validate_transaction_message,
    validate_wallet_address, validate_wallet_address_value, Packet,
};
use super::properties::{
    ensure_no_invalid_property, BASE_TRANSACTION_PROPERTIES, MULTISIG_SIGNATURE_PROPERTIES,
    MULTISIG_TRANSACTION_PROPERTIES, SIG_TRANSACTION_PROPERTIES,
};
use super::quorum::SignerSet;
use crate::config::ValidationPolicy;

/// Parse the `type` tag. Anything outside the closed set is rejected here,
/// before any kind-specific field is looked at.
pub fn validate_transaction_type(packet: &Packet, field: &'static str) -> SchemaResult<TransactionType> {
    let tag = string_field(packet, field)?;
    tag.parse().map_err(|_| SchemaError::UnknownType {
        type_name: tag.to_string(),
    })
}

// =============================================================================
// KIND-SPECIFIC VALIDATORS
// =============================================================================
//
// Each returns the properties it adds to the envelope's allow-list.

pub fn validate_transfer_transaction_schema(
    transaction: &Packet,
    policy: &ValidationPolicy,
) -> SchemaResult<Vec<&'static str>> {
    validate_wallet_address(transaction, "recipientAddress", &policy.network_symbol)?;
    validate_transaction_amount(transaction, "amount", policy.max_spendable_digits)?;
    Ok(TransactionType::Transfer.extra_properties().to_vec())
}

pub fn validate_vote_transaction_schema(
    transaction: &Packet,
    policy: &ValidationPolicy,
) -> SchemaResult<Vec<&'static str>> {
    validate_wallet_address(transaction, "delegateAddress", &policy.network_symbol)?;
    Ok(TransactionType::Vote.extra_properties().to_vec())
}

pub fn validate_unvote_transaction_schema(
    transaction: &Packet,
    policy: &ValidationPolicy,
) -> SchemaResult<Vec<&'static str>> {
    validate_wallet_address(transaction, "delegateAddress", &policy.network_symbol)?;
    Ok(TransactionType::Unvote.extra_properties().to_vec())
}

/// Rotates the sender's single-signature key tree.
pub fn validate_register_sig_details_transaction_schema(
    transaction: &Packet,
) -> SchemaResult<Vec<&'static str>> {
    validate_public_key(transaction, "newSigPublicKey")?;
    validate_public_key(transaction, "newNextSigPublicKey")?;
    validate_key_index(transaction, "newNextSigKeyIndex")?;
    Ok(TransactionType::RegisterSigDetails.extra_properties().to_vec())
}

pub fn validate_register_multisig_details_transaction_schema(
    transaction: &Packet,
) -> SchemaResult<Vec<&'static str>> {
    validate_public_key(transaction, "newMultisigPublicKey")?;
    validate_public_key(transaction, "newNextMultisigPublicKey")?;
    validate_key_index(transaction, "newNextMultisigKeyIndex")?;
    Ok(TransactionType::RegisterMultisigDetails.extra_properties().to_vec())
}

pub fn validate_register_forging_details_transaction_schema(
    transaction: &Packet,
) -> SchemaResult<Vec<&'static str>> {
    validate_public_key(transaction, "newForgingPublicKey")?;
    validate_public_key(transaction, "newNextForgingPublicKey")?;
    validate_key_index(transaction, "newNextForgingKeyIndex")?;
    Ok(TransactionType::RegisterForgingDetails.extra_properties().to_vec())
}

pub fn validate_register_multisig_wallet_transaction_schema(
    transaction: &Packet,
    policy: &ValidationPolicy,
    sender_address: &str,
) -> SchemaResult<Vec<&'static str>> {
    validate_multisig_wallet(transaction, policy, Some(sender_address))?;
    Ok(TransactionType::RegisterMultisigWallet.extra_properties().to_vec())
}

/// Validate a multisig wallet definition (`memberAddresses` and
/// `requiredSignatureCount`).
///
/// Members must be distinct valid addresses, none equal to `self_address`,
/// with a count inside the policy bounds. The required count must be at
/// least 1 and can never exceed the number of members.
pub fn validate_multisig_wallet(
    packet: &Packet,
    policy: &ValidationPolicy,
    self_address: Option<&str>,
) -> SchemaResult<()> {
    let members = array_field(packet, "memberAddresses")?;
    if members.len() < policy.min_multisig_members || members.len() > policy.max_multisig_members {
        return Err(SchemaError::CountBounds {
            collection: "memberAddresses",
            count: members.len(),
            min: policy.min_multisig_members,
            max: policy.max_multisig_members,
        });
    }

    let mut seen = HashSet::with_capacity(members.len());
    for member in members {
        let member_address =
            validate_wallet_address_value("memberAddresses", Some(member), &policy.network_symbol)
                .map_err(|e| e.with_context("Invalid wallet address in memberAddresses"))?;
        if self_address == Some(member_address) {
            return Err(SchemaError::SelfSignature {
                signer_address: member_address.to_string(),
            });
        }
        if !seen.insert(member_address) {
            return Err(SchemaError::DuplicateMember {
                member_address: member_address.to_string(),
            });
        }
    }

    let max_required = members.len().min(policy.max_multisig_members) as u64;
    integer_field(packet, "requiredSignatureCount", 1, max_required)?;
    Ok(())
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// Result of the first two stages.
struct ValidatedEnvelope<'a> {
    packet: &'a Packet,
    sender_address: &'a str,
    properties: Vec<&'static str>,
}

fn validate_transaction_envelope<'a>(
    transaction: &'a Value,
    policy: &ValidationPolicy,
) -> SchemaResult<ValidatedEnvelope<'a>> {
    let packet = as_packet(transaction, "Transaction")?;
    let transaction_type = validate_transaction_type(packet, "type")?;

    validate_transaction_id(packet, "id")?;
    let sender_address = validate_wallet_address(packet, "senderAddress", &policy.network_symbol)?;
    validate_transaction_fee(packet, "fee", policy.max_spendable_digits)?;
    validate_timestamp(packet, "timestamp")?;
    validate_transaction_message(packet, "message", policy.max_transaction_message_length)?;

    let extra = match transaction_type {
        TransactionType::Transfer => validate_transfer_transaction_schema(packet, policy)?,
        TransactionType::Vote => validate_vote_transaction_schema(packet, policy)?,
        TransactionType::Unvote => validate_unvote_transaction_schema(packet, policy)?,
        TransactionType::RegisterSigDetails => {
            validate_register_sig_details_transaction_schema(packet)?
        }
        TransactionType::RegisterMultisigDetails => {
            validate_register_multisig_details_transaction_schema(packet)?
        }
        TransactionType::RegisterForgingDetails => {
            validate_register_forging_details_transaction_schema(packet)?
        }
        TransactionType::RegisterMultisigWallet => {
            validate_register_multisig_wallet_transaction_schema(packet, policy, sender_address)?
        }
    };

    let mut properties = BASE_TRANSACTION_PROPERTIES.to_vec();
    properties.extend(extra);

    Ok(ValidatedEnvelope {
        packet,
        sender_address,
        properties,
    })
}

// =============================================================================
// AUTHORIZATION
// =============================================================================

/// Validate a transaction from a single-signature wallet.
///
/// With `full_check` the 32984-character `senderSignature` is required;
/// without it only the 44-character `senderSignatureHash` is, which is the
/// form transactions take once they are embedded in a block.
pub fn validate_transaction_schema(
    transaction: &Value,
    policy: &ValidationPolicy,
    full_check: bool,
) -> SchemaResult<()> {
    let ValidatedEnvelope {
        packet,
        mut properties,
        ..
    } = validate_transaction_envelope(transaction, policy)?;

    validate_public_key(packet, "sigPublicKey")?;
    validate_public_key(packet, "nextSigPublicKey")?;
    validate_key_index(packet, "nextSigKeyIndex")?;
    let signature_field =
        validate_signature_or_hash(packet, "senderSignature", "senderSignatureHash", full_check)?;

    properties.extend_from_slice(SIG_TRANSACTION_PROPERTIES);
    properties.push(signature_field);
    ensure_no_invalid_property("Transaction", packet, &properties)
}

/// Validate one member signature of a multisig transaction. Returns the
/// signer's address.
pub fn validate_multisig_signature_schema<'a>(
    signature: &'a Value,
    policy: &ValidationPolicy,
    full_check: bool,
) -> SchemaResult<&'a str> {
    let packet = as_packet(signature, "Multisig signature")?;
    let signer_address = validate_wallet_address(packet, "signerAddress", &policy.network_symbol)?;
    validate_public_key(packet, "multisigPublicKey")?;
    validate_public_key(packet, "nextMultisigPublicKey")?;
    validate_key_index(packet, "nextMultisigKeyIndex")?;
    let signature_field = validate_signature_or_hash(packet, "signature", "signatureHash", full_check)?;

    let mut properties = MULTISIG_SIGNATURE_PROPERTIES.to_vec();
    properties.push(signature_field);
    ensure_no_invalid_property("Multisig signature", packet, &properties)?;
    Ok(signer_address)
}

/// Validate a transaction sent from a multisig wallet.
///
/// `required_signature_count` comes from the wallet's on-chain registration
/// and is supplied by the caller. Each member may sign once and the wallet
/// may not sign for itself.
pub fn validate_multisig_transaction_schema(
    transaction: &Value,
    policy: &ValidationPolicy,
    required_signature_count: usize,
    full_check: bool,
) -> SchemaResult<()> {
    let ValidatedEnvelope {
        packet,
        sender_address,
        mut properties,
    } = validate_transaction_envelope(transaction, policy)?;

    let signatures = array_field(packet, "signatures")?;
    if signatures.len() > policy.max_multisig_members {
        return Err(SchemaError::CountBounds {
            collection: "signatures",
            count: signatures.len(),
            min: required_signature_count,
            max: policy.max_multisig_members,
        });
    }

    let mut signers = SignerSet::new(Some(sender_address));
    for signature in signatures {
        let signer_address = validate_multisig_signature_schema(signature, policy, full_check)?;
        signers.admit(signer_address)?;
    }
    signers.require_quorum(required_signature_count)?;

    properties.extend_from_slice(MULTISIG_TRANSACTION_PROPERTIES);
    ensure_no_invalid_property("Transaction", packet, &properties)
}
