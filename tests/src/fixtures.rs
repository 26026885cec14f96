//! # Typed Fixtures
//!
//! Builds well-formed wire structures from `shared_types` entities and
//! serializes them to JSON, so that every fixture is also a check that the
//! typed model and the validators agree on the wire format.

use dc_schema_validation::ValidationPolicy;
use serde::Serialize;
use serde_json::Value;
use shared_types::{
    Block, BlockSignature, DelegateDetails, ForgingDetails, MultisigApproval, MultisigDetails,
    MultisigSignaturePacket, MultisigWalletDetails, SigDetails, SingleSignature, Transaction,
    TransactionAuthorization, TransactionPayload, TransactionType, TransferDetails, ID_LENGTH,
    PUBLIC_KEY_LENGTH, SIGNATURE_HASH_LENGTH, SIGNATURE_LENGTH,
};

pub const NETWORK_SYMBOL: &str = "dpos";

/// Forger of every fixture block.
pub const FORGER: u16 = 0;

/// Sender of every fixture transaction.
pub const SENDER: u16 = 1;

/// Policy with small bounds: 3-of-at-most-5 block signatures and 2 to 5
/// multisig members.
pub fn test_policy() -> ValidationPolicy {
    ValidationPolicy {
        network_symbol: NETWORK_SYMBOL.to_string(),
        min_signatures: 3,
        max_signatures: 5,
        min_multisig_members: 2,
        max_multisig_members: 5,
        max_transactions_per_block: 10,
        ..ValidationPolicy::default()
    }
}

pub fn wallet_address(seed: u16) -> String {
    format!("{NETWORK_SYMBOL}{seed:064x}")
}

fn filled(fill: char, length: usize) -> String {
    fill.to_string().repeat(length)
}

pub fn public_key(fill: char) -> String {
    filled(fill, PUBLIC_KEY_LENGTH)
}

pub fn block_id(fill: char) -> String {
    filled(fill, ID_LENGTH)
}

pub fn signature() -> String {
    filled('S', SIGNATURE_LENGTH)
}

pub fn signature_hash() -> String {
    filled('H', SIGNATURE_HASH_LENGTH)
}

/// Serialize a fixture to its wire form.
pub fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).expect("fixture entities always serialize")
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// A representative payload of every kind.
pub fn payload_for(kind: TransactionType) -> TransactionPayload {
    match kind {
        TransactionType::Transfer => TransactionPayload::Transfer(TransferDetails {
            recipient_address: wallet_address(2),
            amount: "250000000".to_string(),
        }),
        TransactionType::Vote => TransactionPayload::Vote(DelegateDetails {
            delegate_address: wallet_address(3),
        }),
        TransactionType::Unvote => TransactionPayload::Unvote(DelegateDetails {
            delegate_address: wallet_address(3),
        }),
        TransactionType::RegisterSigDetails => TransactionPayload::RegisterSigDetails(SigDetails {
            new_sig_public_key: public_key('a'),
            new_next_sig_public_key: public_key('b'),
            new_next_sig_key_index: 0,
        }),
        TransactionType::RegisterMultisigDetails => {
            TransactionPayload::RegisterMultisigDetails(MultisigDetails {
                new_multisig_public_key: public_key('c'),
                new_next_multisig_public_key: public_key('d'),
                new_next_multisig_key_index: 0,
            })
        }
        TransactionType::RegisterForgingDetails => {
            TransactionPayload::RegisterForgingDetails(ForgingDetails {
                new_forging_public_key: public_key('e'),
                new_next_forging_public_key: public_key('f'),
                new_next_forging_key_index: 0,
            })
        }
        TransactionType::RegisterMultisigWallet => {
            TransactionPayload::RegisterMultisigWallet(MultisigWalletDetails {
                member_addresses: vec![wallet_address(10), wallet_address(11), wallet_address(12)],
                required_signature_count: 2,
            })
        }
    }
}

pub fn single_signature(full_check: bool) -> TransactionAuthorization {
    TransactionAuthorization::Single(SingleSignature {
        sig_public_key: public_key('k'),
        next_sig_public_key: public_key('n'),
        next_sig_key_index: 1,
        sender_signature: full_check.then(signature),
        sender_signature_hash: (!full_check).then(signature_hash),
    })
}

pub fn multisig_approval(signers: &[u16], full_check: bool) -> TransactionAuthorization {
    let signatures = signers
        .iter()
        .map(|&signer| MultisigSignaturePacket {
            signer_address: wallet_address(signer),
            multisig_public_key: public_key('m'),
            next_multisig_public_key: public_key('o'),
            next_multisig_key_index: 4,
            signature: full_check.then(signature),
            signature_hash: (!full_check).then(signature_hash),
        })
        .collect();
    TransactionAuthorization::Multisig(MultisigApproval { signatures })
}

pub fn transaction(payload: TransactionPayload, authorization: TransactionAuthorization) -> Transaction {
    Transaction {
        id: block_id('t'),
        sender_address: wallet_address(SENDER),
        fee: "10000000".to_string(),
        timestamp: 1_600_000_000_000,
        message: "fixture".to_string(),
        payload,
        authorization,
    }
}

pub fn transfer(full_check: bool) -> Transaction {
    transaction(
        payload_for(TransactionType::Transfer),
        single_signature(full_check),
    )
}

// =============================================================================
// BLOCKS
// =============================================================================

pub fn block_signature(signer: u16, id: &str, full_check: bool) -> BlockSignature {
    BlockSignature {
        signer_address: wallet_address(signer),
        block_id: id.to_string(),
        signature: full_check.then(signature),
        signature_hash: (!full_check).then(signature_hash),
    }
}

/// A block at height 7 forged by [`FORGER`] and endorsed by `signers`.
pub fn block(signers: &[u16], transactions: Vec<Transaction>, full_check: bool) -> Block {
    let id = block_id('B');
    Block {
        signatures: signers
            .iter()
            .map(|&signer| block_signature(signer, &id, full_check))
            .collect(),
        id,
        height: 7,
        timestamp: 1_600_000_070_000,
        previous_block_id: Some(block_id('A')),
        number_of_transactions: transactions.len() as u64,
        transactions,
        forger_address: wallet_address(FORGER),
        forging_public_key: public_key('F'),
        next_forging_public_key: public_key('G'),
        next_forging_key_index: 12,
        forger_signature: full_check.then(signature),
        forger_signature_hash: (!full_check).then(signature_hash),
    }
}

/// Set `field` on a JSON object fixture.
pub fn with_field(mut value: Value, field: &str, replacement: Value) -> Value {
    if let Some(object) = value.as_object_mut() {
        object.insert(field.to_string(), replacement);
    }
    value
}

/// Remove `field` from a JSON object fixture.
pub fn without_field(mut value: Value, field: &str) -> Value {
    if let Some(object) = value.as_object_mut() {
        object.remove(field);
    }
    value
}
