//! # Core Domain Entities
//!
//! Defines the chain entities as they appear on the wire between nodes.
//!
//! ## Clusters
//!
//! - **Wire Constants**: fixed lengths for ids, keys, signatures and hashes
//! - **Transactions**: `Transaction`, `TransactionType`, payloads, authorization
//! - **Blocks**: `Block`, `BlockSignature`, `BlockInfo`
//! - **Bundles**: `TransactionBundle`

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::errors::UnknownTransactionType;

// =============================================================================
// WIRE CONSTANTS
// =============================================================================

/// Number of hex characters in a wallet address after the network symbol.
pub const WALLET_ADDRESS_BASE_LENGTH: usize = 64;

/// Length of a one-time-signature Merkle root (sig, multisig and forging keys).
pub const PUBLIC_KEY_LENGTH: usize = 44;

/// Length of a serialized Lamport-style signature.
pub const SIGNATURE_LENGTH: usize = 32984;

/// Length of a signature commitment used before the signature is revealed.
pub const SIGNATURE_HASH_LENGTH: usize = 44;

/// Length of block and transaction ids.
pub const ID_LENGTH: usize = 44;

/// Largest integer every node can represent exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

/// A network-symbol-prefixed hex wallet address.
pub type WalletAddress = String;

/// A Merkle-tree root of a one-time-signature scheme.
pub type PublicKey = String;

/// A serialized one-time signature.
pub type Signature = String;

/// A digest standing in for a not-yet-revealed signature.
pub type SignatureHash = String;

/// A content-derived block id.
pub type BlockId = String;

/// A content-derived transaction id.
pub type TransactionId = String;

/// Index of the next usable leaf of a one-time-signature Merkle tree.
pub type KeyIndex = u64;

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// The closed set of transaction kinds.
///
/// Transaction kinds are consensus-critical: every node must accept exactly
/// the same set, so the set is an exhaustive enum rather than a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionType {
    Transfer,
    Vote,
    Unvote,
    RegisterSigDetails,
    RegisterMultisigDetails,
    RegisterForgingDetails,
    RegisterMultisigWallet,
}

impl TransactionType {
    /// Every supported kind, in wire declaration order.
    pub const ALL: [TransactionType; 7] = [
        TransactionType::Transfer,
        TransactionType::Vote,
        TransactionType::Unvote,
        TransactionType::RegisterSigDetails,
        TransactionType::RegisterMultisigDetails,
        TransactionType::RegisterForgingDetails,
        TransactionType::RegisterMultisigWallet,
    ];

    /// The wire tag carried in the `type` property.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Transfer => "transfer",
            TransactionType::Vote => "vote",
            TransactionType::Unvote => "unvote",
            TransactionType::RegisterSigDetails => "registerSigDetails",
            TransactionType::RegisterMultisigDetails => "registerMultisigDetails",
            TransactionType::RegisterForgingDetails => "registerForgingDetails",
            TransactionType::RegisterMultisigWallet => "registerMultisigWallet",
        }
    }

    /// Properties this kind adds on top of the transaction envelope.
    pub fn extra_properties(&self) -> &'static [&'static str] {
        match self {
            TransactionType::Transfer => &["recipientAddress", "amount"],
            TransactionType::Vote | TransactionType::Unvote => &["delegateAddress"],
            TransactionType::RegisterSigDetails => {
                &["newSigPublicKey", "newNextSigPublicKey", "newNextSigKeyIndex"]
            }
            TransactionType::RegisterMultisigDetails => &[
                "newMultisigPublicKey",
                "newNextMultisigPublicKey",
                "newNextMultisigKeyIndex",
            ],
            TransactionType::RegisterForgingDetails => &[
                "newForgingPublicKey",
                "newNextForgingPublicKey",
                "newNextForgingKeyIndex",
            ],
            TransactionType::RegisterMultisigWallet => {
                &["memberAddresses", "requiredSignatureCount"]
            }
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = UnknownTransactionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownTransactionType(s.to_string()))
    }
}

/// A transaction as exchanged between nodes.
///
/// The envelope fields are common to every kind; `payload` carries the
/// kind-specific fields (and the `type` tag) and `authorization` carries
/// either a single signer's key material or a multisig signature set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub sender_address: WalletAddress,
    /// Fee as a decimal-digit string.
    pub fee: String,
    pub timestamp: Timestamp,
    pub message: String,
    #[serde(flatten)]
    pub payload: TransactionPayload,
    #[serde(flatten)]
    pub authorization: TransactionAuthorization,
}

impl Transaction {
    /// Returns the kind of this transaction.
    pub fn transaction_type(&self) -> TransactionType {
        self.payload.transaction_type()
    }

    /// Returns true if the transaction is authorized by a multisig wallet.
    pub fn is_multisig(&self) -> bool {
        matches!(self.authorization, TransactionAuthorization::Multisig(_))
    }
}

/// Kind-specific transaction fields, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TransactionPayload {
    Transfer(TransferDetails),
    Vote(DelegateDetails),
    Unvote(DelegateDetails),
    RegisterSigDetails(SigDetails),
    RegisterMultisigDetails(MultisigDetails),
    RegisterForgingDetails(ForgingDetails),
    RegisterMultisigWallet(MultisigWalletDetails),
}

impl TransactionPayload {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            TransactionPayload::Transfer(_) => TransactionType::Transfer,
            TransactionPayload::Vote(_) => TransactionType::Vote,
            TransactionPayload::Unvote(_) => TransactionType::Unvote,
            TransactionPayload::RegisterSigDetails(_) => TransactionType::RegisterSigDetails,
            TransactionPayload::RegisterMultisigDetails(_) => {
                TransactionType::RegisterMultisigDetails
            }
            TransactionPayload::RegisterForgingDetails(_) => {
                TransactionType::RegisterForgingDetails
            }
            TransactionPayload::RegisterMultisigWallet(_) => {
                TransactionType::RegisterMultisigWallet
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDetails {
    pub recipient_address: WalletAddress,
    /// Amount as a decimal-digit string.
    pub amount: String,
}

/// Fields of `vote` and `unvote` transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegateDetails {
    pub delegate_address: WalletAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigDetails {
    pub new_sig_public_key: PublicKey,
    pub new_next_sig_public_key: PublicKey,
    pub new_next_sig_key_index: KeyIndex,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultisigDetails {
    pub new_multisig_public_key: PublicKey,
    pub new_next_multisig_public_key: PublicKey,
    pub new_next_multisig_key_index: KeyIndex,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgingDetails {
    pub new_forging_public_key: PublicKey,
    pub new_next_forging_public_key: PublicKey,
    pub new_next_forging_key_index: KeyIndex,
}

/// Validation view of a multisig wallet registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultisigWalletDetails {
    pub member_addresses: Vec<WalletAddress>,
    pub required_signature_count: u64,
}

/// How a transaction is authorized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionAuthorization {
    Single(SingleSignature),
    Multisig(MultisigApproval),
}

/// Key material and signature of a single-signature sender.
///
/// Exactly one of `sender_signature` (fully signed) or
/// `sender_signature_hash` (commitment only) is expected.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleSignature {
    pub sig_public_key: PublicKey,
    pub next_sig_public_key: PublicKey,
    pub next_sig_key_index: KeyIndex,
    pub sender_signature: Option<Signature>,
    pub sender_signature_hash: Option<SignatureHash>,
}

/// Signature set approving a multisig wallet transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigApproval {
    pub signatures: Vec<MultisigSignaturePacket>,
}

impl MultisigApproval {
    /// Number of distinct member addresses that signed.
    pub fn distinct_signer_count(&self) -> usize {
        self.signatures
            .iter()
            .map(|packet| packet.signer_address.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// One member's approval of a multisig wallet transaction.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultisigSignaturePacket {
    pub signer_address: WalletAddress,
    pub multisig_public_key: PublicKey,
    pub next_multisig_public_key: PublicKey,
    pub next_multisig_key_index: KeyIndex,
    pub signature: Option<Signature>,
    pub signature_hash: Option<SignatureHash>,
}

// =============================================================================
// BLOCKS
// =============================================================================

/// One delegate's endorsement of a block.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSignature {
    pub signer_address: WalletAddress,
    pub block_id: BlockId,
    pub signature: Option<Signature>,
    pub signature_hash: Option<SignatureHash>,
}

/// A block as exchanged between nodes.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: BlockId,
    pub height: u64,
    pub timestamp: Timestamp,
    /// Absent for the genesis block.
    pub previous_block_id: Option<BlockId>,
    pub number_of_transactions: u64,
    pub transactions: Vec<Transaction>,
    pub forger_address: WalletAddress,
    pub forging_public_key: PublicKey,
    pub next_forging_public_key: PublicKey,
    pub next_forging_key_index: KeyIndex,
    pub forger_signature: Option<Signature>,
    pub forger_signature_hash: Option<SignatureHash>,
    #[serde(default)]
    pub signatures: Vec<BlockSignature>,
}

impl Block {
    /// Returns true if this is the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.previous_block_id.is_none()
    }

    /// Number of distinct delegates that endorsed this block.
    pub fn distinct_signer_count(&self) -> usize {
        self.signatures
            .iter()
            .map(|signature| signature.signer_address.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Lightweight block summary used during sync negotiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockInfo {
    pub id: BlockId,
    pub height: u64,
    pub signatures: Vec<BlockSignature>,
}

// =============================================================================
// BUNDLES
// =============================================================================

/// A signed batch of transactions relayed as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBundle {
    pub transactions: Vec<Transaction>,
    pub signature: Signature,
}
