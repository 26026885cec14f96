//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of this subsystem.

use serde_json::Value;

use crate::config::ValidationPolicy;
use crate::domain::errors::SchemaResult;

/// Primary Schema Validation API.
///
/// Every method judges one already-decoded candidate against the policy the
/// implementation was built with. Implementations must be thread-safe
/// (`Send + Sync`) since mempool admission and block sync call in from many
/// threads at once.
pub trait SchemaValidationApi: Send + Sync {
    /// The policy every judgement is made against.
    fn policy(&self) -> &ValidationPolicy;

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Validate a transaction from a single-signature wallet.
    fn validate_transaction(&self, transaction: &Value, full_check: bool) -> SchemaResult<()>;

    /// Validate a transaction from a multisig wallet whose registration
    /// requires `required_signature_count` member signatures.
    fn validate_multisig_transaction(
        &self,
        transaction: &Value,
        required_signature_count: usize,
        full_check: bool,
    ) -> SchemaResult<()>;

    // =========================================================================
    // Blocks
    // =========================================================================

    /// Block as signed by its forger only.
    fn validate_forged_block(&self, block: &Value) -> SchemaResult<()>;

    /// Block carrying a quorum of full delegate signatures.
    fn validate_fully_signed_block(&self, block: &Value) -> SchemaResult<()>;

    /// Block as received from a peer.
    fn validate_block(&self, block: &Value, full_check: bool) -> SchemaResult<()>;

    fn verify_block_info(&self, block_info: &Value) -> SchemaResult<()>;

    // =========================================================================
    // Bundles and Responses
    // =========================================================================

    fn verify_transaction_bundle(&self, bundle: &Value) -> SchemaResult<()>;

    fn verify_block_signatures(&self, signatures: &Value, min_required: usize) -> SchemaResult<()>;

    fn verify_block_signatures_response(
        &self,
        response: &Value,
        block_id: &str,
        min_required: usize,
    ) -> SchemaResult<()>;

    fn verify_blocks_response(&self, response: &Value) -> SchemaResult<()>;

    fn verify_pagination(&self, query: &Value) -> SchemaResult<()>;
}
