//! # Schema Validation Service
//!
//! Application service layer that implements the `SchemaValidationApi` trait.
//!
//! ## Architecture
//!
//! This is the hexagonal "application service" that:
//! - Implements the inbound port (`SchemaValidationApi`)
//! - Holds the shared, read-only `ValidationPolicy`
//! - Delegates every judgement to the domain layer
//!
//! It also offers parallel batch validation for mempool intake and typed
//! decoding of structures that have already passed validation.

use std::sync::Arc;

use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared_types::{Block, BlockSignature, Transaction};
use tracing::{debug, warn};

use crate::config::ValidationPolicy;
use crate::domain::blocks::{
    validate_block_schema, validate_forged_block_schema, validate_fully_signed_block_schema,
    verify_block_info_schema,
};
use crate::domain::bundles::{
    verify_block_signatures_response_schema, verify_block_signatures_schema, verify_blocks_response,
    verify_pagination_schema, verify_transaction_bundle_schema,
};
use crate::domain::errors::{SchemaError, SchemaResult};
use crate::domain::transactions::{validate_multisig_transaction_schema, validate_transaction_schema};
use crate::ports::inbound::SchemaValidationApi;

/// Schema Validation Service.
///
/// Cheap to clone; clones share one policy.
#[derive(Debug, Clone)]
pub struct SchemaValidationService {
    policy: Arc<ValidationPolicy>,
}

impl SchemaValidationService {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self::with_shared(Arc::new(policy))
    }

    /// Build on a policy already shared with other components.
    pub fn with_shared(policy: Arc<ValidationPolicy>) -> Self {
        Self { policy }
    }

    pub fn with_defaults() -> Self {
        Self::new(ValidationPolicy::default())
    }

    pub fn shared_policy(&self) -> Arc<ValidationPolicy> {
        Arc::clone(&self.policy)
    }

    /// Validate many single-signature transactions in parallel.
    ///
    /// Returns one result per input, in input order.
    pub fn validate_transactions_batch(
        &self,
        transactions: &[Value],
        full_check: bool,
    ) -> Vec<SchemaResult<()>> {
        let results: Vec<SchemaResult<()>> = transactions
            .par_iter()
            .map(|transaction| validate_transaction_schema(transaction, &self.policy, full_check))
            .collect();

        let rejected = results.iter().filter(|r| r.is_err()).count();
        debug!(
            total = transactions.len(),
            rejected = rejected,
            "Validated transaction batch"
        );
        results
    }

    /// Validate, then decode into a typed transaction.
    pub fn decode_transaction(&self, transaction: &Value, full_check: bool) -> SchemaResult<Transaction> {
        self.validate_transaction(transaction, full_check)?;
        decode(transaction, "Transaction")
    }

    /// Validate, then decode into a typed block.
    pub fn decode_block(&self, block: &Value, full_check: bool) -> SchemaResult<Block> {
        self.validate_block(block, full_check)?;
        decode(block, "Block")
    }

    /// Decode a block signature. The caller is expected to have validated
    /// the list it came from.
    pub fn decode_block_signature(&self, signature: &Value) -> SchemaResult<BlockSignature> {
        decode(signature, "Block signature")
    }
}

impl Default for SchemaValidationService {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn decode<T: DeserializeOwned>(value: &Value, structure: &'static str) -> SchemaResult<T> {
    T::deserialize(value).map_err(|e| SchemaError::Malformed {
        structure,
        reason: e.to_string(),
    })
}

/// Log the outcome of one validation and pass it through.
fn observe(structure: &'static str, result: SchemaResult<()>) -> SchemaResult<()> {
    match &result {
        Ok(()) => debug!(structure, "Accepted"),
        Err(e) => warn!(structure, kind = ?e.kind(), error = %e, "Rejected"),
    }
    result
}

impl SchemaValidationApi for SchemaValidationService {
    fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    fn validate_transaction(&self, transaction: &Value, full_check: bool) -> SchemaResult<()> {
        observe(
            "Transaction",
            validate_transaction_schema(transaction, &self.policy, full_check),
        )
    }

    fn validate_multisig_transaction(
        &self,
        transaction: &Value,
        required_signature_count: usize,
        full_check: bool,
    ) -> SchemaResult<()> {
        observe(
            "Multisig transaction",
            validate_multisig_transaction_schema(
                transaction,
                &self.policy,
                required_signature_count,
                full_check,
            ),
        )
    }

    fn validate_forged_block(&self, block: &Value) -> SchemaResult<()> {
        observe("Forged block", validate_forged_block_schema(block, &self.policy))
    }

    fn validate_fully_signed_block(&self, block: &Value) -> SchemaResult<()> {
        observe(
            "Fully signed block",
            validate_fully_signed_block_schema(block, &self.policy),
        )
    }

    fn validate_block(&self, block: &Value, full_check: bool) -> SchemaResult<()> {
        observe("Block", validate_block_schema(block, &self.policy, full_check))
    }

    fn verify_block_info(&self, block_info: &Value) -> SchemaResult<()> {
        observe("Block info", verify_block_info_schema(block_info, &self.policy))
    }

    fn verify_transaction_bundle(&self, bundle: &Value) -> SchemaResult<()> {
        observe("Transaction bundle", verify_transaction_bundle_schema(bundle))
    }

    fn verify_block_signatures(&self, signatures: &Value, min_required: usize) -> SchemaResult<()> {
        observe(
            "Block signatures",
            verify_block_signatures_schema(signatures, &self.policy, min_required),
        )
    }

    fn verify_block_signatures_response(
        &self,
        response: &Value,
        block_id: &str,
        min_required: usize,
    ) -> SchemaResult<()> {
        observe(
            "Block signatures response",
            verify_block_signatures_response_schema(response, &self.policy, block_id, min_required),
        )
    }

    fn verify_blocks_response(&self, response: &Value) -> SchemaResult<()> {
        observe("Blocks response", verify_blocks_response(response))
    }

    fn verify_pagination(&self, query: &Value) -> SchemaResult<()> {
        observe("Query", verify_pagination_schema(query, &self.policy))
    }
}
