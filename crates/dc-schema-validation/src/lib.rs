//! # Schema Validation Subsystem
//!
//! Structural validation for DPoS-Chain: every transaction, block, signature
//! list and network response passes through here before the rest of the
//! node trusts it.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Pure validators over decoded JSON, no I/O
//! - **Ports Layer** (`ports/`): The inbound API trait
//! - **Service Layer** (`service.rs`): Wires the policy and domain to the port
//! - **Config** (`config.rs`): The `ValidationPolicy` every node must share
//!
//! ## Guarantees
//!
//! - **Fail fast**: each call returns the first violation in a fixed check
//!   order, never a list
//! - **Allow-lists last**: an unexpected property is only reported once every
//!   known field has passed
//! - **One vote per address**: signer quorums deduplicate by address, and a
//!   forger or multisig wallet can never endorse itself
//!
//! Validators never verify signatures cryptographically; they check that the
//! fields a verifier needs are present and well formed.

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use config::{ConfigError, ValidationPolicy};
pub use domain::blocks::{
    validate_block_schema, validate_block_signature_schema, validate_forged_block_schema,
    validate_fully_signed_block_schema, validate_signature_quorum, verify_block_info_schema,
    QuorumRequirement,
};
pub use domain::bundles::{
    verify_block_signatures_response_schema, verify_block_signatures_schema, verify_blocks_response,
    verify_pagination_schema, verify_transaction_bundle_schema,
};
pub use domain::errors::{SchemaError, SchemaErrorKind, SchemaResult};
pub use domain::primitives::Packet;
pub use domain::properties::{ensure_no_invalid_property, find_invalid_property};
pub use domain::quorum::SignerSet;
pub use domain::transactions::{
    validate_multisig_signature_schema, validate_multisig_transaction_schema,
    validate_multisig_wallet, validate_transaction_schema, validate_transaction_type,
};
pub use ports::inbound::SchemaValidationApi;
pub use service::SchemaValidationService;
