//! # Schema Errors
//!
//! Every validator fails fast with exactly one `SchemaError`. The variant
//! carries the structured detail; [`SchemaError::kind`] gives the
//! machine-checkable category that callers branch on.

use thiserror::Error;

/// Machine-checkable category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaErrorKind {
    /// Required top-level object absent.
    MissingStructure,
    /// Field present (or absent) with the wrong primitive type.
    FieldType,
    /// Field of the wrong fixed length, or longer than its maximum.
    FieldLength,
    /// Field with the right type and length but a malformed body.
    FieldFormat,
    /// Numeric field outside its allowed range.
    FieldRange,
    /// Collection cardinality outside policy bounds.
    CountBounds,
    /// Too few distinct signers.
    Quorum,
    /// The same signer (or member) appears twice.
    DuplicateSigner,
    /// The forger or wallet endorses itself.
    SelfSignature,
    /// Transaction `type` outside the supported set.
    UnknownType,
    /// Property outside the structure's allow-list.
    UnexpectedProperty,
    /// Cross-reference between two fields does not match.
    Mismatch,
    /// Typed decoding failed after validation.
    Malformed,
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{structure} did not exist")]
    MissingStructure { structure: &'static str },

    #[error("{field} must be {expected} but was {found}")]
    FieldType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{field} must have a length of {expected} characters but had {actual}")]
    FieldLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{field} must not exceed {max} characters but had {actual}")]
    FieldTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("{field} is malformed: {reason}")]
    FieldFormat { field: &'static str, reason: String },

    #[error("{field} value {value} is outside the range [{min}, {max}]")]
    FieldRange {
        field: &'static str,
        value: String,
        min: u64,
        max: u64,
    },

    #[error("{collection} count {count} is outside the range [{min}, {max}]")]
    CountBounds {
        collection: &'static str,
        count: usize,
        min: usize,
        max: usize,
    },

    #[error("numberOfTransactions is {declared} but the block contains {actual} transactions")]
    TransactionCountMismatch { declared: u64, actual: usize },

    #[error("Insufficient signatures: {distinct} distinct signers, required {required}")]
    Quorum { distinct: usize, required: usize },

    #[error("Signer {signer_address} appears more than once")]
    DuplicateSigner { signer_address: String },

    #[error("Member {member_address} appears more than once")]
    DuplicateMember { member_address: String },

    #[error("Address {signer_address} cannot endorse itself")]
    SelfSignature { signer_address: String },

    #[error("Transaction type {type_name} is not supported")]
    UnknownType { type_name: String },

    #[error("{structure} had an unexpected property {property}")]
    UnexpectedProperty {
        structure: &'static str,
        property: String,
    },

    #[error("Signature references block {actual} instead of {expected}")]
    BlockIdMismatch { expected: String, actual: String },

    #[error("{structure} could not be decoded: {reason}")]
    Malformed {
        structure: &'static str,
        reason: String,
    },

    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<SchemaError>,
    },
}

impl SchemaError {
    /// Returns the category of this failure. Context wrappers report the
    /// category of the error they wrap.
    pub fn kind(&self) -> SchemaErrorKind {
        match self {
            SchemaError::MissingStructure { .. } => SchemaErrorKind::MissingStructure,
            SchemaError::FieldType { .. } => SchemaErrorKind::FieldType,
            SchemaError::FieldLength { .. } | SchemaError::FieldTooLong { .. } => {
                SchemaErrorKind::FieldLength
            }
            SchemaError::FieldFormat { .. } => SchemaErrorKind::FieldFormat,
            SchemaError::FieldRange { .. } => SchemaErrorKind::FieldRange,
            SchemaError::CountBounds { .. } | SchemaError::TransactionCountMismatch { .. } => {
                SchemaErrorKind::CountBounds
            }
            SchemaError::Quorum { .. } => SchemaErrorKind::Quorum,
            SchemaError::DuplicateSigner { .. } | SchemaError::DuplicateMember { .. } => {
                SchemaErrorKind::DuplicateSigner
            }
            SchemaError::SelfSignature { .. } => SchemaErrorKind::SelfSignature,
            SchemaError::UnknownType { .. } => SchemaErrorKind::UnknownType,
            SchemaError::UnexpectedProperty { .. } => SchemaErrorKind::UnexpectedProperty,
            SchemaError::BlockIdMismatch { .. } => SchemaErrorKind::Mismatch,
            SchemaError::Malformed { .. } => SchemaErrorKind::Malformed,
            SchemaError::Context { source, .. } => source.kind(),
        }
    }

    /// Wraps this error with a leading description.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        SchemaError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping any context wrappers.
    pub fn root(&self) -> &SchemaError {
        match self {
            SchemaError::Context { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type for validation operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
