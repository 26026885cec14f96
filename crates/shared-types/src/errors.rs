//! # Error Types
//!
//! Errors raised while interpreting shared entity values.

use thiserror::Error;

/// A wire `type` tag that does not name one of the supported transaction kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Transaction type {0} is not supported")]
pub struct UnknownTransactionType(pub String);
