//! # Shared Types Crate
//!
//! This crate contains the chain entities exchanged between nodes of a
//! delegated-proof-of-stake network, together with the fixed wire lengths
//! that every implementation must agree on bit-for-bit.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Field names, transaction kinds and fixed
//!   lengths are defined here and nowhere else.
//! - **Closed Transaction Set**: [`TransactionType`] is an exhaustive enum;
//!   adding a kind is a consensus change and requires a code change.
//! - **Camel-case Wire Format**: All entities serialize with the camelCase
//!   property names used on the wire.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
