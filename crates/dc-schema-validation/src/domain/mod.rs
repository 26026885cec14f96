//! Domain layer for schema validation
//!
//! Pure functions over decoded JSON. Nothing in here performs I/O or holds
//! state beyond a single call.

pub mod blocks;
pub mod bundles;
pub mod errors;
pub mod primitives;
pub mod properties;
pub mod quorum;
pub mod transactions;

pub use errors::{SchemaError, SchemaErrorKind, SchemaResult};
pub use primitives::Packet;
