//! Signer-set quorum checks shared by block endorsements and multisig
//! approvals.
//!
//! Signers are deduplicated by address only. Two different signature blobs
//! under one address count once and the second is rejected outright; this
//! is one vote per address and must not change without a network upgrade.

use std::collections::HashSet;

use super::errors::{SchemaError, SchemaResult};

/// Distinct signer addresses admitted so far.
#[derive(Debug)]
pub struct SignerSet<'a> {
    self_address: Option<&'a str>,
    signers: HashSet<&'a str>,
}

impl<'a> SignerSet<'a> {
    /// `self_address` is the forger of a block or the multisig wallet
    /// itself; it may never endorse its own structure.
    pub fn new(self_address: Option<&'a str>) -> Self {
        Self {
            self_address,
            signers: HashSet::new(),
        }
    }

    /// Admit one signer, rejecting self-endorsement and repeats.
    pub fn admit(&mut self, signer_address: &'a str) -> SchemaResult<()> {
        if self.self_address == Some(signer_address) {
            return Err(SchemaError::SelfSignature {
                signer_address: signer_address.to_string(),
            });
        }
        if !self.signers.insert(signer_address) {
            return Err(SchemaError::DuplicateSigner {
                signer_address: signer_address.to_string(),
            });
        }
        Ok(())
    }

    pub fn distinct_count(&self) -> usize {
        self.signers.len()
    }

    /// Require at least `min_required` distinct signers.
    pub fn require_quorum(&self, min_required: usize) -> SchemaResult<()> {
        let distinct = self.distinct_count();
        if distinct < min_required {
            return Err(SchemaError::Quorum {
                distinct,
                required: min_required,
            });
        }
        Ok(())
    }
}
