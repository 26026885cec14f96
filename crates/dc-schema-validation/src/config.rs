//! Validation policy configuration
//!
//! The policy is loaded once at process start and shared read-only between
//! every concurrently running validator. Two nodes with different policies
//! will disagree on validity, so nothing here is mutated after load.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Policy bounds every validator is judged against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ValidationPolicy {
    /// Chain suffix prefixed to every wallet address.
    pub network_symbol: String,
    /// Fewest transactions a block may carry.
    pub min_transactions_per_block: usize,
    /// Most transactions a block may carry.
    pub max_transactions_per_block: usize,
    /// Distinct delegate signatures required on a block.
    #[serde(alias = "minRequiredSignatures")]
    pub min_signatures: usize,
    /// Most signatures a block may carry.
    pub max_signatures: usize,
    /// Fewest members of a multisig wallet.
    pub min_multisig_members: usize,
    /// Most members of a multisig wallet.
    pub max_multisig_members: usize,
    /// Longest digit string allowed for amounts and fees.
    pub max_spendable_digits: usize,
    /// Longest transaction message.
    pub max_transaction_message_length: usize,
    /// Largest page size accepted in query parameters.
    pub max_query_limit: u64,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            network_symbol: "dpos".to_string(),
            min_transactions_per_block: 0,
            max_transactions_per_block: 300,
            min_signatures: 15,
            max_signatures: 21,
            min_multisig_members: 1,
            max_multisig_members: 20,
            max_spendable_digits: 25,
            max_transaction_message_length: 256,
            max_query_limit: 100,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("networkSymbol must not be empty")]
    EmptyNetworkSymbol,

    #[error("{min_name} ({min}) must not exceed {max_name} ({max})")]
    InvertedBounds {
        min_name: &'static str,
        min: usize,
        max_name: &'static str,
        max: usize,
    },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("Invalid policy document: {0}")]
    Parse(String),
}

impl ValidationPolicy {
    /// Load from environment variables, falling back to defaults.
    ///
    /// Each field has a `DC_` variable, e.g. `DC_NETWORK_SYMBOL` or
    /// `DC_MAX_TRANSACTIONS_PER_BLOCK`. Unparseable values are ignored; the
    /// resulting policy is validated before it is returned.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load overrides through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut policy = Self::default();

        if let Some(symbol) = lookup("DC_NETWORK_SYMBOL") {
            info!(network_symbol = %symbol, "Loaded network symbol from environment");
            policy.network_symbol = symbol;
        }

        override_from(&lookup, "DC_MIN_TRANSACTIONS_PER_BLOCK", &mut policy.min_transactions_per_block);
        override_from(&lookup, "DC_MAX_TRANSACTIONS_PER_BLOCK", &mut policy.max_transactions_per_block);
        override_from(&lookup, "DC_MIN_SIGNATURES", &mut policy.min_signatures);
        override_from(&lookup, "DC_MAX_SIGNATURES", &mut policy.max_signatures);
        override_from(&lookup, "DC_MIN_MULTISIG_MEMBERS", &mut policy.min_multisig_members);
        override_from(&lookup, "DC_MAX_MULTISIG_MEMBERS", &mut policy.max_multisig_members);
        override_from(&lookup, "DC_MAX_SPENDABLE_DIGITS", &mut policy.max_spendable_digits);
        override_from(
            &lookup,
            "DC_MAX_TRANSACTION_MESSAGE_LENGTH",
            &mut policy.max_transaction_message_length,
        );
        override_from(&lookup, "DC_MAX_QUERY_LIMIT", &mut policy.max_query_limit);

        policy.validate()?;
        Ok(policy)
    }

    /// Parse a camelCase JSON policy document. Missing fields keep defaults.
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        let policy: Self =
            serde_json::from_str(document).map_err(|e| ConfigError::Parse(e.to_string()))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Check the bounds are internally consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network_symbol.is_empty() {
            return Err(ConfigError::EmptyNetworkSymbol);
        }
        ordered(
            "minTransactionsPerBlock",
            self.min_transactions_per_block,
            "maxTransactionsPerBlock",
            self.max_transactions_per_block,
        )?;
        ordered(
            "minSignatures",
            self.min_signatures,
            "maxSignatures",
            self.max_signatures,
        )?;
        ordered(
            "minMultisigMembers",
            self.min_multisig_members,
            "maxMultisigMembers",
            self.max_multisig_members,
        )?;
        if self.max_spendable_digits == 0 {
            return Err(ConfigError::Zero("maxSpendableDigits"));
        }
        if self.max_query_limit == 0 {
            return Err(ConfigError::Zero("maxQueryLimit"));
        }
        Ok(())
    }
}

fn override_from<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(raw) = lookup(key) {
        match raw.parse() {
            Ok(value) => *target = value,
            Err(_) => warn!(key, value = %raw, "Ignoring unparseable policy override"),
        }
    }
}

fn ordered(
    min_name: &'static str,
    min: usize,
    max_name: &'static str,
    max: usize,
) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::InvertedBounds {
            min_name,
            min,
            max_name,
            max,
        });
    }
    Ok(())
}
