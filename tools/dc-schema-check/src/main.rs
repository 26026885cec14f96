//! dc-schema-check: validate one JSON structure against the schema rules a
//! DPoS-Chain node applies to peer input.
//!
//! Exits 0 when the structure is accepted, 1 when it is rejected and 2 on
//! usage or I/O errors.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use dc_schema_validation::{SchemaResult, SchemaValidationApi, SchemaValidationService, ValidationPolicy};

/// Structure kinds the checker understands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Kind {
    /// Transaction from a single-signature wallet
    Transaction,
    /// Transaction from a multisig wallet
    MultisigTransaction,
    /// Block as received from a peer
    Block,
    /// Block signed by its forger only
    ForgedBlock,
    /// Block with a full delegate quorum
    SignedBlock,
    /// `{id, height, signatures}` summary
    BlockInfo,
    /// `{transactions, signature}` bundle
    Bundle,
    /// List of block signatures
    Signatures,
}

/// dc-schema-check: DPoS-Chain schema checker
#[derive(Parser, Debug)]
#[command(name = "dc-schema-check")]
#[command(about = "Validate a JSON block, transaction or signature set")]
struct Args {
    /// Kind of structure in the file
    #[arg(value_enum)]
    kind: Kind,

    /// JSON file to check, or `-` for stdin
    file: PathBuf,

    /// Accept signature hashes instead of full signatures
    #[arg(long)]
    hash_only: bool,

    /// JSON policy document; defaults plus DC_* environment overrides otherwise
    #[arg(short, long)]
    policy: Option<PathBuf>,

    /// Signatures required for multisig transactions and signature lists
    #[arg(short, long)]
    required_signatures: Option<usize>,

    /// Block the signature list must belong to
    #[arg(long)]
    block_id: Option<String>,
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to install log subscriber: {e}");
    }

    let args = Args::parse();
    match run(&args) {
        Ok(Ok(())) => {
            println!("accepted");
            ExitCode::SUCCESS
        }
        Ok(Err(rejection)) => {
            println!("rejected ({:?}): {rejection}", rejection.kind());
            ExitCode::from(1)
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> Result<SchemaResult<()>> {
    let policy = load_policy(args.policy.as_deref())?;
    info!(network_symbol = %policy.network_symbol, "Policy loaded");

    let document = read_document(&args.file)?;
    let candidate: Value = serde_json::from_str(&document)
        .with_context(|| format!("{} is not valid JSON", args.file.display()))?;

    let service = SchemaValidationService::new(policy);
    let full_check = !args.hash_only;
    let required = args
        .required_signatures
        .unwrap_or(service.policy().min_signatures);

    let outcome = match args.kind {
        Kind::Transaction => service.validate_transaction(&candidate, full_check),
        Kind::MultisigTransaction => {
            service.validate_multisig_transaction(&candidate, required, full_check)
        }
        Kind::Block => service.validate_block(&candidate, full_check),
        Kind::ForgedBlock => service.validate_forged_block(&candidate),
        Kind::SignedBlock => service.validate_fully_signed_block(&candidate),
        Kind::BlockInfo => service.verify_block_info(&candidate),
        Kind::Bundle => service.verify_transaction_bundle(&candidate),
        Kind::Signatures => match &args.block_id {
            Some(block_id) => service.verify_block_signatures_response(&candidate, block_id, required),
            None => service.verify_block_signatures(&candidate, required),
        },
    };
    Ok(outcome)
}

fn load_policy(path: Option<&Path>) -> Result<ValidationPolicy> {
    let Some(path) = path else {
        return ValidationPolicy::from_env().context("Invalid policy from environment");
    };
    let document = fs::read_to_string(path)
        .with_context(|| format!("Failed to read policy {}", path.display()))?;
    ValidationPolicy::from_json_str(&document)
        .with_context(|| format!("Invalid policy {}", path.display()))
}

fn read_document(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut document = String::new();
        io::stdin()
            .read_to_string(&mut document)
            .context("Failed to read stdin")?;
        return Ok(document);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
