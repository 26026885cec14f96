//! # Primitive Validators
//!
//! Field-level checks every composite validator is built from. Each check
//! takes the packet holding the field plus the field name, so that failures
//! name the offending property.
//!
//! String lengths are measured in UTF-16 code units, which is how every
//! other node on the network measures them.

use serde_json::{Map, Value};
use shared_types::{
    ID_LENGTH, MAX_SAFE_INTEGER, PUBLIC_KEY_LENGTH, SIGNATURE_HASH_LENGTH, SIGNATURE_LENGTH,
    WALLET_ADDRESS_BASE_LENGTH,
};

use super::errors::{SchemaError, SchemaResult};

/// A decoded JSON object under validation.
pub type Packet = Map<String, Value>;

/// Describes a JSON value for error messages.
pub fn json_kind(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "a boolean",
        Some(Value::Number(_)) => "a number",
        Some(Value::String(_)) => "a string",
        Some(Value::Array(_)) => "an array",
        Some(Value::Object(_)) => "an object",
    }
}

fn wire_len(value: &str) -> usize {
    value.encode_utf16().count()
}

/// Treat `value` as the top-level structure named `structure`.
pub fn as_packet<'a>(value: &'a Value, structure: &'static str) -> SchemaResult<&'a Packet> {
    match value {
        Value::Object(packet) => Ok(packet),
        Value::Null => Err(SchemaError::MissingStructure { structure }),
        other => Err(SchemaError::FieldType {
            field: structure,
            expected: "an object",
            found: json_kind(Some(other)),
        }),
    }
}

/// Returns `field` as a string.
pub fn string_field<'a>(packet: &'a Packet, field: &'static str) -> SchemaResult<&'a str> {
    match packet.get(field) {
        Some(Value::String(value)) => Ok(value),
        other => Err(SchemaError::FieldType {
            field,
            expected: "a string",
            found: json_kind(other),
        }),
    }
}

/// Returns `field` as an array.
pub fn array_field<'a>(packet: &'a Packet, field: &'static str) -> SchemaResult<&'a [Value]> {
    match packet.get(field) {
        Some(Value::Array(values)) => Ok(values),
        other => Err(SchemaError::FieldType {
            field,
            expected: "an array",
            found: json_kind(other),
        }),
    }
}

/// Returns `field` as an integer in `[min, max]`.
///
/// Integral floats such as `5.0` are accepted; fractional numbers are a type
/// error and anything negative or above `max` is a range error.
pub fn integer_field(packet: &Packet, field: &'static str, min: u64, max: u64) -> SchemaResult<u64> {
    integer_value(field, packet.get(field), min, max)
}

fn integer_value(field: &'static str, value: Option<&Value>, min: u64, max: u64) -> SchemaResult<u64> {
    let number = match value {
        Some(Value::Number(number)) => number,
        other => {
            return Err(SchemaError::FieldType {
                field,
                expected: "an integer",
                found: json_kind(other),
            })
        }
    };

    let out_of_range = |value: String| SchemaError::FieldRange {
        field,
        value,
        min,
        max,
    };

    if let Some(value) = number.as_u64() {
        if value < min || value > max {
            return Err(out_of_range(value.to_string()));
        }
        return Ok(value);
    }
    if let Some(value) = number.as_i64() {
        return Err(out_of_range(value.to_string()));
    }

    let value = number.as_f64().unwrap_or(f64::NAN);
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(SchemaError::FieldType {
            field,
            expected: "an integer",
            found: "a fractional number",
        });
    }
    if value < min as f64 || value > max as f64 {
        return Err(out_of_range(number.to_string()));
    }
    Ok(value as u64)
}

fn exact_length(field: &'static str, value: &str, expected: usize) -> SchemaResult<()> {
    let actual = wire_len(value);
    if actual != expected {
        return Err(SchemaError::FieldLength {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}

fn max_length(field: &'static str, value: &str, max: usize) -> SchemaResult<()> {
    let actual = wire_len(value);
    if actual > max {
        return Err(SchemaError::FieldTooLong { field, max, actual });
    }
    Ok(())
}

fn fixed_length_string(packet: &Packet, field: &'static str, expected: usize) -> SchemaResult<()> {
    let value = string_field(packet, field)?;
    exact_length(field, value, expected)
}

// =============================================================================
// ADDRESSES, KEYS AND SIGNATURES
// =============================================================================

/// Validate a wallet address held in `packet[field]`.
pub fn validate_wallet_address<'a>(
    packet: &'a Packet,
    field: &'static str,
    network_symbol: &str,
) -> SchemaResult<&'a str> {
    validate_wallet_address_value(field, packet.get(field), network_symbol)
}

/// Validate a wallet address that is not a named property (e.g. a list item).
///
/// An address is the network symbol followed by
/// [`WALLET_ADDRESS_BASE_LENGTH`] lowercase hex characters. Uppercase digits
/// are rejected so each wallet has exactly one spelling and signer sets keyed
/// on the address string cannot count one wallet twice.
pub fn validate_wallet_address_value<'a>(
    field: &'static str,
    value: Option<&'a Value>,
    network_symbol: &str,
) -> SchemaResult<&'a str> {
    let address = match value {
        Some(Value::String(address)) => address,
        other => {
            return Err(SchemaError::FieldType {
                field,
                expected: "a string",
                found: json_kind(other),
            })
        }
    };

    exact_length(
        field,
        address,
        WALLET_ADDRESS_BASE_LENGTH + wire_len(network_symbol),
    )?;

    let body = address
        .strip_prefix(network_symbol)
        .ok_or_else(|| SchemaError::FieldFormat {
            field,
            reason: format!("must start with the network symbol {network_symbol}"),
        })?;

    if hex::decode(body).is_err() || body.bytes().any(|b| b.is_ascii_uppercase()) {
        return Err(SchemaError::FieldFormat {
            field,
            reason: "must be lowercase hexadecimal after the network symbol".to_string(),
        });
    }
    Ok(address)
}

pub fn validate_public_key(packet: &Packet, field: &'static str) -> SchemaResult<()> {
    fixed_length_string(packet, field, PUBLIC_KEY_LENGTH)
}

/// Validate the index of the next usable one-time-signature leaf.
pub fn validate_key_index(packet: &Packet, field: &'static str) -> SchemaResult<u64> {
    integer_field(packet, field, 0, MAX_SAFE_INTEGER)
}

pub fn validate_signature(packet: &Packet, field: &'static str) -> SchemaResult<()> {
    fixed_length_string(packet, field, SIGNATURE_LENGTH)
}

pub fn validate_signature_hash(packet: &Packet, field: &'static str) -> SchemaResult<()> {
    fixed_length_string(packet, field, SIGNATURE_HASH_LENGTH)
}

/// Validate either the full signature or its commitment hash.
///
/// With `full_check` only `signature_field` is checked, otherwise only
/// `hash_field`. Returns the name of the field that was checked so that it
/// can be added to the structure's allow-list.
pub fn validate_signature_or_hash(
    packet: &Packet,
    signature_field: &'static str,
    hash_field: &'static str,
    full_check: bool,
) -> SchemaResult<&'static str> {
    if full_check {
        validate_signature(packet, signature_field)?;
        Ok(signature_field)
    } else {
        validate_signature_hash(packet, hash_field)?;
        Ok(hash_field)
    }
}

// =============================================================================
// IDS, HEIGHTS, TIMESTAMPS AND COUNTS
// =============================================================================

pub fn validate_block_id(packet: &Packet, field: &'static str) -> SchemaResult<()> {
    fixed_length_string(packet, field, ID_LENGTH)
}

pub fn validate_transaction_id(packet: &Packet, field: &'static str) -> SchemaResult<()> {
    fixed_length_string(packet, field, ID_LENGTH)
}

pub fn validate_block_height(packet: &Packet, field: &'static str) -> SchemaResult<u64> {
    integer_field(packet, field, 0, MAX_SAFE_INTEGER)
}

/// Validate a millisecond timestamp.
pub fn validate_timestamp(packet: &Packet, field: &'static str) -> SchemaResult<u64> {
    integer_field(packet, field, 0, MAX_SAFE_INTEGER)
}

pub fn validate_count(packet: &Packet, field: &'static str) -> SchemaResult<u64> {
    integer_field(packet, field, 0, MAX_SAFE_INTEGER)
}

// =============================================================================
// AMOUNTS, FEES AND MESSAGES
// =============================================================================

/// Token quantities travel as decimal-digit strings so no node ever rounds
/// them through a float. Only the digit count is bounded here.
fn validate_digit_string(
    packet: &Packet,
    field: &'static str,
    max_spendable_digits: usize,
) -> SchemaResult<()> {
    let value = string_field(packet, field)?;
    max_length(field, value, max_spendable_digits)?;
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SchemaError::FieldFormat {
            field,
            reason: "must be a non-empty string of decimal digits".to_string(),
        });
    }
    Ok(())
}

pub fn validate_transaction_amount(
    packet: &Packet,
    field: &'static str,
    max_spendable_digits: usize,
) -> SchemaResult<()> {
    validate_digit_string(packet, field, max_spendable_digits)
}

pub fn validate_transaction_fee(
    packet: &Packet,
    field: &'static str,
    max_spendable_digits: usize,
) -> SchemaResult<()> {
    validate_digit_string(packet, field, max_spendable_digits)
}

pub fn validate_transaction_message(
    packet: &Packet,
    field: &'static str,
    max_transaction_message_length: usize,
) -> SchemaResult<()> {
    let message = string_field(packet, field)?;
    max_length(field, message, max_transaction_message_length)
}

// =============================================================================
// QUERY PARAMETERS
// =============================================================================

pub fn validate_offset(packet: &Packet, field: &'static str) -> SchemaResult<u64> {
    integer_field(packet, field, 0, MAX_SAFE_INTEGER)
}

pub fn validate_limit(packet: &Packet, field: &'static str, max_limit: u64) -> SchemaResult<u64> {
    integer_field(packet, field, 1, max_limit)
}

pub fn validate_sort_order(packet: &Packet, field: &'static str) -> SchemaResult<()> {
    match string_field(packet, field)? {
        "asc" | "desc" => Ok(()),
        other => Err(SchemaError::FieldFormat {
            field,
            reason: format!("must be asc or desc, not {other}"),
        }),
    }
}
