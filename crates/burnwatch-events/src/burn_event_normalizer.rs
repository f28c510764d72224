//! Shape detection for raw burn-event webhook records.
//!
//! Providers disagree on field names (camelCase, snake_case, short aliases)
//! and on nesting (`rawTokenAmount` objects, single objects instead of
//! arrays). Each attribute is resolved by trying its known aliases in order
//! and falling back to a default when none match.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::burn_event_contract::{
    scale_token_amount, symbol_from_mint, CanonicalBurnEvent, NormalizeOutcome, ValueSource,
    DEFAULT_TOKEN_DECIMALS, LAMPORTS_PER_SOL, UNKNOWN_MINT, UNKNOWN_SIGNATURE,
};

const NATIVE_TRANSFER_KEYS: &[&str] = &["nativeTransfers", "native_transfers", "native"];
const TOKEN_TRANSFER_KEYS: &[&str] = &["tokenTransfers", "token_transfers", "token"];
const MINT_KEYS: &[&str] = &["mint", "tokenMint", "token_mint"];
const SYMBOL_KEYS: &[&str] = &["symbol", "tokenSymbol", "token_symbol"];
const TOKEN_AMOUNT_KEYS: &[&str] = &["tokenAmount", "token_amount", "rawAmount", "amount"];
const DECIMALS_KEYS: &[&str] = &["decimals", "tokenDecimals", "token_decimals"];
const MARKET_CAP_KEYS: &[&str] = &["marketCap", "market_cap", "mcap"];
const SIGNATURE_KEYS: &[&str] = &["signature", "transactionSignature", "txSignature"];
const TIMESTAMP_KEYS: &[&str] = &["timestamp", "blockTime", "block_time"];
const LAMPORT_KEYS: &[&str] = &["amount", "lamports"];
const MAX_TOKEN_DECIMALS: u64 = 24;
const MILLISECOND_TIMESTAMP_FLOOR: i64 = 100_000_000_000;

/// Splits a webhook body into event records: arrays are iterated, any other
/// value is a single record.
pub fn split_webhook_payload(payload: &Value) -> Vec<&Value> {
    match payload {
        Value::Array(records) => records.iter().collect(),
        other => vec![other],
    }
}

fn lookup<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| record.get(*key).filter(|value| !value.is_null()))
}

/// First entry of a transfer list; a bare object counts as a one-entry list.
fn first_transfer<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    match lookup(record, keys)? {
        Value::Array(entries) => entries.iter().find(|entry| entry.is_object()),
        entry @ Value::Object(_) => Some(entry),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn number_at(record: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|key| record.get(*key).and_then(as_number))
}

fn string_at(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        record
            .get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    })
}

fn decimals_at(record: &Value) -> Option<u32> {
    let raw = DECIMALS_KEYS.iter().find_map(|key| match record.get(*key)? {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    })?;
    if raw > MAX_TOKEN_DECIMALS {
        return None;
    }
    u32::try_from(raw).ok()
}

fn sol_amount(record: &Value) -> f64 {
    first_transfer(record, NATIVE_TRANSFER_KEYS)
        .and_then(|entry| number_at(entry, LAMPORT_KEYS))
        .map(|lamports| lamports.max(0.0) / LAMPORTS_PER_SOL)
        .unwrap_or(0.0)
}

/// Raw amount and decimals of a token transfer, preferring a nested
/// `rawTokenAmount` object when present.
fn token_amount_parts(entry: &Value) -> (f64, Option<u32>) {
    if let Some(nested) = entry.get("rawTokenAmount").filter(|value| value.is_object()) {
        let amount = number_at(nested, TOKEN_AMOUNT_KEYS);
        let decimals = decimals_at(nested).or_else(|| decimals_at(entry));
        if let Some(amount) = amount {
            return (amount.max(0.0), decimals);
        }
    }
    let amount = number_at(entry, TOKEN_AMOUNT_KEYS).unwrap_or(0.0).max(0.0);
    (amount, decimals_at(entry))
}

fn block_time(record: &Value) -> Option<DateTime<Utc>> {
    let raw = TIMESTAMP_KEYS
        .iter()
        .find_map(|key| record.get(*key).and_then(Value::as_i64))?;
    if raw <= 0 {
        return None;
    }
    if raw >= MILLISECOND_TIMESTAMP_FLOOR {
        return DateTime::from_timestamp_millis(raw);
    }
    DateTime::from_timestamp(raw, 0)
}

/// Maps one raw event record onto a `CanonicalBurnEvent`.
///
/// Missing pieces are defaulted; only a record with neither a token transfer
/// nor a mint yields `NormalizeOutcome::Nothing`.
pub fn normalize_burn_event(record: &Value) -> NormalizeOutcome {
    if !record.is_object() {
        return NormalizeOutcome::Nothing {
            reason: "event record is not an object",
        };
    }

    let token_transfer = first_transfer(record, TOKEN_TRANSFER_KEYS);
    let top_level_mint = string_at(record, MINT_KEYS);
    let token_mint = match token_transfer {
        Some(entry) => string_at(entry, MINT_KEYS)
            .or(top_level_mint)
            .unwrap_or_else(|| UNKNOWN_MINT.to_string()),
        None => match top_level_mint {
            Some(mint) => mint,
            None => {
                return NormalizeOutcome::Nothing {
                    reason: "no token mint or token transfer data",
                }
            }
        },
    };

    let (raw_token_amount, payload_decimals) =
        token_transfer.map(token_amount_parts).unwrap_or((0.0, None));
    let (token_decimals, decimals_source) = match payload_decimals {
        Some(decimals) => (decimals, ValueSource::Payload),
        None => (DEFAULT_TOKEN_DECIMALS, ValueSource::Fallback),
    };

    let payload_symbol = token_transfer
        .and_then(|entry| string_at(entry, SYMBOL_KEYS))
        .or_else(|| string_at(record, SYMBOL_KEYS));
    let (token_symbol, symbol_source) = match payload_symbol {
        Some(symbol) => (symbol, ValueSource::Payload),
        None => (symbol_from_mint(&token_mint), ValueSource::Fallback),
    };

    let market_cap = number_at(record, MARKET_CAP_KEYS)
        .or_else(|| token_transfer.and_then(|entry| number_at(entry, MARKET_CAP_KEYS)))
        .filter(|value| *value > 0.0);

    let signature =
        string_at(record, SIGNATURE_KEYS).unwrap_or_else(|| UNKNOWN_SIGNATURE.to_string());

    NormalizeOutcome::Event(CanonicalBurnEvent {
        signature,
        sol_amount: sol_amount(record),
        token_mint,
        token_symbol,
        symbol_source,
        token_amount: scale_token_amount(raw_token_amount, token_decimals),
        raw_token_amount,
        token_decimals,
        decimals_source,
        market_cap,
        block_time: block_time(record),
    })
}
