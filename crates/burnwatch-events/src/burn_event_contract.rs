use chrono::{DateTime, Utc};

pub const UNKNOWN_SIGNATURE: &str = "unknown";
pub const UNKNOWN_MINT: &str = "unknown";
pub const DEFAULT_TOKEN_DECIMALS: u32 = 9;
pub const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Where an event attribute came from.
pub enum ValueSource {
    Payload,
    MarketData,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
/// Normalized view of one burn transaction, built per webhook delivery.
pub struct CanonicalBurnEvent {
    pub signature: String,
    /// Burned SOL, lamports / 10^9.
    pub sol_amount: f64,
    pub token_mint: String,
    pub token_symbol: String,
    pub symbol_source: ValueSource,
    /// Burned tokens, `raw_token_amount / 10^token_decimals`.
    pub token_amount: f64,
    pub raw_token_amount: f64,
    pub token_decimals: u32,
    pub decimals_source: ValueSource,
    pub market_cap: Option<f64>,
    pub block_time: Option<DateTime<Utc>>,
}

impl CanonicalBurnEvent {
    pub fn has_known_mint(&self) -> bool {
        self.token_mint != UNKNOWN_MINT
    }

    /// Recomputes `token_amount` after `token_decimals` changed.
    pub(crate) fn apply_decimals(&mut self, decimals: u32, source: ValueSource) {
        self.token_decimals = decimals;
        self.decimals_source = source;
        self.token_amount = scale_token_amount(self.raw_token_amount, decimals);
    }
}

pub(crate) fn scale_token_amount(raw: f64, decimals: u32) -> f64 {
    let exponent = i32::try_from(decimals).unwrap_or(i32::MAX);
    raw / 10f64.powi(exponent)
}

/// Fallback display symbol derived from the mint address.
pub(crate) fn symbol_from_mint(mint: &str) -> String {
    if mint == UNKNOWN_MINT {
        return "UNKNOWN".to_string();
    }
    mint.chars().take(6).collect::<String>().to_ascii_uppercase()
}

#[derive(Debug, Clone, PartialEq)]
/// Result of normalizing one raw event record.
pub enum NormalizeOutcome {
    Event(CanonicalBurnEvent),
    /// Nothing to evaluate; the caller drops the record without error.
    Nothing { reason: &'static str },
}
