//! Market-data enrichment with a bounded lookup time.

use std::time::Duration;

use burnwatch_market_data::MarketDataSource;
use tracing::{debug, warn};

use crate::burn_event_contract::{CanonicalBurnEvent, ValueSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates what happened during an enrichment attempt.
pub enum EnrichmentOutcome {
    /// Nothing was missing, the mint is unknown, or no source is configured.
    Skipped,
    Enriched,
    /// The provider had no data for the mint.
    NotFound,
    Failed,
    TimedOut,
}

fn needs_lookup(event: &CanonicalBurnEvent) -> bool {
    event.has_known_mint()
        && (event.market_cap.is_none()
            || event.symbol_source == ValueSource::Fallback
            || event.decimals_source == ValueSource::Fallback)
}

/// Fills market cap, and symbol/decimals when the payload lacked them.
///
/// Failures and timeouts leave the event as-is: market cap stays unknown.
pub async fn enrich_burn_event(
    event: &mut CanonicalBurnEvent,
    source: Option<&dyn MarketDataSource>,
    timeout: Duration,
) -> EnrichmentOutcome {
    let Some(source) = source else {
        return EnrichmentOutcome::Skipped;
    };
    if !needs_lookup(event) {
        return EnrichmentOutcome::Skipped;
    }

    let lookup = tokio::time::timeout(timeout, source.lookup_token(&event.token_mint)).await;
    let data = match lookup {
        Ok(Ok(Some(data))) => data,
        Ok(Ok(None)) => {
            debug!(mint = %event.token_mint, "market data provider has no data for mint");
            return EnrichmentOutcome::NotFound;
        }
        Ok(Err(error)) => {
            warn!(
                mint = %event.token_mint,
                error = %error,
                "market data lookup failed; market cap unknown"
            );
            return EnrichmentOutcome::Failed;
        }
        Err(_) => {
            warn!(
                mint = %event.token_mint,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                "market data lookup timed out; market cap unknown"
            );
            return EnrichmentOutcome::TimedOut;
        }
    };

    if event.market_cap.is_none() {
        event.market_cap = data.market_cap;
    }
    if event.symbol_source == ValueSource::Fallback {
        if let Some(symbol) = data.symbol {
            event.token_symbol = symbol;
            event.symbol_source = ValueSource::MarketData;
        }
    }
    if event.decimals_source == ValueSource::Fallback {
        if let Some(decimals) = data.decimals {
            event.apply_decimals(decimals, ValueSource::MarketData);
        }
    }
    EnrichmentOutcome::Enriched
}
