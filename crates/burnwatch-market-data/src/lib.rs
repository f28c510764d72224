//! Token market-data lookups used to enrich burn events.
//!
//! `MarketDataSource` is the seam the event pipeline depends on;
//! `BirdeyeClient` is the production implementation backed by the Birdeye
//! token-overview endpoint.

pub mod birdeye_client;

use async_trait::async_trait;
use thiserror::Error;

pub use birdeye_client::BirdeyeClient;

#[derive(Debug, Clone, Default, PartialEq)]
/// Token details reported by a market-data provider. Every field is optional.
pub struct TokenMarketData {
    pub symbol: Option<String>,
    pub decimals: Option<u32>,
    pub market_cap: Option<f64>,
}

#[derive(Debug, Error)]
/// Enumerates market-data lookup failures.
pub enum MarketDataError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("market data provider returned non-success status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("invalid market data response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
/// Trait contract for token market-data lookups keyed by mint address.
pub trait MarketDataSource: Send + Sync {
    /// Returns `Ok(None)` when the provider knows nothing about `mint`.
    async fn lookup_token(&self, mint: &str) -> Result<Option<TokenMarketData>, MarketDataError>;
}
