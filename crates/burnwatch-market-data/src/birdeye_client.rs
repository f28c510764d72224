//! Birdeye token-overview client.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde_json::Value;
use tracing::debug;

use crate::{MarketDataError, MarketDataSource, TokenMarketData};

const ERROR_BODY_MAX_CHARS: usize = 512;
const MAX_TOKEN_DECIMALS: u64 = 24;

#[derive(Clone)]
pub struct BirdeyeClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl BirdeyeClient {
    pub fn new(api_base: &str, api_key: &str, request_timeout_ms: u64) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("burnwatch"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("x-chain", HeaderValue::from_static("solana"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .context("failed to create birdeye api client")?;
        Ok(Self {
            http,
            api_base: api_base.trim().trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
        })
    }
}

#[async_trait]
impl MarketDataSource for BirdeyeClient {
    async fn lookup_token(&self, mint: &str) -> Result<Option<TokenMarketData>, MarketDataError> {
        let response = self
            .http
            .get(format!("{}/defi/token_overview", self.api_base))
            .query(&[("address", mint)])
            .header("X-API-KEY", self.api_key.as_str())
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(MarketDataError::HttpStatus {
                status: status.as_u16(),
                body: truncate_for_error(&body),
            });
        }
        let payload = serde_json::from_str::<Value>(&body)
            .map_err(|error| MarketDataError::InvalidResponse(error.to_string()))?;
        debug!(mint, "birdeye token overview received");
        parse_token_overview(&payload)
    }
}

fn truncate_for_error(body: &str) -> String {
    body.chars().take(ERROR_BODY_MAX_CHARS).collect()
}

fn number_field(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match value.get(*key)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Extracts token details from a token-overview payload.
///
/// Accepts both the `{"success":..,"data":{..}}` envelope and a bare data
/// object. A zero or negative market cap is reported as unknown.
pub(crate) fn parse_token_overview(
    payload: &Value,
) -> Result<Option<TokenMarketData>, MarketDataError> {
    if payload.get("success").and_then(Value::as_bool) == Some(false) {
        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("provider reported failure");
        return Err(MarketDataError::InvalidResponse(message.to_string()));
    }
    let data = match payload.get("data") {
        Some(Value::Null) => return Ok(None),
        Some(data) => data,
        None => payload,
    };
    if !data.is_object() {
        return Err(MarketDataError::InvalidResponse(
            "token overview data is not an object".to_string(),
        ));
    }

    let symbol = data
        .get("symbol")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|symbol| !symbol.is_empty())
        .map(str::to_string);
    let decimals = data
        .get("decimals")
        .and_then(Value::as_u64)
        .filter(|decimals| *decimals <= MAX_TOKEN_DECIMALS)
        .and_then(|decimals| u32::try_from(decimals).ok());
    let market_cap = number_field(data, &["marketCap", "market_cap", "mc"])
        .filter(|value| value.is_finite() && *value > 0.0);

    if symbol.is_none() && decimals.is_none() && market_cap.is_none() {
        return Ok(None);
    }
    Ok(Some(TokenMarketData {
        symbol,
        decimals,
        market_cap,
    }))
}
