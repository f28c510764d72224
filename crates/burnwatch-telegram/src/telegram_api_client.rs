//! Telegram Bot API client helpers used by alert posting and command polling.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::{MessageDispatcher, TelegramApiError};

pub const TELEGRAM_SAFE_MAX_CHARS: usize = 4096;
const TRUNCATION_SUFFIX: &str = "\n…";

#[derive(Debug, Deserialize)]
struct TelegramEnvelope {
    ok: bool,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Clone)]
pub struct TelegramApiClient {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
}

impl TelegramApiClient {
    pub fn new(api_base: &str, bot_token: &str, request_timeout_ms: u64) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("burnwatch"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .context("failed to create telegram api client")?;
        Ok(Self {
            http,
            api_base: api_base.trim().trim_end_matches('/').to_string(),
            bot_token: bot_token.trim().to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.bot_token)
    }

    async fn call(
        &self,
        method: &str,
        payload: &Value,
        timeout: Option<Duration>,
    ) -> Result<Value, TelegramApiError> {
        let mut request = self.http.post(self.method_url(method)).json(payload);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        let envelope = serde_json::from_str::<TelegramEnvelope>(&body);
        if !status.is_success() {
            let description = envelope
                .ok()
                .and_then(|envelope| envelope.description)
                .unwrap_or_else(|| body.chars().take(512).collect());
            return Err(TelegramApiError::HttpStatus {
                status: status.as_u16(),
                description,
            });
        }
        let envelope =
            envelope.map_err(|error| TelegramApiError::InvalidResponse(error.to_string()))?;
        if !envelope.ok {
            return Err(TelegramApiError::Api {
                description: envelope
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }
        Ok(envelope.result.unwrap_or(Value::Null))
    }

    /// Sends `text` with legacy Markdown formatting and link previews disabled.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<i64, TelegramApiError> {
        let payload = json!({
            "chat_id": chat_id.trim(),
            "text": truncate_for_telegram(text),
            "parse_mode": "Markdown",
            "disable_web_page_preview": true,
        });
        let result = self.call("sendMessage", &payload, None).await?;
        result
            .get("message_id")
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                TelegramApiError::InvalidResponse("sendMessage result missing message_id".into())
            })
    }

    /// Returns the bot's own username from `getMe`, if Telegram reports one.
    pub async fn get_me(&self) -> Result<Option<String>, TelegramApiError> {
        let result = self.call("getMe", &json!({}), None).await?;
        Ok(result
            .get("username")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|username| !username.is_empty())
            .map(str::to_string))
    }

    /// Long-polls `getUpdates` for message and channel-post updates.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_seconds: u64,
    ) -> Result<Vec<Value>, TelegramApiError> {
        let mut payload = json!({
            "timeout": timeout_seconds,
            "allowed_updates": ["message", "channel_post"],
        });
        if let Some(offset) = offset {
            payload["offset"] = json!(offset);
        }
        // The HTTP timeout must outlast the server-side long poll.
        let request_timeout = Duration::from_secs(timeout_seconds.saturating_add(10));
        let result = self
            .call("getUpdates", &payload, Some(request_timeout))
            .await?;
        match result {
            Value::Array(updates) => Ok(updates),
            _ => Err(TelegramApiError::InvalidResponse(
                "getUpdates result is not an array".to_string(),
            )),
        }
    }
}

#[async_trait]
impl MessageDispatcher for TelegramApiClient {
    async fn send_markdown(&self, chat_id: &str, text: &str) -> Result<(), TelegramApiError> {
        self.send_message(chat_id, text).await.map(|_| ())
    }
}

fn truncate_for_telegram(text: &str) -> String {
    if text.chars().count() <= TELEGRAM_SAFE_MAX_CHARS {
        return text.to_string();
    }
    debug!(
        chars = text.chars().count(),
        limit = TELEGRAM_SAFE_MAX_CHARS,
        "truncating outbound telegram message"
    );
    let keep = TELEGRAM_SAFE_MAX_CHARS - TRUNCATION_SUFFIX.chars().count();
    let mut truncated = text.chars().take(keep).collect::<String>();
    truncated.push_str(TRUNCATION_SUFFIX);
    truncated
}
