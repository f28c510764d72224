//! Telegram Bot API transport: outbound Markdown messages and inbound
//! command updates fetched by long polling.

pub mod telegram_api_client;
pub mod telegram_updates;

use async_trait::async_trait;
use thiserror::Error;

pub use telegram_api_client::{TelegramApiClient, TELEGRAM_SAFE_MAX_CHARS};
pub use telegram_updates::{parse_telegram_update, TelegramInboundMessage};

#[derive(Debug, Error)]
/// Enumerates Telegram Bot API failures.
pub enum TelegramApiError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("telegram returned non-success status {status}: {description}")]
    HttpStatus { status: u16, description: String },
    #[error("telegram api error: {description}")]
    Api { description: String },
    #[error("invalid telegram response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
/// Outbound chat delivery used for alerts and command replies.
pub trait MessageDispatcher: Send + Sync {
    async fn send_markdown(&self, chat_id: &str, text: &str) -> Result<(), TelegramApiError>;
}
