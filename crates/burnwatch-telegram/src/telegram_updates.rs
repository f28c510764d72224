//! Mapping of raw Telegram updates onto inbound chat messages.

use burnwatch_access::ChatContext;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Text message received from a Telegram chat.
pub struct TelegramInboundMessage {
    pub update_id: i64,
    pub chat_id: String,
    pub context: ChatContext,
    pub sender_id: String,
    pub text: String,
}

fn id_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        _ => None,
    }
}

/// Extracts the text message carried by a `message` or `channel_post` update.
///
/// The sender is `from.id`; channel posts without `from` fall back to the
/// chat id. Updates without text return `None`.
pub fn parse_telegram_update(update: &Value) -> Option<TelegramInboundMessage> {
    let update_id = update.get("update_id").and_then(Value::as_i64)?;
    let message = update
        .get("message")
        .or_else(|| update.get("channel_post"))?;
    let text = message.get("text").and_then(Value::as_str)?.to_string();
    let chat = message.get("chat")?;
    let chat_id = id_string(chat.get("id"))?;
    let context = match chat.get("type").and_then(Value::as_str) {
        Some("private") => ChatContext::Private,
        _ => ChatContext::Broadcast,
    };
    let sender_id = id_string(message.get("from").and_then(|from| from.get("id")))
        .unwrap_or_else(|| chat_id.clone());
    Some(TelegramInboundMessage {
        update_id,
        chat_id,
        context,
        sender_id,
        text,
    })
}
