use std::path::PathBuf;

use clap::Parser;

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_non_empty(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("value cannot be empty".to_string());
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Parser)]
#[command(
    name = "burnwatch",
    about = "Filters liquidity-burn webhooks and posts matching alerts to Telegram",
    version
)]
pub struct Cli {
    #[arg(
        long = "telegram-bot-token",
        env = "TELEGRAM_BOT_TOKEN",
        value_parser = parse_non_empty,
        hide_env_values = true,
        help = "Telegram Bot API token used for alerts, command replies, and command polling"
    )]
    pub telegram_bot_token: String,

    #[arg(
        long = "telegram-chat-id",
        env = "TELEGRAM_CHAT_ID",
        value_parser = parse_non_empty,
        allow_hyphen_values = true,
        help = "Broadcast chat that receives burn alerts"
    )]
    pub telegram_chat_id: String,

    #[arg(
        long = "admin-id",
        env = "ADMIN_ID",
        value_parser = parse_non_empty,
        allow_hyphen_values = true,
        help = "Telegram user id of the operator allowed to run configuration commands"
    )]
    pub admin_id: String,

    #[arg(
        long = "telegram-bot-username",
        env = "BURNWATCH_TELEGRAM_BOT_USERNAME",
        help = "Bot username used to ignore commands addressed to other bots; resolved with getMe when unset"
    )]
    pub telegram_bot_username: Option<String>,

    #[arg(
        long = "birdeye-api-key",
        env = "BIRDEYE_API_KEY",
        hide_env_values = true,
        help = "Birdeye API key for market-cap lookups; lookups are disabled when unset"
    )]
    pub birdeye_api_key: Option<String>,

    #[arg(
        long,
        env = "BURNWATCH_HOST",
        default_value = "0.0.0.0",
        help = "Host address the webhook server binds to"
    )]
    pub host: String,

    #[arg(
        long,
        env = "PORT",
        default_value_t = 10_000,
        help = "Port the webhook server binds to"
    )]
    pub port: u16,

    #[arg(
        long = "state-path",
        env = "BURNWATCH_STATE_PATH",
        default_value = ".burnwatch/config-state.json",
        help = "Persisted threshold configuration snapshot"
    )]
    pub state_path: PathBuf,

    #[arg(
        long = "telegram-api-base",
        env = "BURNWATCH_TELEGRAM_API_BASE",
        default_value = "https://api.telegram.org",
        help = "Base URL for the Telegram Bot API"
    )]
    pub telegram_api_base: String,

    #[arg(
        long = "birdeye-api-base",
        env = "BURNWATCH_BIRDEYE_API_BASE",
        default_value = "https://public-api.birdeye.so",
        help = "Base URL for the Birdeye public API"
    )]
    pub birdeye_api_base: String,

    #[arg(
        long = "market-data-timeout-ms",
        env = "BURNWATCH_MARKET_DATA_TIMEOUT_MS",
        default_value_t = 3_000,
        value_parser = parse_positive_u64,
        help = "Upper bound for one market-data lookup; slower lookups count as unknown market cap"
    )]
    pub market_data_timeout_ms: u64,

    #[arg(
        long = "request-timeout-ms",
        env = "BURNWATCH_REQUEST_TIMEOUT_MS",
        default_value_t = 10_000,
        value_parser = parse_positive_u64,
        help = "HTTP timeout for Telegram sendMessage calls"
    )]
    pub request_timeout_ms: u64,

    #[arg(
        long = "poll-timeout-seconds",
        env = "BURNWATCH_POLL_TIMEOUT_SECONDS",
        default_value_t = 25,
        help = "Long-poll timeout for Telegram getUpdates"
    )]
    pub poll_timeout_seconds: u64,

    #[arg(
        long = "webhook-auth-token",
        env = "BURNWATCH_WEBHOOK_AUTH_TOKEN",
        hide_env_values = true,
        help = "When set, inbound webhooks must send this value in the Authorization header"
    )]
    pub webhook_auth_token: Option<String>,
}

impl Cli {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host.trim(), self.port)
    }

    pub fn birdeye_api_key(&self) -> Option<&str> {
        self.birdeye_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn telegram_bot_username(&self) -> Option<&str> {
        self.telegram_bot_username
            .as_deref()
            .map(|username| username.trim().trim_start_matches('@'))
            .filter(|username| !username.is_empty())
    }

    pub fn webhook_auth_token(&self) -> Option<&str> {
        self.webhook_auth_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}
