//! Broadcast alert text for forwarded burn events (Telegram legacy Markdown).

use burnwatch_core::{escape_markdown, format_grouped_number};

use crate::burn_event_contract::CanonicalBurnEvent;

const SOLSCAN_TX_BASE: &str = "https://solscan.io/tx";

pub fn solscan_transaction_url(signature: &str) -> String {
    format!("{SOLSCAN_TX_BASE}/{signature}")
}

pub fn render_burn_alert(event: &CanonicalBurnEvent) -> String {
    let symbol = escape_markdown(&event.token_symbol);
    let market_cap = event
        .market_cap
        .map(|value| format!("${}", format_grouped_number(value)))
        .unwrap_or_else(|| "N/A".to_string());
    let mut lines = vec![
        "🔥 100% LP BURNED! 🔥".to_string(),
        format!("💎 Token: {symbol}"),
        format!("🔑 Mint: {}", escape_markdown(&event.token_mint)),
        format!("🔥 Burned amount: {} {symbol}", event.token_amount),
        format!("💰 Market Cap: {market_cap}"),
        format!("💎 SOL burned: {} SOL", event.sol_amount),
    ];
    if let Some(block_time) = event.block_time {
        lines.push(format!(
            "🕒 Time: {}",
            block_time.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    lines.push(format!(
        "📊 Transaction: [Solscan]({})",
        solscan_transaction_url(&event.signature)
    ));
    lines.join("\n")
}
