//! Inbound command channel: Telegram `getUpdates` long polling.

use std::future::Future;
use std::time::Duration;

use burnwatch_telegram::{parse_telegram_update, TelegramApiClient, TelegramApiError};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::burn_runtime::SharedBurnBotRuntime;

const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

fn next_offset(updates: &[Value], current: Option<i64>) -> Option<i64> {
    updates
        .iter()
        .filter_map(|update| update.get("update_id").and_then(Value::as_i64))
        .map(|update_id| update_id.saturating_add(1))
        .chain(current)
        .max()
}

/// Runs every command in a fetched batch through the runtime and returns the
/// offset to acknowledge. The runtime lock is taken per message.
pub async fn apply_telegram_updates(
    runtime: &SharedBurnBotRuntime,
    updates: &[Value],
    offset: Option<i64>,
) -> Option<i64> {
    for update in updates {
        let Some(message) = parse_telegram_update(update) else {
            debug!("ignoring telegram update without text");
            continue;
        };
        let outcome = runtime.lock().await.handle_chat_message(&message).await;
        if let Some(outcome) = outcome {
            debug!(
                update_id = message.update_id,
                command = outcome.command,
                status = outcome.status.as_str(),
                "telegram command handled"
            );
        }
    }
    next_offset(updates, offset)
}

/// Fetches one batch of updates and applies it.
pub async fn poll_telegram_commands_once(
    client: &TelegramApiClient,
    runtime: &SharedBurnBotRuntime,
    offset: Option<i64>,
    timeout_seconds: u64,
) -> Result<Option<i64>, TelegramApiError> {
    let updates = client.get_updates(offset, timeout_seconds).await?;
    Ok(apply_telegram_updates(runtime, &updates, offset).await)
}

/// Polls until `shutdown` resolves. Poll failures are logged and retried
/// after a short delay.
///
/// Shutdown only interrupts the long poll or the retry delay. A fetched batch
/// is always applied in full so its offset is acknowledged before exit.
pub async fn run_telegram_poller<F>(
    client: TelegramApiClient,
    runtime: SharedBurnBotRuntime,
    timeout_seconds: u64,
    shutdown: F,
) where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut offset = None;
    info!(timeout_seconds, "telegram command poller started");
    loop {
        let fetched = tokio::select! {
            biased;
            _ = &mut shutdown => break,
            result = client.get_updates(offset, timeout_seconds) => result,
        };
        match fetched {
            Ok(updates) => offset = apply_telegram_updates(&runtime, &updates, offset).await,
            Err(error) => {
                warn!(error = %error, "telegram getUpdates failed; retrying");
                tokio::select! {
                    biased;
                    _ = &mut shutdown => break,
                    _ = tokio::time::sleep(POLL_RETRY_DELAY) => {}
                }
            }
        }
    }
    info!("telegram command poller stopped");
}
