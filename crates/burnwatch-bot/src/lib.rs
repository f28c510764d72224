//! Burn-alert bot process: CLI, runtime wiring, webhook server and Telegram
//! command poller.

pub mod bootstrap_helpers;
pub mod burn_runtime;
pub mod cli_args;
pub mod telegram_poller;
pub mod webhook_server;

#[cfg(test)]
mod test_support;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use burnwatch_access::OperatorGate;
use burnwatch_config::ConfigStore;
use burnwatch_market_data::BirdeyeClient;
use burnwatch_telegram::TelegramApiClient;
use tokio::sync::watch;
use tracing::{error, info, warn};

pub use burn_runtime::{BurnBotRuntime, SharedBurnBotRuntime, WebhookPayloadError, WebhookReport};
pub use cli_args::Cli;
pub use telegram_poller::{
    apply_telegram_updates, poll_telegram_commands_once, run_telegram_poller,
};
pub use webhook_server::{
    bind_webhook_listener, build_webhook_router, serve_webhooks, HEALTHZ_PATH, WEBHOOK_PATH,
};

/// Builds the shared runtime from parsed CLI settings.
pub fn build_runtime(
    cli: &Cli,
    telegram: &TelegramApiClient,
    bot_username: Option<&str>,
) -> Result<SharedBurnBotRuntime> {
    let store = ConfigStore::load(cli.state_path.clone());
    let gate = OperatorGate::new(cli.admin_id.as_str());
    let mut runtime = BurnBotRuntime::new(
        store,
        gate,
        Arc::new(telegram.clone()),
        cli.telegram_chat_id.as_str(),
    );
    if let Some(username) = bot_username {
        runtime = runtime.with_bot_username(username);
    }
    match cli.birdeye_api_key() {
        Some(api_key) => {
            let birdeye = BirdeyeClient::new(
                &cli.birdeye_api_base,
                api_key,
                cli.market_data_timeout_ms,
            )
            .context("failed to build market data client")?;
            runtime = runtime.with_market_data(
                Arc::new(birdeye),
                Duration::from_millis(cli.market_data_timeout_ms),
            );
        }
        None => warn!("BIRDEYE_API_KEY not set; market cap lookups disabled"),
    }
    Ok(runtime.into_shared())
}

async fn resolve_bot_username(cli: &Cli, telegram: &TelegramApiClient) -> Option<String> {
    if let Some(username) = cli.telegram_bot_username() {
        return Some(username.to_string());
    }
    match telegram.get_me().await {
        Ok(Some(username)) => {
            info!(username = %username, "telegram bot username resolved");
            Some(username)
        }
        Ok(None) => {
            warn!("telegram getMe returned no username; accepting commands for any bot");
            None
        }
        Err(error) => {
            warn!(
                error = %error,
                "telegram getMe failed; accepting commands for any bot"
            );
            None
        }
    }
}

fn spawn_shutdown_listener() -> watch::Receiver<bool> {
    let (sender, receiver) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(error = %error, "failed to listen for shutdown signal");
            return;
        }
        info!("shutdown signal received");
        let _ = sender.send(true);
    });
    receiver
}

async fn wait_for_shutdown(mut receiver: watch::Receiver<bool>) {
    loop {
        if *receiver.borrow_and_update() {
            return;
        }
        if receiver.changed().await.is_err() {
            if *receiver.borrow() {
                return;
            }
            // Signal listener gone without a signal: keep running.
            std::future::pending::<()>().await;
        }
    }
}

/// Runs the webhook server and the command poller until Ctrl-C.
///
/// Fails before anything else starts when the webhook address cannot be
/// bound, and returns as soon as the server exits with an error.
pub async fn run(cli: Cli) -> Result<()> {
    let telegram = TelegramApiClient::new(
        &cli.telegram_api_base,
        &cli.telegram_bot_token,
        cli.request_timeout_ms,
    )?;
    let listener = bind_webhook_listener(&cli.bind_address()).await?;
    let bot_username = resolve_bot_username(&cli, &telegram).await;
    let runtime = build_runtime(&cli, &telegram, bot_username.as_deref())?;
    {
        let config = runtime.lock().await.config();
        info!(
            enabled = config.enabled,
            min_sol = config.min_sol,
            max_sol = config.max_sol,
            min_mcap = config.min_mcap,
            max_mcap = config.max_mcap,
            state_path = %cli.state_path.display(),
            "burn alert thresholds loaded"
        );
    }

    let shutdown = spawn_shutdown_listener();
    let poller = run_telegram_poller(
        telegram,
        runtime.clone(),
        cli.poll_timeout_seconds,
        wait_for_shutdown(shutdown.clone()),
    );
    let server = serve_webhooks(
        listener,
        runtime,
        cli.webhook_auth_token(),
        wait_for_shutdown(shutdown),
    );
    tokio::pin!(server);
    tokio::select! {
        served = &mut server => {
            if let Err(error) = &served {
                error!(error = %format!("{error:#}"), "webhook server failed; stopping");
            }
            served
        }
        () = poller => server.await,
    }
}
