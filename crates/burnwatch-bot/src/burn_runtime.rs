//! Process-wide burn-alert runtime.
//!
//! `BurnBotRuntime` owns the threshold store, the operator gate and the
//! outbound adapters. It is shared behind one `tokio::sync::Mutex` so every
//! webhook delivery and every command is processed to completion, outbound
//! I/O included, before the next one starts.

use std::sync::Arc;
use std::time::Duration;

use burnwatch_access::OperatorGate;
use burnwatch_commands::{
    parse_command_invocation, process_command, CommandOutcome, ReplyTarget,
};
use burnwatch_config::{ConfigStore, ThresholdConfig};
use burnwatch_events::{
    enrich_burn_event, evaluate_burn_event, normalize_burn_event, render_burn_alert,
    split_webhook_payload, FilterDecision, NormalizeOutcome,
};
use burnwatch_market_data::MarketDataSource;
use burnwatch_telegram::{MessageDispatcher, TelegramInboundMessage};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub type SharedBurnBotRuntime = Arc<Mutex<BurnBotRuntime>>;

#[derive(Debug, Error)]
pub enum WebhookPayloadError {
    #[error("webhook body is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
/// Per-delivery counters returned to the webhook caller.
pub struct WebhookReport {
    pub received: usize,
    pub forwarded: usize,
    pub dropped: usize,
    /// Records that carried nothing to evaluate.
    pub skipped: usize,
    /// Forwarded alerts whose dispatch failed; counted in `forwarded` too.
    pub dispatch_failures: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordOutcome {
    Forwarded { delivered: bool },
    Dropped,
    Skipped,
}

pub struct BurnBotRuntime {
    store: ConfigStore,
    gate: OperatorGate,
    market_data: Option<Arc<dyn MarketDataSource>>,
    dispatcher: Arc<dyn MessageDispatcher>,
    broadcast_chat_id: String,
    market_data_timeout: Duration,
    bot_username: Option<String>,
}

impl BurnBotRuntime {
    pub fn new(
        store: ConfigStore,
        gate: OperatorGate,
        dispatcher: Arc<dyn MessageDispatcher>,
        broadcast_chat_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            gate,
            market_data: None,
            dispatcher,
            broadcast_chat_id: broadcast_chat_id.into(),
            market_data_timeout: Duration::from_millis(3_000),
            bot_username: None,
        }
    }

    pub fn with_market_data(
        mut self,
        source: Arc<dyn MarketDataSource>,
        timeout: Duration,
    ) -> Self {
        self.market_data = Some(source);
        self.market_data_timeout = timeout;
        self
    }

    /// Commands suffixed with another bot's name (`/status@OtherBot`) are
    /// ignored once the own username is known.
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    pub fn into_shared(self) -> SharedBurnBotRuntime {
        Arc::new(Mutex::new(self))
    }

    pub fn config(&self) -> ThresholdConfig {
        self.store.get()
    }

    /// Parses a raw webhook body and processes every record it carries.
    pub async fn handle_webhook_body(
        &mut self,
        body: &str,
    ) -> Result<WebhookReport, WebhookPayloadError> {
        let payload: Value = serde_json::from_str(body)?;
        Ok(self.handle_webhook_payload(&payload).await)
    }

    pub async fn handle_webhook_payload(&mut self, payload: &Value) -> WebhookReport {
        let mut report = WebhookReport::default();
        for record in split_webhook_payload(payload) {
            report.received += 1;
            match self.process_record(record).await {
                RecordOutcome::Forwarded { delivered } => {
                    report.forwarded += 1;
                    if !delivered {
                        report.dispatch_failures += 1;
                    }
                }
                RecordOutcome::Dropped => report.dropped += 1,
                RecordOutcome::Skipped => report.skipped += 1,
            }
        }
        info!(
            received = report.received,
            forwarded = report.forwarded,
            dropped = report.dropped,
            skipped = report.skipped,
            dispatch_failures = report.dispatch_failures,
            "webhook delivery processed"
        );
        report
    }

    async fn process_record(&mut self, record: &Value) -> RecordOutcome {
        let mut event = match normalize_burn_event(record) {
            NormalizeOutcome::Event(event) => event,
            NormalizeOutcome::Nothing { reason } => {
                debug!(reason, "webhook record skipped");
                return RecordOutcome::Skipped;
            }
        };

        // A drop decided before enrichment is final: lookups only fill a
        // missing market cap.
        let config = self.store.get();
        if let FilterDecision::Drop(reason) = evaluate_burn_event(&event, &config) {
            info!(
                signature = %event.signature,
                reason = reason.as_str(),
                "burn event dropped"
            );
            return RecordOutcome::Dropped;
        }

        let enrichment = enrich_burn_event(
            &mut event,
            self.market_data.as_deref(),
            self.market_data_timeout,
        )
        .await;
        debug!(signature = %event.signature, enrichment = ?enrichment, "burn event enriched");

        if let FilterDecision::Drop(reason) = evaluate_burn_event(&event, &config) {
            info!(
                signature = %event.signature,
                reason = reason.as_str(),
                "burn event dropped"
            );
            return RecordOutcome::Dropped;
        }

        let alert = render_burn_alert(&event);
        let delivered = match self
            .dispatcher
            .send_markdown(&self.broadcast_chat_id, &alert)
            .await
        {
            Ok(()) => {
                info!(signature = %event.signature, sol_amount = event.sol_amount, "burn alert forwarded");
                true
            }
            Err(error) => {
                warn!(
                    signature = %event.signature,
                    error = %error,
                    "burn alert dispatch failed; event considered processed"
                );
                false
            }
        };
        RecordOutcome::Forwarded { delivered }
    }

    /// Runs a chat message through the command processor and delivers the
    /// reply. Returns `None` for text that is not a command.
    pub async fn handle_chat_message(
        &mut self,
        message: &TelegramInboundMessage,
    ) -> Option<CommandOutcome> {
        let invocation = parse_command_invocation(&message.sender_id, &message.text)?;
        if let Some(own) = self.bot_username.as_deref() {
            if !invocation.is_addressed_to(own) {
                debug!(
                    command = %invocation.name,
                    addressed_to = invocation.addressed_to.as_deref().unwrap_or_default(),
                    "command addressed to another bot ignored"
                );
                return None;
            }
        }
        let outcome = process_command(&mut self.store, &self.gate, &invocation, message.context);
        if let Some(reply) = &outcome.reply {
            let destination = match reply.target {
                ReplyTarget::Operator => self.gate.operator_id(),
                ReplyTarget::Sender => message.chat_id.as_str(),
            };
            if let Err(error) = self.dispatcher.send_markdown(destination, &reply.text).await {
                warn!(
                    command = outcome.command,
                    destination = %destination,
                    error = %error,
                    "command reply dispatch failed"
                );
            }
        }
        Some(outcome)
    }
}
