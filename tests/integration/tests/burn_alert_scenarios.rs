use std::sync::Arc;

use async_trait::async_trait;
use burnwatch_access::{ChatContext, OperatorGate};
use burnwatch_bot::{BurnBotRuntime, WebhookReport};
use burnwatch_commands::CommandStatus;
use burnwatch_config::{ConfigStore, ThresholdConfig};
use burnwatch_events::{normalize_burn_event, should_forward, CanonicalBurnEvent, NormalizeOutcome};
use burnwatch_telegram::{MessageDispatcher, TelegramApiError, TelegramInboundMessage};
use serde_json::{json, Value};
use tempfile::tempdir;
use tokio::sync::Mutex as AsyncMutex;

const OPERATOR: &str = "1001";
const BROADCAST: &str = "-100200";

#[derive(Default)]
struct RecordingDispatcher {
    sent: AsyncMutex<Vec<(String, String)>>,
}

impl RecordingDispatcher {
    async fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl MessageDispatcher for RecordingDispatcher {
    async fn send_markdown(&self, chat_id: &str, text: &str) -> Result<(), TelegramApiError> {
        self.sent
            .lock()
            .await
            .push((chat_id.to_string(), text.to_string()));
        Ok(())
    }
}

fn runtime(store: ConfigStore, dispatcher: Arc<RecordingDispatcher>) -> BurnBotRuntime {
    BurnBotRuntime::new(store, OperatorGate::new(OPERATOR), dispatcher, BROADCAST)
}

fn operator_says(text: &str) -> TelegramInboundMessage {
    TelegramInboundMessage {
        update_id: 1,
        chat_id: OPERATOR.to_string(),
        context: ChatContext::Private,
        sender_id: OPERATOR.to_string(),
        text: text.to_string(),
    }
}

fn scenario_a_event() -> Value {
    json!({
        "native": [{"amount": 2_000_000_000u64}],
        "token": [{"mint": "Mx1", "symbol": "FOO", "decimals": 6, "tokenAmount": 500000}],
        "signature": "sig1",
    })
}

fn event_with_sol(lamports: u64) -> Value {
    json!({
        "nativeTransfers": [{"amount": lamports}],
        "tokenTransfers": [{"mint": "Mx2", "tokenAmount": 10}],
        "signature": format!("sig-{lamports}"),
    })
}

fn canonical(record: &Value) -> CanonicalBurnEvent {
    match normalize_burn_event(record) {
        NormalizeOutcome::Event(event) => event,
        NormalizeOutcome::Nothing { reason } => panic!("unexpected no-op: {reason}"),
    }
}

#[tokio::test]
async fn integration_scenario_a_default_config_forwards_normalized_event() {
    let temp = tempdir().expect("tempdir");
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let mut runtime = runtime(
        ConfigStore::load(temp.path().join("state.json")),
        dispatcher.clone(),
    );

    let event = canonical(&scenario_a_event());
    assert_eq!(event.sol_amount, 2.0);
    assert_eq!(event.token_symbol, "FOO");
    assert_eq!(event.token_amount, 0.5);
    assert_eq!(event.market_cap, None);

    let report = runtime.handle_webhook_payload(&scenario_a_event()).await;
    assert_eq!(report.forwarded, 1);
    let sent = dispatcher.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, BROADCAST);
    assert!(sent[0].1.contains("FOO"));
    assert!(sent[0].1.contains("💰 Market Cap: N/A"));
}

#[tokio::test]
async fn integration_scenario_b_disabled_posting_drops_without_dispatch() {
    let temp = tempdir().expect("tempdir");
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let mut runtime = runtime(
        ConfigStore::load(temp.path().join("state.json")),
        dispatcher.clone(),
    );

    let toggled = runtime
        .handle_chat_message(&operator_says("/status"))
        .await
        .expect("command");
    assert_eq!(toggled.status, CommandStatus::Applied);
    assert!(!runtime.config().enabled);

    let report = runtime.handle_webhook_payload(&scenario_a_event()).await;
    assert_eq!(report.dropped, 1);
    let alerts = dispatcher
        .sent()
        .await
        .into_iter()
        .filter(|(chat, _)| chat == BROADCAST)
        .count();
    assert_eq!(alerts, 0);
}

#[tokio::test]
async fn integration_scenario_c_setmaxsol_persists_and_filters_later_events() {
    let temp = tempdir().expect("tempdir");
    let state_path = temp.path().join("state.json");
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let mut runtime = runtime(ConfigStore::load(state_path.clone()), dispatcher.clone());

    let outcome = runtime
        .handle_chat_message(&operator_says("/setmaxsol 50"))
        .await
        .expect("command");
    assert_eq!(outcome.status, CommandStatus::Applied);
    assert_eq!(runtime.config().max_sol, 50.0);
    assert_eq!(
        dispatcher.sent().await,
        vec![(OPERATOR.to_string(), "🔹 Max SOL set to: 50".to_string())]
    );

    let report = runtime
        .handle_webhook_payload(&event_with_sol(75_000_000_000))
        .await;
    assert_eq!(
        report,
        WebhookReport {
            received: 1,
            dropped: 1,
            ..WebhookReport::default()
        }
    );

    let restarted = ConfigStore::load(state_path);
    assert_eq!(restarted.get().max_sol, 50.0);
}

#[tokio::test]
async fn integration_scenario_d_settings_lists_all_fields_without_mutation() {
    let temp = tempdir().expect("tempdir");
    let state_path = temp.path().join("state.json");
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let mut runtime = runtime(ConfigStore::load(state_path.clone()), dispatcher.clone());
    let before = runtime.config();

    let outcome = runtime
        .handle_chat_message(&operator_says("/settings"))
        .await
        .expect("command");
    assert_eq!(outcome.status, CommandStatus::Reported);
    assert_eq!(runtime.config(), before);
    assert!(!state_path.exists());

    let sent = dispatcher.sent().await;
    assert_eq!(sent.len(), 1);
    for label in ["Posting", "Min SOL", "Max SOL", "Min MarketCap", "Max MarketCap"] {
        assert!(sent[0].1.contains(label), "missing {label}");
    }
}

#[tokio::test]
async fn integration_scenario_e_non_numeric_argument_is_rejected() {
    let temp = tempdir().expect("tempdir");
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let mut runtime = runtime(
        ConfigStore::with_config(
            temp.path().join("state.json"),
            ThresholdConfig {
                min_sol: 3.0,
                ..ThresholdConfig::default()
            },
        ),
        dispatcher.clone(),
    );

    let outcome = runtime
        .handle_chat_message(&operator_says("/setminsol abc"))
        .await
        .expect("command");
    assert_eq!(outcome.status, CommandStatus::Rejected);
    assert_eq!(runtime.config().min_sol, 3.0);
    let sent = dispatcher.sent().await;
    assert!(sent[0].1.contains("not a valid number"));
}

#[tokio::test]
async fn integration_non_operator_commands_never_mutate_config() {
    let temp = tempdir().expect("tempdir");
    let state_path = temp.path().join("state.json");
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let mut runtime = runtime(ConfigStore::load(state_path.clone()), dispatcher.clone());
    let before = runtime.config();

    for (context, chat) in [(ChatContext::Private, "42"), (ChatContext::Broadcast, BROADCAST)] {
        for text in ["/status", "/setminsol 9", "/setmaxsol 1", "/setminmcap 5", "/setmaxmcap 6"] {
            let message = TelegramInboundMessage {
                update_id: 1,
                chat_id: chat.to_string(),
                context,
                sender_id: "42".to_string(),
                text: text.to_string(),
            };
            runtime.handle_chat_message(&message).await.expect("command");
        }
    }

    assert_eq!(runtime.config(), before);
    assert!(!state_path.exists());
    let sent = dispatcher.sent().await;
    assert_eq!(sent.len(), 5, "only private denials are answered");
    assert!(sent.iter().all(|(chat, _)| chat == "42"));
}

#[test]
fn integration_defaults_leave_market_cap_unbounded_and_bounds_inclusive() {
    let config = ThresholdConfig::default();
    assert!(config.max_mcap_is_unbounded());

    let mut at_max = canonical(&event_with_sol(100_000_000_000));
    at_max.market_cap = Some(1e15);
    assert!(should_forward(&at_max, &config));

    let at_min = canonical(&event_with_sol(0));
    assert!(should_forward(&at_min, &config));

    let above = canonical(&event_with_sol(100_000_000_001));
    assert!(!should_forward(&above, &config));
    assert!(!should_forward(&above, &config), "evaluation is pure");
}

#[tokio::test]
async fn integration_webhook_to_telegram_over_http() {
    let telegram = httpmock::MockServer::start();
    let send = telegram.mock(|when, then| {
        when.method(httpmock::Method::POST)
            .path("/botsecret/sendMessage")
            .json_body_includes(format!(r#"{{"chat_id": "{BROADCAST}"}}"#));
        then.status(200)
            .json_body(json!({"ok": true, "result": {"message_id": 77}}));
    });

    let temp = tempdir().expect("tempdir");
    let client = burnwatch_telegram::TelegramApiClient::new(&telegram.base_url(), "secret", 2_000)
        .expect("telegram client");
    let shared = BurnBotRuntime::new(
        ConfigStore::load(temp.path().join("state.json")),
        OperatorGate::new(OPERATOR),
        Arc::new(client),
        BROADCAST,
    )
    .into_shared();
    let router = burnwatch_bot::build_webhook_router(shared, None);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    let server = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    tokio::time::sleep(std::time::Duration::from_millis(25)).await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}{}", burnwatch_bot::WEBHOOK_PATH))
        .json(&scenario_a_event())
        .send()
        .await
        .expect("post");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.expect("json");
    assert_eq!(body["forwarded"], 1);
    assert_eq!(body["dispatch_failures"], 0);
    send.assert();
    server.abort();
}
