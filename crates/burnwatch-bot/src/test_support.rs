//! In-memory doubles for the outbound adapters.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use burnwatch_access::OperatorGate;
use burnwatch_config::ConfigStore;
use burnwatch_market_data::{MarketDataError, MarketDataSource, TokenMarketData};
use burnwatch_telegram::{MessageDispatcher, TelegramApiError};

use crate::burn_runtime::BurnBotRuntime;

pub(crate) const OPERATOR_ID: &str = "1001";
pub(crate) const BROADCAST_CHAT_ID: &str = "-100200";

#[derive(Default)]
pub(crate) struct RecordingDispatcher {
    sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingDispatcher {
    pub(crate) fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub(crate) fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().expect("sent lock").clone()
    }
}

#[async_trait]
impl MessageDispatcher for RecordingDispatcher {
    async fn send_markdown(&self, chat_id: &str, text: &str) -> Result<(), TelegramApiError> {
        self.sent
            .lock()
            .expect("sent lock")
            .push((chat_id.to_string(), text.to_string()));
        if self.fail {
            return Err(TelegramApiError::Api {
                description: "Bad Request: chat not found".to_string(),
            });
        }
        Ok(())
    }
}

pub(crate) struct FixedMarketData {
    data: Option<TokenMarketData>,
    calls: AtomicUsize,
}

impl FixedMarketData {
    pub(crate) fn new(data: Option<TokenMarketData>) -> Self {
        Self {
            data,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataSource for FixedMarketData {
    async fn lookup_token(&self, _mint: &str) -> Result<Option<TokenMarketData>, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.data.clone())
    }
}

pub(crate) fn runtime_with(store: ConfigStore, dispatcher: Arc<RecordingDispatcher>) -> BurnBotRuntime {
    BurnBotRuntime::new(
        store,
        OperatorGate::new(OPERATOR_ID),
        dispatcher,
        BROADCAST_CHAT_ID,
    )
}
