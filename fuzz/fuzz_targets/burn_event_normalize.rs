#![no_main]

use burnwatch_config::ThresholdConfig;
use burnwatch_events::{
    evaluate_burn_event, normalize_burn_event, render_burn_alert, split_webhook_payload,
    NormalizeOutcome,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(payload) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let config = ThresholdConfig::default();
    for record in split_webhook_payload(&payload) {
        match normalize_burn_event(record) {
            NormalizeOutcome::Event(event) => {
                assert!(event.sol_amount.is_finite());
                assert!(!event.signature.trim().is_empty());
                assert!(!event.token_mint.trim().is_empty());
                if let Some(market_cap) = event.market_cap {
                    assert!(market_cap > 0.0);
                }
                let _ = evaluate_burn_event(&event, &config);
                assert!(render_burn_alert(&event).contains("solscan.io/tx/"));
            }
            NormalizeOutcome::Nothing { reason } => assert!(!reason.is_empty()),
        }
    }
});
