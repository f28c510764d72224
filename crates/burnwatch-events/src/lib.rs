//! Burn-event pipeline: raw webhook payload to forward/drop decision.
//!
//! `normalize_burn_event` maps one raw event record onto a
//! `CanonicalBurnEvent`, `enrich_burn_event` fills market data from an
//! injected `MarketDataSource`, `evaluate_burn_event` applies the operator
//! thresholds, and `render_burn_alert` produces the broadcast message text.

pub mod burn_alert_render;
pub mod burn_event_contract;
pub mod burn_event_enrichment;
pub mod burn_event_filter;
pub mod burn_event_normalizer;

pub use burn_alert_render::{render_burn_alert, solscan_transaction_url};
pub use burn_event_contract::{
    CanonicalBurnEvent, NormalizeOutcome, ValueSource, DEFAULT_TOKEN_DECIMALS, UNKNOWN_MINT,
    UNKNOWN_SIGNATURE,
};
pub use burn_event_enrichment::{enrich_burn_event, EnrichmentOutcome};
pub use burn_event_filter::{evaluate_burn_event, should_forward, DropReason, FilterDecision};
pub use burn_event_normalizer::{normalize_burn_event, split_webhook_payload};
