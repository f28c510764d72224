//! Threshold evaluation. Pure functions: no I/O, no state.

use burnwatch_config::ThresholdConfig;

use crate::burn_event_contract::CanonicalBurnEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates why an event was not forwarded.
pub enum DropReason {
    Disabled,
    SolBelowMin,
    SolAboveMax,
    McapBelowMin,
    McapAboveMax,
}

impl DropReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "posting_disabled",
            Self::SolBelowMin => "sol_below_min",
            Self::SolAboveMax => "sol_above_max",
            Self::McapBelowMin => "mcap_below_min",
            Self::McapAboveMax => "mcap_above_max",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Forward,
    Drop(DropReason),
}

impl FilterDecision {
    pub fn is_forward(self) -> bool {
        matches!(self, Self::Forward)
    }
}

/// Applies the thresholds in order: switch, SOL bounds, market-cap bounds.
///
/// All bounds are inclusive. An unknown market cap never drops an event.
pub fn evaluate_burn_event(event: &CanonicalBurnEvent, config: &ThresholdConfig) -> FilterDecision {
    if !config.enabled {
        return FilterDecision::Drop(DropReason::Disabled);
    }
    if event.sol_amount < config.min_sol {
        return FilterDecision::Drop(DropReason::SolBelowMin);
    }
    if event.sol_amount > config.max_sol {
        return FilterDecision::Drop(DropReason::SolAboveMax);
    }
    if let Some(market_cap) = event.market_cap {
        if market_cap < config.min_mcap {
            return FilterDecision::Drop(DropReason::McapBelowMin);
        }
        if market_cap > config.max_mcap {
            return FilterDecision::Drop(DropReason::McapAboveMax);
        }
    }
    FilterDecision::Forward
}

pub fn should_forward(event: &CanonicalBurnEvent, config: &ThresholdConfig) -> bool {
    evaluate_burn_event(event, config).is_forward()
}
