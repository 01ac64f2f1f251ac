//! Full Sharpe-framework score for one instrument.

use serde::Serialize;
use tracing::debug;

use super::conditions::{condition_multiplier, count_conditions_passed, ConditionDetails, ConditionThresholds};
use super::ratio::{adjusted_sr, expected_return, raw_sr, EXPECTED_RETURN_CAP};
use super::volatility::VolatilityEstimate;
use crate::domain::FundamentalSnapshot;
use crate::thresholds::ThresholdProvider;

/// Default annual risk-free rate.
pub const DEFAULT_RF: f64 = 0.005;

/// Every intermediate and final figure for a scored (non-excluded) instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharpeResult {
    /// Capped at 1.0.
    pub expected_return: f64,
    pub hv30: Option<f64>,
    pub hv90: Option<f64>,
    pub upside_vol: Option<f64>,
    pub downside_vol: Option<f64>,
    pub raw_sr: Option<f64>,
    pub adjusted_sr: Option<f64>,
    pub conditions_passed: usize,
    pub condition_details: ConditionDetails,
    /// Always 1.0 or 0.8 on a returned result.
    pub condition_multiplier: f64,
    /// `adjusted_sr * condition_multiplier`, absent when adjusted_sr is.
    pub final_score: Option<f64>,
    pub fcf_yield: Option<f64>,
    pub rf: f64,
}

/// Sharpe orchestrator with an injected threshold source.
pub struct SharpeScorer<'a> {
    thresholds: &'a dyn ThresholdProvider,
}

impl<'a> SharpeScorer<'a> {
    pub fn new(thresholds: &'a dyn ThresholdProvider) -> Self {
        Self { thresholds }
    }

    /// Score one instrument. `None` means excluded (fewer than three
    /// conditions passed), even when every other figure is defined.
    pub fn score(&self, snapshot: &FundamentalSnapshot, rf: f64) -> Option<SharpeResult> {
        let vol = VolatilityEstimate::from_prices(&snapshot.price_history);

        let fcf_yield = snapshot.resolved_fcf_yield();
        let expected = expected_return(snapshot.eps_growth, snapshot.dividend_yield, fcf_yield)
            .min(EXPECTED_RETURN_CAP);

        let raw = raw_sr(expected, rf, vol.hv30);
        let adjusted = adjusted_sr(expected, rf, vol.hv30, vol.hv90, vol.upside_vol, vol.downside_vol);

        let limits = ConditionThresholds::from_provider(self.thresholds);
        let (conditions_passed, condition_details) = count_conditions_passed(snapshot, vol.hv30, &limits);
        let Some(multiplier) = condition_multiplier(conditions_passed) else {
            debug!(conditions_passed, "Excluded by condition count");
            return None;
        };

        Some(SharpeResult {
            expected_return: expected,
            hv30: vol.hv30,
            hv90: vol.hv90,
            upside_vol: vol.upside_vol,
            downside_vol: vol.downside_vol,
            raw_sr: raw,
            adjusted_sr: adjusted,
            conditions_passed,
            condition_details,
            condition_multiplier: multiplier,
            final_score: adjusted.map(|sr| sr * multiplier),
            fcf_yield,
            rf,
        })
    }
}

/// Score one instrument against `thresholds` at risk-free rate `rf`.
pub fn compute_full_sharpe_score(
    snapshot: &FundamentalSnapshot,
    thresholds: &dyn ThresholdProvider,
    rf: f64,
) -> Option<SharpeResult> {
    SharpeScorer::new(thresholds).score(snapshot, rf)
}
