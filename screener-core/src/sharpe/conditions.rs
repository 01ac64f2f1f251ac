//! Four independent pass/fail screens and the derating multiplier.
//!
//! | # | Condition            | Passes when                                              |
//! |---|----------------------|----------------------------------------------------------|
//! | 1 | low volatility       | hv30 < hv30_max                                          |
//! | 2 | undervalued          | 0 < PER < per_max and 0 < PBR < pbr_max                  |
//! | 3 | financial stability  | equity ratio, cash-flow quality, FCF, debt/EBITDA        |
//! | 4 | EPS growth           | EPS growth > 5%, revenue growth > 0, ROE > 8%            |
//!
//! A fifth "catalyst" condition is never evaluated and never counted.
//! Four passes → 1.0, three → 0.8, fewer → excluded (`None`).

use serde::Serialize;

use crate::domain::FundamentalSnapshot;
use crate::thresholds::ThresholdProvider;

const SECTION: &str = "sharpe";

pub const DEFAULT_HV30_MAX: f64 = 0.25;
pub const DEFAULT_PER_MAX: f64 = 15.0;
pub const DEFAULT_PBR_MAX: f64 = 1.5;

pub const MIN_EQUITY_RATIO: f64 = 0.40;
pub const MAX_DEBT_TO_EBITDA: f64 = 3.0;
pub const MIN_EPS_GROWTH: f64 = 0.05;
pub const MIN_REVENUE_GROWTH: f64 = 0.0;
pub const MIN_ROE: f64 = 0.08;

pub const FULL_MULTIPLIER: f64 = 1.0;
pub const DERATED_MULTIPLIER: f64 = 0.8;

/// Configurable limits for conditions 1 and 2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConditionThresholds {
    pub hv30_max: f64,
    pub per_max: f64,
    pub pbr_max: f64,
}

impl Default for ConditionThresholds {
    fn default() -> Self {
        Self {
            hv30_max: DEFAULT_HV30_MAX,
            per_max: DEFAULT_PER_MAX,
            pbr_max: DEFAULT_PBR_MAX,
        }
    }
}

impl ConditionThresholds {
    /// Read the `sharpe` section. `hv30_max` falls back to the older
    /// `hv_threshold` key before the literal default.
    pub fn from_provider(thresholds: &dyn ThresholdProvider) -> Self {
        let hv_threshold = thresholds.lookup(SECTION, "hv_threshold", DEFAULT_HV30_MAX);
        Self {
            hv30_max: thresholds.lookup(SECTION, "hv30_max", hv_threshold),
            per_max: thresholds.lookup(SECTION, "per_max", DEFAULT_PER_MAX),
            pbr_max: thresholds.lookup(SECTION, "pbr_max", DEFAULT_PBR_MAX),
        }
    }
}

/// Condition 1.
pub fn check_low_volatility(hv30: Option<f64>, threshold: f64) -> bool {
    hv30.is_some_and(|hv| hv < threshold)
}

/// Condition 2.
pub fn check_undervalued(per: Option<f64>, pbr: Option<f64>, per_max: f64, pbr_max: f64) -> bool {
    match (per, pbr) {
        (Some(per), Some(pbr)) => per > 0.0 && per < per_max && pbr > 0.0 && pbr < pbr_max,
        _ => false,
    }
}

/// Condition 3.
///
/// The debt/EBITDA check is skipped when EBITDA is absent, but a present
/// EBITDA that is zero or negative fails the condition. Missing total debt
/// counts as zero debt.
pub fn check_financial_stability(
    equity_ratio: Option<f64>,
    operating_cf: Option<f64>,
    net_income: Option<f64>,
    fcf: Option<f64>,
    total_debt: Option<f64>,
    ebitda: Option<f64>,
) -> bool {
    if !equity_ratio.is_some_and(|r| r > MIN_EQUITY_RATIO) {
        return false;
    }
    match (operating_cf, net_income) {
        (Some(ocf), Some(ni)) if ocf > ni => {}
        _ => return false,
    }
    if !fcf.is_some_and(|f| f > 0.0) {
        return false;
    }
    match ebitda {
        None => true,
        Some(ebitda) if ebitda > 0.0 => total_debt.unwrap_or(0.0) / ebitda < MAX_DEBT_TO_EBITDA,
        Some(_) => false,
    }
}

/// Condition 4.
pub fn check_eps_growth(eps_growth: Option<f64>, revenue_growth: Option<f64>, roe: Option<f64>) -> bool {
    eps_growth.is_some_and(|g| g > MIN_EPS_GROWTH)
        && revenue_growth.is_some_and(|g| g > MIN_REVENUE_GROWTH)
        && roe.is_some_and(|r| r > MIN_ROE)
}

/// Outcome of each condition. `catalyst` is always `None` (unevaluated).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConditionDetails {
    pub low_volatility: bool,
    pub undervalued: bool,
    pub financial_stability: bool,
    pub eps_growth: bool,
    pub catalyst: Option<bool>,
}

impl ConditionDetails {
    /// Number of evaluated conditions that passed (0..=4).
    pub fn passed(&self) -> usize {
        [
            self.low_volatility,
            self.undervalued,
            self.financial_stability,
            self.eps_growth,
        ]
        .into_iter()
        .filter(|&c| c)
        .count()
    }
}

/// Evaluate conditions 1-4 for a snapshot, using `hv30` for condition 1.
pub fn count_conditions_passed(
    snapshot: &FundamentalSnapshot,
    hv30: Option<f64>,
    thresholds: &ConditionThresholds,
) -> (usize, ConditionDetails) {
    let details = ConditionDetails {
        low_volatility: check_low_volatility(hv30, thresholds.hv30_max),
        undervalued: check_undervalued(
            snapshot.per,
            snapshot.pbr,
            thresholds.per_max,
            thresholds.pbr_max,
        ),
        financial_stability: check_financial_stability(
            snapshot.equity_ratio,
            snapshot.operating_cashflow,
            snapshot.net_income,
            snapshot.fcf,
            snapshot.total_debt,
            snapshot.ebitda,
        ),
        eps_growth: check_eps_growth(snapshot.eps_growth, snapshot.revenue_growth, snapshot.roe),
        catalyst: None,
    };
    (details.passed(), details)
}

/// 4+ → 1.0, 3 → 0.8, otherwise excluded.
pub fn condition_multiplier(passed: usize) -> Option<f64> {
    match passed {
        0..=2 => None,
        3 => Some(DERATED_MULTIPLIER),
        _ => Some(FULL_MULTIPLIER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thresholds::ThresholdSet;

    fn stable(ebitda: Option<f64>, total_debt: Option<f64>) -> bool {
        check_financial_stability(Some(0.5), Some(100.0), Some(50.0), Some(10.0), total_debt, ebitda)
    }

    #[test]
    fn low_volatility_requires_hv30() {
        assert!(check_low_volatility(Some(0.2), 0.25));
        assert!(!check_low_volatility(Some(0.25), 0.25));
        assert!(!check_low_volatility(None, 0.25));
    }

    #[test]
    fn undervalued_bounds_are_exclusive() {
        assert!(check_undervalued(Some(10.0), Some(1.0), 15.0, 1.5));
        assert!(!check_undervalued(Some(15.0), Some(1.0), 15.0, 1.5));
        assert!(!check_undervalued(Some(0.0), Some(1.0), 15.0, 1.5));
        assert!(!check_undervalued(Some(10.0), Some(-1.0), 15.0, 1.5));
        assert!(!check_undervalued(Some(10.0), None, 15.0, 1.5));
    }

    #[test]
    fn stability_passes_when_ebitda_absent() {
        assert!(stable(None, Some(0.0)));
        assert!(stable(None, Some(1_000_000.0)));
    }

    #[test]
    fn stability_fails_when_ebitda_not_positive() {
        assert!(!stable(Some(0.0), Some(0.0)));
        assert!(!stable(Some(-5.0), None));
    }

    #[test]
    fn stability_debt_to_ebitda_limit() {
        assert!(stable(Some(10.0), Some(29.0)));
        assert!(!stable(Some(10.0), Some(30.0)));
        assert!(stable(Some(10.0), None));
    }

    #[test]
    fn stability_sub_checks() {
        // equity ratio at the limit
        assert!(!check_financial_stability(Some(0.4), Some(100.0), Some(50.0), Some(10.0), None, None));
        // cash flow not above earnings
        assert!(!check_financial_stability(Some(0.5), Some(50.0), Some(50.0), Some(10.0), None, None));
        assert!(!check_financial_stability(Some(0.5), None, Some(50.0), Some(10.0), None, None));
        // non-positive free cash flow
        assert!(!check_financial_stability(Some(0.5), Some(100.0), Some(50.0), Some(0.0), None, None));
    }

    #[test]
    fn eps_growth_all_required() {
        assert!(check_eps_growth(Some(0.06), Some(0.01), Some(0.09)));
        assert!(!check_eps_growth(Some(0.05), Some(0.01), Some(0.09)));
        assert!(!check_eps_growth(Some(0.06), Some(0.0), Some(0.09)));
        assert!(!check_eps_growth(Some(0.06), Some(0.01), Some(0.08)));
        assert!(!check_eps_growth(None, Some(0.01), Some(0.09)));
    }

    #[test]
    fn multiplier_mapping() {
        assert_eq!(condition_multiplier(4), Some(1.0));
        assert_eq!(condition_multiplier(5), Some(1.0));
        assert_eq!(condition_multiplier(3), Some(0.8));
        assert_eq!(condition_multiplier(2), None);
        assert_eq!(condition_multiplier(0), None);
    }

    #[test]
    fn count_uses_injected_hv30() {
        let snap = FundamentalSnapshot {
            per: Some(10.0),
            pbr: Some(1.0),
            ..Default::default()
        };
        let th = ConditionThresholds::default();
        let (n, details) = count_conditions_passed(&snap, Some(0.1), &th);
        assert_eq!(n, 2);
        assert!(details.low_volatility && details.undervalued);
        assert_eq!(details.catalyst, None);

        let (n, details) = count_conditions_passed(&snap, None, &th);
        assert_eq!(n, 1);
        assert!(!details.low_volatility);
    }

    #[test]
    fn thresholds_from_provider() {
        let empty = ThresholdSet::new();
        assert_eq!(ConditionThresholds::from_provider(&empty), ConditionThresholds::default());

        let legacy = ThresholdSet::new().with_value("sharpe", "hv_threshold", 0.3);
        assert_eq!(ConditionThresholds::from_provider(&legacy).hv30_max, 0.3);

        let both = legacy.with_value("sharpe", "hv30_max", 0.2);
        assert_eq!(ConditionThresholds::from_provider(&both).hv30_max, 0.2);
    }
}
