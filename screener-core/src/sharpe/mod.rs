//! Risk-adjusted-return scoring ("Sharpe framework").
//!
//! Pipeline for one instrument:
//! closes → volatility estimates → adjusted Sharpe ratio, and in parallel
//! fundamentals + HV30 → four pass/fail conditions → multiplier. The final
//! score is the adjusted ratio times the multiplier, or the instrument is
//! excluded when too few conditions pass.
//!
//! "Insufficient data" is always `None`, never zero or NaN.

pub mod conditions;
pub mod ratio;
pub mod score;
pub mod volatility;

pub use conditions::{
    check_eps_growth, check_financial_stability, check_low_volatility, check_undervalued,
    condition_multiplier, count_conditions_passed, ConditionDetails, ConditionThresholds,
};
pub use ratio::{adjusted_sr, expected_return, raw_sr};
pub use score::{compute_full_sharpe_score, SharpeResult, SharpeScorer, DEFAULT_RF};
pub use volatility::{historical_volatility, upside_downside_volatility, VolatilityEstimate};
