//! Historical and asymmetric (upside/downside) volatility from closes.
//!
//! Each estimator uses the most recent `window + 1` closes, which must all be
//! strictly positive, and annualizes the sample standard deviation (N - 1)
//! of their log returns by sqrt(252).

use serde::Serialize;

/// Trading days per year used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Short volatility window (HV30).
pub const HV_SHORT_WINDOW: usize = 30;

/// Long volatility window (HV90).
pub const HV_LONG_WINDOW: usize = 90;

/// Log returns of the trailing `window + 1` closes, or `None` if there are
/// too few closes or any of them is not strictly positive.
fn trailing_log_returns(prices: &[f64], window: usize) -> Option<Vec<f64>> {
    if prices.len() < window + 1 {
        return None;
    }
    let tail = &prices[prices.len() - (window + 1)..];
    if tail.iter().any(|p| p.is_nan() || *p <= 0.0) {
        return None;
    }
    Some(tail.windows(2).map(|w| w[1].ln() - w[0].ln()).collect())
}

/// Annualized sample standard deviation; `None` below two observations.
fn annualized_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt())
}

/// Annualized historical volatility over the trailing `window` log returns.
pub fn historical_volatility(prices: &[f64], window: usize) -> Option<f64> {
    annualized_std(&trailing_log_returns(prices, window)?)
}

/// Annualized volatility of the strictly positive and strictly negative log
/// returns in the trailing window, as `(upside, downside)`. Each side needs at
/// least two returns.
pub fn upside_downside_volatility(prices: &[f64], window: usize) -> (Option<f64>, Option<f64>) {
    let Some(returns) = trailing_log_returns(prices, window) else {
        return (None, None);
    };
    let up: Vec<f64> = returns.iter().copied().filter(|&r| r > 0.0).collect();
    let down: Vec<f64> = returns.iter().copied().filter(|&r| r < 0.0).collect();
    (annualized_std(&up), annualized_std(&down))
}

/// Every volatility figure the Sharpe pipeline needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct VolatilityEstimate {
    pub hv30: Option<f64>,
    pub hv90: Option<f64>,
    pub upside_vol: Option<f64>,
    pub downside_vol: Option<f64>,
}

impl VolatilityEstimate {
    pub fn from_prices(prices: &[f64]) -> Self {
        let (upside_vol, downside_vol) = upside_downside_volatility(prices, HV_SHORT_WINDOW);
        Self {
            hv30: historical_volatility(prices, HV_SHORT_WINDOW),
            hv90: historical_volatility(prices, HV_LONG_WINDOW),
            upside_vol,
            downside_vol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "actual={actual}, expected={expected}"
        );
    }

    #[test]
    fn hv_needs_window_plus_one_prices() {
        let prices = vec![100.0; 30];
        assert_eq!(historical_volatility(&prices, 30), None);
        let prices = vec![100.0; 31];
        assert_eq!(historical_volatility(&prices, 30), Some(0.0));
    }

    #[test]
    fn hv_rejects_non_positive_prices_in_window() {
        let mut prices = vec![100.0; 31];
        prices[10] = 0.0;
        assert_eq!(historical_volatility(&prices, 30), None);
    }

    #[test]
    fn hv_ignores_prices_outside_window() {
        let mut prices = vec![100.0; 40];
        prices[0] = -5.0;
        assert_eq!(historical_volatility(&prices, 30), Some(0.0));
    }

    #[test]
    fn hv_single_drop_after_flat_run() {
        // 40 flat closes then one drop: 29 zero returns and one ln(0.9).
        let mut prices = vec![100.0; 40];
        prices.push(90.0);
        let r = (0.9f64).ln();
        let mean = r / 30.0;
        let variance = (29.0 * mean * mean + (r - mean).powi(2)) / 29.0;
        let expected = variance.sqrt() * 252f64.sqrt();

        let hv = historical_volatility(&prices, 30).unwrap();
        assert_close(hv, expected);
        assert!(hv > 0.0 && hv < 0.5);
    }

    #[test]
    fn upside_downside_split() {
        // returns alternate ln(1.1), ln(1/1.1): two of each in a window of 4
        let prices = [100.0, 110.0, 100.0, 110.0, 100.0];
        let (up, down) = upside_downside_volatility(&prices, 4);
        assert_close(up.unwrap(), 0.0);
        assert_close(down.unwrap(), 0.0);
    }

    #[test]
    fn one_sided_returns_leave_other_side_absent() {
        let prices: Vec<f64> = (0..31).map(|i| 100.0 + i as f64).collect();
        let (up, down) = upside_downside_volatility(&prices, 30);
        assert!(up.is_some());
        assert_eq!(down, None);
    }

    #[test]
    fn estimate_from_short_history_is_all_absent() {
        let est = VolatilityEstimate::from_prices(&[100.0, 101.0]);
        assert_eq!(est, VolatilityEstimate::default());
    }

    #[test]
    fn estimate_between_windows_has_hv30_only() {
        let prices: Vec<f64> = (0..60).map(|i| 100.0 + (i % 3) as f64).collect();
        let est = VolatilityEstimate::from_prices(&prices);
        assert!(est.hv30.is_some());
        assert_eq!(est.hv90, None);
    }
}
