//! Series indicators used by the pullback detector.
//!
//! Indicators are pure functions: bar history in, numeric series out. Each
//! output vector has the same length as the input and carries `f64::NAN` in
//! its warmup positions. No value at bar t depends on bars after t.

pub mod bollinger;
pub mod rsi;
pub mod sma;
pub mod volume_ratio;

pub use bollinger::{Bollinger, BollingerBand};
pub use rsi::Rsi;
pub use sma::Sma;
pub use volume_ratio::VolumeRatio;

use crate::domain::{closes, PriceBar};

/// Trait for indicators.
///
/// # Look-ahead contamination guard
/// No indicator value at bar t may depend on data from bar t+1 or later.
/// Every indicator must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_50", "rsi_14").
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[PriceBar]) -> Vec<f64>;
}

/// Apply `stat` to every full trailing window of closes.
///
/// Positions before the first full window, and windows holding a NaN close,
/// stay NaN.
pub(crate) fn rolling_close_stat(
    bars: &[PriceBar],
    period: usize,
    stat: impl Fn(&[f64]) -> f64,
) -> Vec<f64> {
    let closes = closes(bars);
    let mut out = vec![f64::NAN; closes.len()];
    if period == 0 {
        return out;
    }
    for (start, window) in closes.windows(period).enumerate() {
        if window.iter().all(|c| !c.is_nan()) {
            out[start + period - 1] = stat(window);
        }
    }
    out
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with the n - 1 divisor. NaN below two values.
pub(crate) fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Create bars from close prices for testing, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    closes.iter().map(|&c| PriceBar::new(c, 1000.0)).collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolling_stat_skips_warmup_and_nan_windows() {
        let mut bars = make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        bars[1].close = f64::NAN;
        let out = rolling_close_stat(&bars, 2, |w| w[0] + w[1]);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert!(out[2].is_nan());
        assert_approx(out[3], 7.0, DEFAULT_EPSILON);
        assert_approx(out[4], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sample_std_needs_two_values() {
        assert!(sample_std(&[5.0]).is_nan());
        assert_approx(sample_std(&[2.0, 4.0, 6.0]), 2.0, DEFAULT_EPSILON);
    }
}
