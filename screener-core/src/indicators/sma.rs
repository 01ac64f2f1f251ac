//! Simple Moving Average (SMA) of closes.
//!
//! The pullback detector compares SMA(50) against SMA(200) for the trend
//! filter. Any NaN close inside a window makes that position NaN.

use super::{mean, rolling_close_stat, Indicator};
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        rolling_close_stat(bars, self.period, mean)
    }
}
