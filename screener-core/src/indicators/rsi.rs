//! Relative Strength Index (RSI).
//!
//! Wilder smoothing: average gain and average loss are exponentially weighted
//! with alpha = 1/period, recursively from the first bar (whose change counts
//! as a zero gain and zero loss). Output is NaN until `period` observations
//! have been seen.
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//!
//! The formula is evaluated as-is: avg_loss == 0 with avg_gain > 0 gives an
//! infinite ratio and RSI = 100; both averages zero gives NaN.

use super::Indicator;
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        let alpha = 1.0 / self.period as f64;

        let mut avg_gain = 0.0;
        let mut avg_loss = 0.0;
        for i in 0..n {
            // An undefined change (first bar, or a NaN close) is neither gain nor loss.
            let change = if i == 0 {
                f64::NAN
            } else {
                bars[i].close - bars[i - 1].close
            };
            let gain = if change > 0.0 { change } else { 0.0 };
            let loss = if change < 0.0 { -change } else { 0.0 };

            if i == 0 {
                avg_gain = gain;
                avg_loss = loss;
            } else {
                avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
                avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;
            }

            if i + 1 >= self.period {
                result[i] = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
            }
        }

        result
    }
}
