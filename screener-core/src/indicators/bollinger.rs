//! Bollinger Bands: rolling mean with a sample-deviation envelope.
//!
//! Each band is its own indicator. Upper and lower sit `mult` sample
//! standard deviations (n - 1 divisor) either side of the SMA, so a period
//! of 1 yields NaN outer bands. The detector only reads the lower band.

use super::{mean, rolling_close_stat, sample_std, Indicator};
use crate::domain::PriceBar;

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    pub fn new(band: BollingerBand, period: usize, multiplier: f64) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        let label = match band {
            BollingerBand::Upper => "upper",
            BollingerBand::Middle => "middle",
            BollingerBand::Lower => "lower",
        };
        Self {
            period,
            multiplier,
            band,
            name: format!("bollinger_{label}_{period}_{multiplier}"),
        }
    }

    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::new(BollingerBand::Upper, period, multiplier)
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::new(BollingerBand::Middle, period, multiplier)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::new(BollingerBand::Lower, period, multiplier)
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let offset = match self.band {
            BollingerBand::Middle => return rolling_close_stat(bars, self.period, mean),
            BollingerBand::Upper => self.multiplier,
            BollingerBand::Lower => -self.multiplier,
        };
        rolling_close_stat(bars, self.period, |w| mean(w) + offset * sample_std(w))
    }
}
