//! PriceBar: one daily close/volume observation.

use serde::{Deserialize, Serialize};

/// Daily close and volume for a single instrument.
///
/// The trading date is implicit in the bar's position: a price series is a
/// slice of bars ordered oldest-first, most recent last. Missing trading days
/// are simply absent; nothing is gap-filled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    pub fn new(close: f64, volume: f64) -> Self {
        Self { close, volume }
    }

    /// Returns true if the close is finite and strictly positive and the
    /// volume is finite and non-negative.
    pub fn is_sane(&self) -> bool {
        self.close.is_finite() && self.close > 0.0 && self.volume.is_finite() && self.volume >= 0.0
    }
}

/// Close column of a bar series.
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Volume column of a bar series.
pub fn volumes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.volume).collect()
}
