//! Screener Core: indicators, pullback detection, and Sharpe-framework scoring.
//!
//! This crate contains the pure computation engine:
//! - Domain types (price bars, fundamental snapshots)
//! - Series indicators (SMA, RSI, Bollinger Bands, volume ratio)
//! - Pullback-in-uptrend detector with a five-day bounce search
//! - Historical and asymmetric volatility, adjusted Sharpe ratio
//! - Four-condition pass/exclude engine and the final score
//! - Threshold lookup with default-on-miss semantics
//!
//! Nothing here fetches data, ranks a universe, or persists results.

pub mod domain;
pub mod indicators;
pub mod pullback;
pub mod sharpe;
pub mod thresholds;

pub use domain::{FundamentalSnapshot, PriceBar};
pub use pullback::{BounceDetails, PullbackDetector, PullbackParams, PullbackReport};
pub use sharpe::{compute_full_sharpe_score, SharpeResult, SharpeScorer, VolatilityEstimate, DEFAULT_RF};
pub use thresholds::{ThresholdError, ThresholdProvider, ThresholdSet};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: results and providers can cross threads, so a
    /// caller can score a universe with one task per symbol.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<PriceBar>();
        require_sync::<PriceBar>();
        require_send::<FundamentalSnapshot>();
        require_sync::<FundamentalSnapshot>();
        require_send::<PullbackReport>();
        require_sync::<PullbackReport>();
        require_send::<SharpeResult>();
        require_sync::<SharpeResult>();
        require_send::<ThresholdSet>();
        require_sync::<ThresholdSet>();
        require_send::<PullbackDetector<'static>>();
        require_sync::<PullbackDetector<'static>>();
        require_send::<SharpeScorer<'static>>();
        require_sync::<SharpeScorer<'static>>();
    }

    #[test]
    fn global_thresholds_never_fail() {
        // Whatever the working directory holds, lookups resolve to a number.
        let set = ThresholdSet::global();
        let v = set.lookup("technicals", "definitely_not_a_key", 42.0);
        assert_eq!(v, 42.0);
    }
}
