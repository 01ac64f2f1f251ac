//! Universe screening and ranking.
//!
//! Each symbol is evaluated independently (one rayon task per symbol when
//! `parallel` is set). Symbols whose data cannot be fetched are logged and
//! listed in `failed`; excluded instruments are counted. Survivors are
//! ranked best first and truncated to `top_n`.

use std::cmp::Ordering;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use screener_core::{PullbackDetector, PullbackReport, SharpeResult, SharpeScorer, ThresholdSet};

use crate::config::{ConfigError, ScreenConfig};
use crate::provider::MarketDataProvider;

/// Framework limits applied on top of the base thresholds before scoring.
pub const FRAMEWORK_OVERRIDES: [(&str, f64); 3] =
    [("hv30_max", 0.25), ("per_max", 15.0), ("pbr_max", 1.5)];

/// Base thresholds with the Sharpe framework's own limits in `[sharpe]`.
pub fn apply_framework_overrides(base: ThresholdSet) -> ThresholdSet {
    FRAMEWORK_OVERRIDES
        .iter()
        .fold(base, |set, &(key, value)| set.with_value("sharpe", key, value))
}

/// One ranked Sharpe-framework candidate.
#[derive(Debug, Clone, Serialize)]
pub struct SharpeCandidate {
    pub symbol: String,
    #[serde(flatten)]
    pub result: SharpeResult,
}

/// One pullback candidate (all three conditions met).
#[derive(Debug, Clone, Serialize)]
pub struct PullbackCandidate {
    pub symbol: String,
    #[serde(flatten)]
    pub report: PullbackReport,
}

/// Outcome of screening a universe.
#[derive(Debug, Clone, Serialize)]
pub struct ScreenReport<T> {
    /// BLAKE3 digest of the config that produced this report.
    pub config_hash: String,
    /// Ranked candidates, at most `top_n`.
    pub candidates: Vec<T>,
    /// Symbols evaluated but not kept (excluded or conditions unmet).
    pub rejected: usize,
    /// Symbols whose data could not be fetched.
    pub failed: Vec<String>,
}

enum Evaluation<T> {
    Kept(T),
    Rejected,
    Failed(String),
}

fn evaluate_all<T, F>(symbols: &[String], parallel: bool, eval: F) -> Vec<Evaluation<T>>
where
    T: Send,
    F: Fn(&str) -> Evaluation<T> + Send + Sync,
{
    if parallel {
        symbols.par_iter().map(|s| eval(s)).collect()
    } else {
        symbols.iter().map(|s| eval(s)).collect()
    }
}

fn assemble<T>(
    screen: &str,
    config: &ScreenConfig,
    evaluations: Vec<Evaluation<T>>,
    rank: impl Fn(&T, &T) -> Ordering,
) -> Result<ScreenReport<T>, ConfigError> {
    let total = evaluations.len();
    let mut candidates = Vec::new();
    let mut rejected = 0;
    let mut failed = Vec::new();
    for evaluation in evaluations {
        match evaluation {
            Evaluation::Kept(c) => candidates.push(c),
            Evaluation::Rejected => rejected += 1,
            Evaluation::Failed(symbol) => failed.push(symbol),
        }
    }

    candidates.sort_by(|a, b| rank(a, b));
    candidates.truncate(config.top_n);

    info!(
        screen,
        total,
        kept = candidates.len(),
        rejected,
        failed = failed.len(),
        "Screen complete"
    );

    Ok(ScreenReport {
        config_hash: config.config_hash()?,
        candidates,
        rejected,
        failed,
    })
}

/// Descending by score, absent scores last.
pub fn by_score_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Ranks a universe by the Sharpe-framework final score.
pub struct SharpeScreener<'a> {
    provider: &'a dyn MarketDataProvider,
    config: ScreenConfig,
    thresholds: ThresholdSet,
}

impl<'a> SharpeScreener<'a> {
    /// `base` gets the framework overrides applied.
    pub fn new(provider: &'a dyn MarketDataProvider, config: ScreenConfig, base: ThresholdSet) -> Self {
        Self {
            provider,
            config,
            thresholds: apply_framework_overrides(base),
        }
    }

    /// Thresholds from the config's own source.
    pub fn from_config(provider: &'a dyn MarketDataProvider, config: ScreenConfig) -> Self {
        let base = config.base_thresholds();
        Self::new(provider, config, base)
    }

    pub fn thresholds(&self) -> &ThresholdSet {
        &self.thresholds
    }

    pub fn screen(
        &self,
        symbols: &[String],
    ) -> Result<ScreenReport<SharpeCandidate>, ConfigError> {
        let rf = self.config.effective_rf(&self.thresholds);
        let scorer = SharpeScorer::new(&self.thresholds);

        let evaluations = evaluate_all(symbols, self.config.parallel, |symbol| {
            let snapshot = match self.provider.snapshot(symbol) {
                Ok(s) => s,
                Err(e) => {
                    warn!(symbol, provider = self.provider.name(), error = %e, "Skipping symbol");
                    return Evaluation::Failed(symbol.to_string());
                }
            };
            match scorer.score(&snapshot, rf) {
                Some(result) => Evaluation::Kept(SharpeCandidate {
                    symbol: symbol.to_string(),
                    result,
                }),
                None => Evaluation::Rejected,
            }
        });

        assemble("sharpe", &self.config, evaluations, |a, b| {
            by_score_desc(a.result.final_score, b.result.final_score)
        })
    }
}

/// Finds pullback-in-uptrend setups across a universe.
pub struct PullbackScreener<'a> {
    provider: &'a dyn MarketDataProvider,
    config: ScreenConfig,
    thresholds: ThresholdSet,
}

impl<'a> PullbackScreener<'a> {
    pub fn new(provider: &'a dyn MarketDataProvider, config: ScreenConfig, thresholds: ThresholdSet) -> Self {
        Self {
            provider,
            config,
            thresholds,
        }
    }

    pub fn from_config(provider: &'a dyn MarketDataProvider, config: ScreenConfig) -> Self {
        let thresholds = config.base_thresholds();
        Self::new(provider, config, thresholds)
    }

    pub fn screen(
        &self,
        symbols: &[String],
    ) -> Result<ScreenReport<PullbackCandidate>, ConfigError> {
        let detector = PullbackDetector::new(&self.thresholds);

        let evaluations = evaluate_all(symbols, self.config.parallel, |symbol| {
            let bars = match self.provider.price_series(symbol) {
                Ok(b) => b,
                Err(e) => {
                    warn!(symbol, provider = self.provider.name(), error = %e, "Skipping symbol");
                    return Evaluation::Failed(symbol.to_string());
                }
            };
            let report = detector.detect(&bars);
            if report.all_conditions {
                Evaluation::Kept(PullbackCandidate {
                    symbol: symbol.to_string(),
                    report,
                })
            } else {
                Evaluation::Rejected
            }
        });

        assemble("pullback", &self.config, evaluations, |a, b| {
            by_score_desc(Some(a.report.bounce_score), Some(b.report.bounce_score))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use screener_core::ThresholdProvider;

    #[test]
    fn overrides_replace_base_values() {
        let base = ThresholdSet::new()
            .with_value("sharpe", "per_max", 30.0)
            .with_value("sharpe", "rf", 0.02);
        let set = apply_framework_overrides(base);
        assert_eq!(set.lookup("sharpe", "per_max", 0.0), 15.0);
        assert_eq!(set.lookup("sharpe", "pbr_max", 0.0), 1.5);
        assert_eq!(set.lookup("sharpe", "hv30_max", 0.0), 0.25);
        assert_eq!(set.lookup("sharpe", "rf", 0.0), 0.02);
    }

    #[test]
    fn absent_scores_sort_last() {
        let mut scores = vec![None, Some(0.5), Some(2.0), None, Some(-1.0)];
        scores.sort_by(|a, b| by_score_desc(*a, *b));
        assert_eq!(scores, vec![Some(2.0), Some(0.5), Some(-1.0), None, None]);
    }
}
