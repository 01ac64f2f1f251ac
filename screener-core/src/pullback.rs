//! Pullback-in-uptrend detector.
//!
//! Three conditions over a daily close/volume series:
//! 1. Uptrend: close > SMA200 and SMA50 > SMA200.
//! 2. Pullback depth: drawdown from the 60-bar high inside a configured band,
//!    with close still above SMA200.
//! 3. Bounce: the best single-day score over the last five bars reaches a
//!    configured minimum.
//!
//! Needs at least 200 bars; shorter series get the canonical
//! insufficient-data report. All comparisons use unrounded values; only the
//! report fields are rounded.

use serde::Serialize;
use tracing::debug;

use crate::domain::PriceBar;
use crate::indicators::{Bollinger, Indicator, Rsi, Sma, VolumeRatio};
use crate::thresholds::ThresholdProvider;

/// Bars required before the detector evaluates anything.
pub const MIN_BARS: usize = 200;

/// Trading days scanned for a bounce, offset 0 being the latest bar.
pub const BOUNCE_LOOKBACK: usize = 5;

/// Window for the recent-high reference.
pub const RECENT_HIGH_WINDOW: usize = 60;

const SECTION: &str = "technicals";

/// Tunable thresholds and point values for the detector.
#[derive(Debug, Clone, PartialEq)]
pub struct PullbackParams {
    pub pullback_min: f64,
    pub pullback_max: f64,
    pub rsi_reversal_lo: f64,
    pub rsi_reversal_hi: f64,
    pub rsi_depth_lo: f64,
    pub rsi_depth_hi: f64,
    pub bb_proximity_mult: f64,
    pub volume_surge_ratio: f64,
    pub score_rsi_reversal: f64,
    pub score_rsi_depth: f64,
    pub score_bb_proximity: f64,
    pub score_volume_surge: f64,
    pub score_price_reversal: f64,
    pub bounce_signal_min: f64,
}

impl Default for PullbackParams {
    fn default() -> Self {
        Self {
            pullback_min: -0.20,
            pullback_max: -0.05,
            rsi_reversal_lo: 25.0,
            rsi_reversal_hi: 50.0,
            rsi_depth_lo: 25.0,
            rsi_depth_hi: 35.0,
            bb_proximity_mult: 1.02,
            volume_surge_ratio: 1.2,
            score_rsi_reversal: 40.0,
            score_rsi_depth: 15.0,
            score_bb_proximity: 25.0,
            score_volume_surge: 10.0,
            score_price_reversal: 10.0,
            bounce_signal_min: 40.0,
        }
    }
}

impl PullbackParams {
    /// Resolve every parameter from the `technicals` section, falling back to
    /// the literal default on a miss.
    pub fn from_provider(thresholds: &dyn ThresholdProvider) -> Self {
        let d = Self::default();
        let th = |key: &str, default: f64| thresholds.lookup(SECTION, key, default);
        Self {
            pullback_min: th("pullback_min", d.pullback_min),
            pullback_max: th("pullback_max", d.pullback_max),
            rsi_reversal_lo: th("rsi_reversal_lo", d.rsi_reversal_lo),
            rsi_reversal_hi: th("rsi_reversal_hi", d.rsi_reversal_hi),
            rsi_depth_lo: th("rsi_depth_lo", d.rsi_depth_lo),
            rsi_depth_hi: th("rsi_depth_hi", d.rsi_depth_hi),
            bb_proximity_mult: th("bb_proximity_mult", d.bb_proximity_mult),
            volume_surge_ratio: th("volume_surge_ratio", d.volume_surge_ratio),
            score_rsi_reversal: th("score_rsi_reversal", d.score_rsi_reversal),
            score_rsi_depth: th("score_rsi_depth", d.score_rsi_depth),
            score_bb_proximity: th("score_bb_proximity", d.score_bb_proximity),
            score_volume_surge: th("score_volume_surge", d.score_volume_surge),
            score_price_reversal: th("score_price_reversal", d.score_price_reversal),
            bounce_signal_min: th("bounce_signal_min", d.bounce_signal_min),
        }
    }
}

/// Which bounce sub-conditions fired on the best-scoring day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BounceDetails {
    pub rsi_reversal: bool,
    pub rsi_depth_bonus: bool,
    pub bb_proximity: bool,
    pub volume_surge: bool,
    pub price_reversal: bool,
    /// Offset of the best day, 0 = most recent bar.
    pub lookback_day: usize,
}

/// Pullback/bounce analysis for one series.
///
/// Percentages are rounded to 4 places, prices/RSI/score to 2.
/// `volume_ratio` is NaN when the 20-bar volume mean is zero.
#[derive(Debug, Clone, Serialize)]
pub struct PullbackReport {
    pub uptrend: bool,
    pub is_pullback: bool,
    pub pullback_pct: f64,
    pub bounce_signal: bool,
    pub bounce_score: f64,
    pub bounce_details: BounceDetails,
    pub rsi: f64,
    pub volume_ratio: f64,
    pub sma50: f64,
    pub sma200: f64,
    pub current_price: f64,
    pub recent_high: f64,
    pub all_conditions: bool,
}

impl PullbackReport {
    /// Canonical report for a series shorter than [`MIN_BARS`].
    pub fn insufficient_data() -> Self {
        Self {
            uptrend: false,
            is_pullback: false,
            pullback_pct: 0.0,
            bounce_signal: false,
            bounce_score: 0.0,
            bounce_details: BounceDetails::default(),
            rsi: f64::NAN,
            volume_ratio: f64::NAN,
            sma50: f64::NAN,
            sma200: f64::NAN,
            current_price: f64::NAN,
            recent_high: f64::NAN,
            all_conditions: false,
        }
    }
}

/// Detector with an injected threshold source.
pub struct PullbackDetector<'a> {
    thresholds: &'a dyn ThresholdProvider,
}

impl<'a> PullbackDetector<'a> {
    pub fn new(thresholds: &'a dyn ThresholdProvider) -> Self {
        Self { thresholds }
    }

    pub fn detect(&self, bars: &[PriceBar]) -> PullbackReport {
        detect_pullback(bars, &PullbackParams::from_provider(self.thresholds))
    }
}

/// Inputs for scoring a single day of the bounce lookback.
#[derive(Debug, Clone, Copy)]
struct DayInputs {
    rsi: f64,
    prev_rsi: f64,
    close: f64,
    prev_close: f64,
    lower_band: f64,
    volume_ratio: f64,
}

/// Sum the points of every sub-condition that holds on one day.
fn score_day(day: &DayInputs, params: &PullbackParams) -> (f64, BounceDetails) {
    let mut score = 0.0;
    let mut details = BounceDetails::default();

    // NaN fails every range check below.
    if (params.rsi_reversal_lo..=params.rsi_reversal_hi).contains(&day.rsi)
        && !day.prev_rsi.is_nan()
        && day.rsi > day.prev_rsi
    {
        score += params.score_rsi_reversal;
        details.rsi_reversal = true;
    }

    if (params.rsi_depth_lo..=params.rsi_depth_hi).contains(&day.rsi) {
        score += params.score_rsi_depth;
        details.rsi_depth_bonus = true;
    }

    if day.lower_band > 0.0 && day.close <= day.lower_band * params.bb_proximity_mult {
        score += params.score_bb_proximity;
        details.bb_proximity = true;
    }

    if day.volume_ratio > params.volume_surge_ratio {
        score += params.score_volume_surge;
        details.volume_surge = true;
    }

    if day.close > day.prev_close {
        score += params.score_price_reversal;
        details.price_reversal = true;
    }

    (score, details)
}

/// Run the detector with explicit parameters.
pub fn detect_pullback(bars: &[PriceBar], params: &PullbackParams) -> PullbackReport {
    let n = bars.len();
    if n < MIN_BARS {
        debug!(bars = n, required = MIN_BARS, "Too few bars for pullback detection");
        return PullbackReport::insufficient_data();
    }
    let last = n - 1;

    let sma50 = Sma::new(50).compute(bars)[last];
    let sma200 = Sma::new(200).compute(bars)[last];
    let rsi = Rsi::new(14).compute(bars);
    let lower_band = Bollinger::lower(20, 2.0).compute(bars);
    let volume_ratio = VolumeRatio::new(5, 20).compute(bars);

    let current_price = bars[last].close;
    let recent_high = bars[n - RECENT_HIGH_WINDOW..]
        .iter()
        .map(|b| b.close)
        .fold(f64::NAN, f64::max);
    let pullback_pct = if recent_high > 0.0 {
        (current_price - recent_high) / recent_high
    } else {
        0.0
    };

    let uptrend = current_price > sma200 && sma50 > sma200;
    let is_pullback = (params.pullback_min..=params.pullback_max).contains(&pullback_pct)
        && current_price > sma200;

    let mut bounce_score = 0.0;
    let mut bounce_details = BounceDetails::default();
    for offset in 0..BOUNCE_LOOKBACK {
        let idx = last - offset;
        let day = DayInputs {
            rsi: rsi[idx],
            prev_rsi: rsi[idx - 1],
            close: bars[idx].close,
            prev_close: bars[idx - 1].close,
            lower_band: lower_band[idx],
            volume_ratio: volume_ratio[idx],
        };
        let (score, details) = score_day(&day, params);
        // Strictly greater: on a tie the more recent day is kept.
        if score > bounce_score {
            bounce_score = score;
            bounce_details = BounceDetails {
                lookback_day: offset,
                ..details
            };
        }
    }
    let bounce_signal = bounce_score >= params.bounce_signal_min;

    PullbackReport {
        uptrend,
        is_pullback,
        pullback_pct: round_to(pullback_pct, 4),
        bounce_signal,
        bounce_score: round_to(bounce_score, 2),
        bounce_details,
        rsi: round_to(rsi[last], 2),
        volume_ratio: round_to(volume_ratio[last], 4),
        sma50: round_to(sma50, 2),
        sma200: round_to(sma200, 2),
        current_price: round_to(current_price, 2),
        recent_high: round_to(recent_high, 2),
        all_conditions: uptrend && is_pullback && bounce_signal,
    }
}

/// Round to `places` decimals for presentation.
///
/// Rounds the exact binary value with ties to even, so 100.125 becomes
/// 100.12. NaN stays NaN.
pub fn round_to(value: f64, places: usize) -> f64 {
    format!("{value:.places$}").parse().unwrap_or(value)
}
