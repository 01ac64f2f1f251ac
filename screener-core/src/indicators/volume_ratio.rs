//! Volume ratio: short-window mean volume over long-window mean volume.
//!
//! At bar t both windows end at t (inclusive); near the start of the series
//! they are truncated to the bars available. NaN where the long-window mean is
//! not strictly positive.

use super::{mean, Indicator};
use crate::domain::{volumes, PriceBar};

#[derive(Debug, Clone)]
pub struct VolumeRatio {
    short: usize,
    long: usize,
    name: String,
}

impl VolumeRatio {
    pub fn new(short: usize, long: usize) -> Self {
        assert!(short >= 1, "short window must be >= 1");
        assert!(long >= short, "long window must be >= short window");
        Self {
            short,
            long,
            name: format!("volume_ratio_{short}_{long}"),
        }
    }
}

fn trailing_mean(values: &[f64], end: usize, window: usize) -> f64 {
    let start = (end + 1).saturating_sub(window);
    mean(&values[start..=end])
}

impl Indicator for VolumeRatio {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let volumes = volumes(bars);
        (0..volumes.len())
            .map(|i| {
                let long_mean = trailing_mean(&volumes, i, self.long);
                if long_mean > 0.0 {
                    trailing_mean(&volumes, i, self.short) / long_mean
                } else {
                    f64::NAN
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    fn volume_bars(volumes: &[f64]) -> Vec<PriceBar> {
        volumes.iter().map(|&v| PriceBar::new(100.0, v)).collect()
    }

    #[test]
    fn ratio_of_trailing_means() {
        // last 2 = [30, 40] mean 35; last 4 = [10, 20, 30, 40] mean 25
        let bars = volume_bars(&[10.0, 20.0, 30.0, 40.0]);
        let result = VolumeRatio::new(2, 4).compute(&bars);
        assert_approx(result[3], 35.0 / 25.0, DEFAULT_EPSILON);
    }

    #[test]
    fn truncated_windows_at_series_start() {
        let bars = volume_bars(&[10.0, 30.0]);
        let result = VolumeRatio::new(5, 20).compute(&bars);
        assert_approx(result[0], 1.0, DEFAULT_EPSILON);
        assert_approx(result[1], 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn zero_volume_is_nan() {
        let bars = volume_bars(&[0.0, 0.0, 0.0]);
        let result = VolumeRatio::new(2, 3).compute(&bars);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn name_encodes_windows() {
        assert_eq!(VolumeRatio::new(5, 20).name(), "volume_ratio_5_20");
    }
}
