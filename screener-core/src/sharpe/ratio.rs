//! Expected return and the trend/asymmetry-adjusted Sharpe ratio.
//!
//! raw_sr      = (expected_return - rf) / (hv30 * 0.8)
//! vol_trend   = hv90 / hv30            (1.0 when hv90 is absent)
//! asymmetry   = min(up / down, 2.0)    (1.0 when either side is absent or down <= 0)
//! adjusted_sr = raw_sr * vol_trend * asymmetry
//!
//! Both ratios are `None` whenever hv30 is absent or not strictly positive.

/// Scale applied to HV30 in the Sharpe denominator.
pub const HV_DENOMINATOR_SCALE: f64 = 0.8;

/// Upper bound on the upside/downside asymmetry factor.
pub const MAX_ASYMMETRY: f64 = 2.0;

/// Upper bound the orchestrator applies to expected return.
pub const EXPECTED_RETURN_CAP: f64 = 1.0;

/// Sum of EPS growth, dividend yield and FCF yield, each absent input
/// counting as zero. Not capped here.
pub fn expected_return(
    eps_growth: Option<f64>,
    dividend_yield: Option<f64>,
    fcf_yield: Option<f64>,
) -> f64 {
    eps_growth.unwrap_or(0.0) + dividend_yield.unwrap_or(0.0) + fcf_yield.unwrap_or(0.0)
}

fn usable_hv30(hv30: Option<f64>) -> Option<f64> {
    hv30.filter(|&hv| hv > 0.0)
}

/// Unadjusted Sharpe ratio.
pub fn raw_sr(expected_return: f64, rf: f64, hv30: Option<f64>) -> Option<f64> {
    let hv30 = usable_hv30(hv30)?;
    Some((expected_return - rf) / (hv30 * HV_DENOMINATOR_SCALE))
}

/// Sharpe ratio scaled by volatility trend and upside/downside asymmetry.
///
/// Missing supporting data makes the corresponding factor neutral (1.0).
pub fn adjusted_sr(
    expected_return: f64,
    rf: f64,
    hv30: Option<f64>,
    hv90: Option<f64>,
    upside_vol: Option<f64>,
    downside_vol: Option<f64>,
) -> Option<f64> {
    let hv = usable_hv30(hv30)?;
    let sr = raw_sr(expected_return, rf, hv30)?;

    let vol_trend = hv90.map_or(1.0, |hv90| hv90 / hv);
    let asymmetry = match (upside_vol, downside_vol) {
        (Some(up), Some(down)) if down > 0.0 => (up / down).min(MAX_ASYMMETRY),
        _ => 1.0,
    };

    Some(sr * vol_trend * asymmetry)
}
