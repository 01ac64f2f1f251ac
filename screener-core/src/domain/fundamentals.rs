//! FundamentalSnapshot: per-instrument fundamentals plus close history.

use serde::{Deserialize, Serialize};

/// Scalar fundamentals for one instrument.
///
/// Every metric is optional: a missing field is `None`, never zero. Ratios
/// and growth rates are decimals (0.08 means 8%).
///
/// `price_history` holds chronological closes (most recent last) and feeds
/// the volatility estimators. It may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundamentalSnapshot {
    pub per: Option<f64>,
    pub pbr: Option<f64>,
    pub roe: Option<f64>,
    pub equity_ratio: Option<f64>,
    pub operating_cashflow: Option<f64>,
    pub net_income: Option<f64>,
    pub fcf: Option<f64>,
    pub total_debt: Option<f64>,
    pub ebitda: Option<f64>,
    pub eps_growth: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub market_cap: Option<f64>,
    /// Pre-supplied free-cash-flow yield. Takes precedence over fcf / market_cap.
    pub fcf_yield: Option<f64>,
    pub price_history: Vec<f64>,
}

impl FundamentalSnapshot {
    /// Free-cash-flow yield: the supplied value if present, otherwise
    /// `fcf / market_cap` when both exist and market_cap > 0.
    pub fn resolved_fcf_yield(&self) -> Option<f64> {
        if self.fcf_yield.is_some() {
            return self.fcf_yield;
        }
        match (self.fcf, self.market_cap) {
            (Some(fcf), Some(cap)) if cap > 0.0 => Some(fcf / cap),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supplied_fcf_yield_wins() {
        let snap = FundamentalSnapshot {
            fcf_yield: Some(0.07),
            fcf: Some(10.0),
            market_cap: Some(100.0),
            ..Default::default()
        };
        assert_eq!(snap.resolved_fcf_yield(), Some(0.07));
    }

    #[test]
    fn fcf_yield_derived_from_market_cap() {
        let snap = FundamentalSnapshot {
            fcf: Some(10.0),
            market_cap: Some(200.0),
            ..Default::default()
        };
        assert_eq!(snap.resolved_fcf_yield(), Some(0.05));
    }

    #[test]
    fn fcf_yield_absent_without_positive_market_cap() {
        let zero_cap = FundamentalSnapshot {
            fcf: Some(10.0),
            market_cap: Some(0.0),
            ..Default::default()
        };
        assert_eq!(zero_cap.resolved_fcf_yield(), None);

        let no_fcf = FundamentalSnapshot {
            market_cap: Some(100.0),
            ..Default::default()
        };
        assert_eq!(no_fcf.resolved_fcf_yield(), None);
    }

    #[test]
    fn missing_json_fields_deserialize_as_none() {
        let snap: FundamentalSnapshot = serde_json::from_str(r#"{"per": 12.5}"#).unwrap();
        assert_eq!(snap.per, Some(12.5));
        assert_eq!(snap.pbr, None);
        assert!(snap.price_history.is_empty());
    }
}
