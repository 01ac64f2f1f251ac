//! Screener Runner: the caller side of the screening engine.
//!
//! This crate builds on `screener-core` to provide:
//! - A market data provider trait with in-memory and directory-backed sources
//! - CSV price and JSON fundamentals loaders
//! - Screening configuration with a reproducible config hash
//! - Universe screens that apply framework overrides, score per symbol in
//!   parallel, and rank the survivors

pub mod config;
pub mod data_loader;
pub mod provider;
pub mod screen;

pub use config::{ConfigError, ScreenConfig};
pub use data_loader::{load_fundamentals_json, load_price_csv, parse_price_csv, LoadError};
pub use provider::{DirectoryProvider, InMemoryProvider, MarketDataProvider};
pub use screen::{
    apply_framework_overrides, PullbackCandidate, PullbackScreener, ScreenReport, SharpeCandidate,
    SharpeScreener,
};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn providers_are_send_sync() {
        assert_send::<InMemoryProvider>();
        assert_sync::<InMemoryProvider>();
        assert_send::<DirectoryProvider>();
        assert_sync::<DirectoryProvider>();
    }

    #[test]
    fn reports_are_send_sync() {
        assert_send::<ScreenReport<SharpeCandidate>>();
        assert_sync::<ScreenReport<SharpeCandidate>>();
        assert_send::<ScreenReport<PullbackCandidate>>();
        assert_sync::<ScreenReport<PullbackCandidate>>();
    }
}
