//! Market data provider trait and two implementations.
//!
//! The screeners only see this trait, so a network-backed source can be
//! swapped in without touching the scoring code. Failures are carried as
//! `anyhow::Error`: each source has its own error vocabulary and the
//! screeners only log and skip.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use screener_core::{FundamentalSnapshot, PriceBar};

use crate::data_loader::{load_fundamentals_json, load_price_csv};

/// Source of per-symbol market data.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Chronological daily bars, most recent last.
    fn price_series(&self, symbol: &str) -> Result<Vec<PriceBar>>;

    /// Fundamentals with `price_history` populated from the price series
    /// when the source does not supply one.
    fn snapshot(&self, symbol: &str) -> Result<FundamentalSnapshot>;
}

fn with_history(mut snapshot: FundamentalSnapshot, bars: &[PriceBar]) -> FundamentalSnapshot {
    if snapshot.price_history.is_empty() {
        snapshot.price_history = bars.iter().map(|b| b.close).collect();
    }
    snapshot
}

/// Provider over data already in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    series: HashMap<String, Vec<PriceBar>>,
    fundamentals: HashMap<String, FundamentalSnapshot>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_series(&mut self, symbol: impl Into<String>, bars: Vec<PriceBar>) {
        self.series.insert(symbol.into(), bars);
    }

    pub fn insert_fundamentals(&mut self, symbol: impl Into<String>, snapshot: FundamentalSnapshot) {
        self.fundamentals.insert(symbol.into(), snapshot);
    }

    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self
            .series
            .keys()
            .chain(self.fundamentals.keys())
            .cloned()
            .collect();
        symbols.sort();
        symbols.dedup();
        symbols
    }
}

impl MarketDataProvider for InMemoryProvider {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn price_series(&self, symbol: &str) -> Result<Vec<PriceBar>> {
        self.series
            .get(symbol)
            .cloned()
            .ok_or_else(|| anyhow!("no price series for '{symbol}'"))
    }

    fn snapshot(&self, symbol: &str) -> Result<FundamentalSnapshot> {
        let snapshot = self
            .fundamentals
            .get(symbol)
            .cloned()
            .ok_or_else(|| anyhow!("no fundamentals for '{symbol}'"))?;
        let bars = self.series.get(symbol).map(Vec::as_slice).unwrap_or_default();
        Ok(with_history(snapshot, bars))
    }
}

/// Provider over a directory holding `<SYMBOL>.csv` price files and
/// `<SYMBOL>.json` fundamentals files.
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
}

impl DirectoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.root.join(format!("{symbol}.csv"))
    }

    fn json_path(&self, symbol: &str) -> PathBuf {
        self.root.join(format!("{symbol}.json"))
    }
}

impl MarketDataProvider for DirectoryProvider {
    fn name(&self) -> &str {
        "directory"
    }

    fn price_series(&self, symbol: &str) -> Result<Vec<PriceBar>> {
        load_price_csv(&self.csv_path(symbol))
            .with_context(|| format!("loading price series for '{symbol}'"))
    }

    fn snapshot(&self, symbol: &str) -> Result<FundamentalSnapshot> {
        let snapshot = load_fundamentals_json(&self.json_path(symbol))
            .with_context(|| format!("loading fundamentals for '{symbol}'"))?;
        // A missing price file only means no volatility history.
        let bars = if self.csv_path(symbol).exists() {
            self.price_series(symbol)?
        } else {
            Vec::new()
        };
        Ok(with_history(snapshot, &bars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_fills_history_from_series() {
        let mut p = InMemoryProvider::new();
        p.insert_series("AAA", vec![PriceBar::new(1.0, 0.0), PriceBar::new(2.0, 0.0)]);
        p.insert_fundamentals("AAA", FundamentalSnapshot::default());
        assert_eq!(p.snapshot("AAA").unwrap().price_history, vec![1.0, 2.0]);
    }

    #[test]
    fn supplied_history_is_kept() {
        let mut p = InMemoryProvider::new();
        p.insert_series("AAA", vec![PriceBar::new(1.0, 0.0)]);
        p.insert_fundamentals(
            "AAA",
            FundamentalSnapshot {
                price_history: vec![5.0, 6.0],
                ..Default::default()
            },
        );
        assert_eq!(p.snapshot("AAA").unwrap().price_history, vec![5.0, 6.0]);
    }

    #[test]
    fn unknown_symbol_is_error() {
        let p = InMemoryProvider::new();
        assert!(p.price_series("ZZZ").is_err());
        assert!(p.snapshot("ZZZ").is_err());
    }

    #[test]
    fn symbols_union_sorted() {
        let mut p = InMemoryProvider::new();
        p.insert_series("BBB", Vec::new());
        p.insert_fundamentals("AAA", FundamentalSnapshot::default());
        p.insert_fundamentals("BBB", FundamentalSnapshot::default());
        assert_eq!(p.symbols(), vec!["AAA".to_string(), "BBB".to_string()]);
    }

    #[test]
    fn directory_reads_both_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("XYZ.csv"),
            "date,close,volume\n2024-01-03,11.0,5\n2024-01-02,10.0,4\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("XYZ.json"), r#"{"per": 8.0}"#).unwrap();

        let p = DirectoryProvider::new(dir.path());
        let snap = p.snapshot("XYZ").unwrap();
        assert_eq!(snap.per, Some(8.0));
        assert_eq!(snap.price_history, vec![10.0, 11.0]);
    }

    #[test]
    fn directory_without_prices_has_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("XYZ.json"), "{}").unwrap();
        let p = DirectoryProvider::new(dir.path());
        assert!(p.snapshot("XYZ").unwrap().price_history.is_empty());
        assert!(p.price_series("XYZ").is_err());
    }
}
