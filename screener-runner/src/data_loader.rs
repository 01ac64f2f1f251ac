//! File loaders for price series and fundamentals.
//!
//! Price files are CSV with a header row and `date,close,volume` columns
//! (extra columns are ignored). Rows are sorted by date on load, so the
//! returned series is oldest-first regardless of file order.
//!
//! Fundamentals are a JSON object whose keys match `FundamentalSnapshot`
//! fields; missing keys are absent values.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use screener_core::{FundamentalSnapshot, PriceBar};

/// Errors from the file loaders.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed price CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid bar on {date}: close={close}, volume={volume}")]
    InvalidBar { date: NaiveDate, close: f64, volume: f64 },

    #[error("malformed fundamentals JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct PriceRow {
    date: NaiveDate,
    close: f64,
    volume: f64,
}

/// Parse a price CSV from any reader.
pub fn parse_price_csv<R: Read>(reader: R) -> Result<Vec<PriceBar>, LoadError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        let row: PriceRow = row?;
        let bar = PriceBar::new(row.close, row.volume);
        if !bar.is_sane() {
            return Err(LoadError::InvalidBar {
                date: row.date,
                close: row.close,
                volume: row.volume,
            });
        }
        rows.push((row.date, bar));
    }
    rows.sort_by_key(|(date, _)| *date);
    Ok(rows.into_iter().map(|(_, bar)| bar).collect())
}

fn open(path: &Path) -> Result<std::fs::File, LoadError> {
    std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a chronological price series from a CSV file.
pub fn load_price_csv(path: &Path) -> Result<Vec<PriceBar>, LoadError> {
    parse_price_csv(open(path)?)
}

/// Load a fundamentals snapshot from a JSON file.
pub fn load_fundamentals_json(path: &Path) -> Result<FundamentalSnapshot, LoadError> {
    Ok(serde_json::from_reader(std::io::BufReader::new(open(path)?))?)
}
