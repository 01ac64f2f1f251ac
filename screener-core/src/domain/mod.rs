//! Domain types for the screener engine.

pub mod bar;
pub mod fundamentals;

pub use bar::{closes, volumes, PriceBar};
pub use fundamentals::FundamentalSnapshot;
