//! Daily OHLCV bar representation.

use chrono::NaiveDate;
use serde::Serialize;

use super::error::SignalError;

/// One trading day. Bars are immutable, chronologically ordered and carry
/// unique dates within a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl Bar {
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// Boundary check before any signal generation: the bar history must cover
/// at least the indicator warm-up window.
pub fn ensure_min_history(ticker: &str, bars: &[Bar], minimum: usize) -> Result<(), SignalError> {
    if bars.len() < minimum {
        return Err(SignalError::InsufficientHistory {
            ticker: ticker.to_string(),
            rows: bars.len(),
            minimum,
        });
    }
    Ok(())
}

/// Restrict a chronological bar series to `[start, end]` inclusive.
pub fn filter_window(bars: &[Bar], start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
    bars.iter()
        .filter(|b| b.date >= start && b.date <= end)
        .cloned()
        .collect()
}
