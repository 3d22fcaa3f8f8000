//! Local CSV data adapter.
//!
//! Reads `{TICKER}.csv` files from a base directory. Useful for offline
//! analysis and for replaying downloaded history without hitting the
//! network.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::domain::bar::Bar;
use crate::domain::error::SignalError;
use crate::ports::data_port::{DataPort, FetchPeriod};

pub struct CsvAdapter {
    base_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Volume")]
    volume: i64,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker.to_uppercase()))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_daily(&self, ticker: &str, period: FetchPeriod) -> Result<Vec<Bar>, SignalError> {
        let path = self.csv_path(ticker);
        let mut rdr = csv::Reader::from_path(&path).map_err(|e| SignalError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: format!("cannot open {}: {}", path.display(), e),
        })?;

        let mut bars = Vec::new();
        for row in rdr.deserialize::<CsvRow>() {
            let row = row.map_err(|e| SignalError::DataUnavailable {
                ticker: ticker.to_string(),
                reason: format!("malformed row in {}: {}", path.display(), e),
            })?;
            bars.push(Bar {
                date: row.date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }
        bars.sort_by_key(|b| b.date);

        // the file may hold more history than asked for
        if let Some(last) = bars.last() {
            let cutoff = last.date - chrono::Duration::days(period.days());
            bars.retain(|b| b.date >= cutoff);
        }

        debug!(ticker, rows = bars.len(), path = %path.display(), "loaded csv history");
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, content: &str) {
        let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
        write!(file, "{}", content).unwrap();
    }

    fn sample_csv() -> &'static str {
        "date,open,high,low,close,volume\n\
         2024-03-01,100.0,105.0,99.0,104.0,50000\n\
         2024-01-02,90.0,95.0,89.0,94.0,40000\n\
         2024-02-01,95.0,100.0,94.0,99.0,45000\n"
    }

    #[test]
    fn loads_and_sorts_rows() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "TEST.csv", sample_csv());
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let bars = adapter.fetch_daily("TEST", FetchPeriod::SixMonths).unwrap();
        assert_eq!(bars.len(), 3);
        assert!(bars[0].date < bars[1].date && bars[1].date < bars[2].date);
        assert_eq!(bars[2].close, 104.0);
    }

    #[test]
    fn ticker_is_uppercased_for_lookup() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "TEST.csv", sample_csv());
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        assert!(adapter.fetch_daily("test", FetchPeriod::SixMonths).is_ok());
    }

    #[test]
    fn period_trims_old_history() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "TEST.csv", sample_csv());
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let bars = adapter.fetch_daily("TEST", FetchPeriod::OneMonth).unwrap();
        // only rows within 31 days of the newest survive
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 99.0);
    }

    #[test]
    fn missing_file_is_data_unavailable() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let err = adapter
            .fetch_daily("NOPE", FetchPeriod::SixMonths)
            .unwrap_err();
        assert!(matches!(err, SignalError::DataUnavailable { .. }));
    }

    #[test]
    fn malformed_row_is_data_unavailable() {
        let dir = TempDir::new().unwrap();
        write_csv(
            &dir,
            "BAD.csv",
            "date,open,high,low,close,volume\n2024-01-02,not_a_number,95.0,89.0,94.0,40000\n",
        );
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let err = adapter
            .fetch_daily("BAD", FetchPeriod::SixMonths)
            .unwrap_err();
        assert!(matches!(err, SignalError::DataUnavailable { .. }));
    }
}
