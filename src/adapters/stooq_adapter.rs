//! Stooq market data adapter.
//!
//! Downloads daily bars from the Stooq CSV endpoint with a bounded retry
//! loop. Every failure mode surfaces as [`SignalError::DataUnavailable`]
//! so callers treat a dead network and an unknown ticker the same way.

use std::io::Read;
use std::thread;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::bar::Bar;
use crate::domain::error::SignalError;
use crate::ports::data_port::{DataPort, FetchPeriod};

const STOOQ_BASE_URL: &str = "https://stooq.com/q/d/l/";
const RETRY_DELAY: Duration = Duration::from_secs(1);

pub struct StooqAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
    max_retries: u32,
}

#[derive(Debug, Deserialize)]
struct StooqRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume", default)]
    volume: i64,
}

impl StooqAdapter {
    pub fn new(max_retries: u32) -> Self {
        Self::with_base_url(STOOQ_BASE_URL.to_string(), max_retries)
    }

    /// Point the adapter at a different endpoint, e.g. a local test server.
    pub fn with_base_url(base_url: String, max_retries: u32) -> Self {
        Self {
            client: reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .unwrap_or_else(|_| reqwest::blocking::Client::new()),
            base_url,
            max_retries,
        }
    }

    fn fetch_csv(&self, ticker: &str, period: FetchPeriod) -> Result<String, String> {
        let end = Local::now().date_naive();
        let start = end - chrono::Duration::days(period.days());
        let url = format!(
            "{}?s={}&d1={}&d2={}&i=d",
            self.base_url,
            ticker.to_lowercase(),
            start.format("%Y%m%d"),
            end.format("%Y%m%d"),
        );

        let response = self.client.get(&url).send().map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("http status {}", response.status()));
        }
        let mut body = String::new();
        response
            .take(8 * 1024 * 1024)
            .read_to_string(&mut body)
            .map_err(|e| e.to_string())?;
        Ok(body)
    }

    fn parse_csv(ticker: &str, body: &str) -> Result<Vec<Bar>, SignalError> {
        // an unknown ticker comes back as a one-line "No data" body
        if !body.starts_with("Date,") {
            return Err(SignalError::DataUnavailable {
                ticker: ticker.to_string(),
                reason: "no data in response".to_string(),
            });
        }

        let mut rdr = csv::Reader::from_reader(body.as_bytes());
        let mut bars = Vec::new();
        for row in rdr.deserialize::<StooqRow>() {
            let row = row.map_err(|e| SignalError::DataUnavailable {
                ticker: ticker.to_string(),
                reason: format!("malformed response row: {e}"),
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
        Ok(bars)
    }
}

impl DataPort for StooqAdapter {
    fn fetch_daily(&self, ticker: &str, period: FetchPeriod) -> Result<Vec<Bar>, SignalError> {
        let mut last_error = String::new();
        for attempt in 1..=self.max_retries {
            match self.fetch_csv(ticker, period) {
                Ok(body) => {
                    let bars = Self::parse_csv(ticker, &body)?;
                    debug!(ticker, rows = bars.len(), %period, "fetched history");
                    return Ok(bars);
                }
                Err(reason) => {
                    warn!(ticker, attempt, max = self.max_retries, %reason, "fetch failed");
                    last_error = reason;
                    if attempt < self.max_retries {
                        thread::sleep(RETRY_DELAY);
                    }
                }
            }
        }
        Err(SignalError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: format!("{} attempts failed, last error: {}", self.max_retries, last_error),
        })
    }
}
