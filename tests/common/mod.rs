#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;

use stocksignal::domain::bar::Bar;
use stocksignal::domain::error::SignalError;
use stocksignal::ports::data_port::{DataPort, FetchPeriod};

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_daily(&self, ticker: &str, _period: FetchPeriod) -> Result<Vec<Bar>, SignalError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(SignalError::DataUnavailable {
                ticker: ticker.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(ticker).cloned().unwrap_or_default())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn day(i: usize) -> NaiveDate {
    date(2023, 1, 1) + chrono::Duration::days(i as i64)
}

pub fn make_bar(i: usize, close: f64) -> Bar {
    Bar {
        date: day(i),
        open: close,
        high: close + 2.0,
        low: (close - 2.0).max(0.01),
        close,
        volume: 10_000,
    }
}

/// Flat series: constant closes leave RSI and the stochastic undefined, so
/// no consensus ever forms.
pub fn flat_bars(count: usize, price: f64) -> Vec<Bar> {
    (0..count).map(|i| make_bar(i, price)).collect()
}

/// Gently oscillating series deep enough for the full indicator warm-up.
pub fn wavy_bars(count: usize) -> Vec<Bar> {
    (0..count)
        .map(|i| {
            let close = 100.0 + ((i % 7) as f64 - 3.0) * 2.0;
            let mut bar = make_bar(i, close);
            bar.volume = 10_000 + (i as i64 % 3) * 500;
            bar
        })
        .collect()
}

/// Series built from an arbitrary close path.
pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(i, close))
        .collect()
}
