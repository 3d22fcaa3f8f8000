//! Plain-text watchlist storage.
//!
//! One ticker per line, `#` starts a comment. A missing file is an empty
//! watchlist, not an error.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::error::SignalError;

pub struct WatchlistFile {
    path: PathBuf,
}

impl WatchlistFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> Result<Vec<String>, SignalError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let tickers = content
            .lines()
            .map(|line| line.split('#').next().unwrap_or("").trim())
            .filter(|line| !line.is_empty())
            .map(|line| line.to_uppercase())
            .collect();
        Ok(tickers)
    }

    pub fn add(&self, ticker: &str) -> Result<(), SignalError> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(SignalError::Watchlist {
                reason: "ticker is empty".to_string(),
            });
        }
        let mut tickers = self.load()?;
        if tickers.contains(&ticker) {
            return Err(SignalError::Watchlist {
                reason: format!("{ticker} is already on the watchlist"),
            });
        }
        tickers.push(ticker.clone());
        self.save(&tickers)?;
        debug!(%ticker, "added to watchlist");
        Ok(())
    }

    pub fn remove(&self, ticker: &str) -> Result<(), SignalError> {
        let ticker = ticker.trim().to_uppercase();
        let mut tickers = self.load()?;
        let before = tickers.len();
        tickers.retain(|t| *t != ticker);
        if tickers.len() == before {
            return Err(SignalError::Watchlist {
                reason: format!("{ticker} is not on the watchlist"),
            });
        }
        self.save(&tickers)?;
        debug!(%ticker, "removed from watchlist");
        Ok(())
    }

    fn save(&self, tickers: &[String]) -> Result<(), SignalError> {
        let mut content = tickers.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        fs::write(&self.path, content)?;
        Ok(())
    }
}
