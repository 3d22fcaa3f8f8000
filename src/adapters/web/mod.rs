//! Web server adapter.
//!
//! JSON API over the same pipeline the CLI uses. Port calls are
//! synchronous, so handlers run them on the blocking thread pool.

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::{AnalyzeResponse, IndicatorSeries, WatchlistBody};

use axum::{
    routing::{delete, get},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::adapters::watchlist_file::WatchlistFile;
use crate::domain::config::{BacktestConfig, SignalConfig};
use crate::ports::data_port::DataPort;

#[derive(Clone)]
pub struct AppState {
    pub data_port: Arc<dyn DataPort + Send + Sync>,
    pub watchlist: Arc<WatchlistFile>,
    pub signal_config: Arc<SignalConfig>,
    pub backtest_config: Arc<BacktestConfig>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/analyze", get(handlers::analyze))
        .route("/api/backtest", get(handlers::backtest))
        .route(
            "/api/watchlist",
            get(handlers::watchlist_show).post(handlers::watchlist_add),
        )
        .route("/api/watchlist/{ticker}", delete(handlers::watchlist_remove))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
