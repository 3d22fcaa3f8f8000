//! HTTP request handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::task;

use crate::cli;
use crate::domain::bar::{ensure_min_history, Bar};
use crate::domain::config::SignalConfig;
use crate::domain::indicator::{adx, atr, bollinger, macd, rsi, sma, stochastic};
use crate::domain::signal::{self, ConsensusSignal};
use crate::ports::data_port::FetchPeriod;

use super::{ApiError, AppState};

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn round4_series(series: Vec<Option<f64>>) -> Vec<Option<f64>> {
    series.into_iter().map(|v| v.map(round4)).collect()
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    pub ticker: String,
    pub period: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IndicatorSeries {
    pub ma_fast: Vec<Option<f64>>,
    pub ma_slow: Vec<Option<f64>>,
    pub ma_long: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub bb_upper: Vec<Option<f64>>,
    pub bb_middle: Vec<Option<f64>>,
    pub bb_lower: Vec<Option<f64>>,
    pub stoch_k: Vec<Option<f64>>,
    pub stoch_d: Vec<Option<f64>>,
    pub atr: Vec<Option<f64>>,
    pub adx: Vec<Option<f64>>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub ticker: String,
    pub bars: Vec<Bar>,
    pub indicators: IndicatorSeries,
    pub signals: Vec<ConsensusSignal>,
}

fn compute_series(bars: &[Bar], config: &SignalConfig) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let macd_values = macd::macd_series(
        &closes,
        config.macd_fast,
        config.macd_slow,
        config.macd_signal,
    );
    let bands = bollinger::bands(&closes, config.bb_period, config.bb_std);
    let stoch = stochastic::stochastic_series(bars, config.stoch_k, config.stoch_d);

    IndicatorSeries {
        ma_fast: round4_series(sma(&closes, config.ma_fast)),
        ma_slow: round4_series(sma(&closes, config.ma_slow)),
        ma_long: round4_series(sma(&closes, config.ma_long)),
        rsi: round4_series(rsi::rsi_series(&closes, config.rsi_period)),
        macd: macd_values.line.iter().map(|v| Some(round4(*v))).collect(),
        macd_signal: macd_values.signal.iter().map(|v| Some(round4(*v))).collect(),
        bb_upper: round4_series(bands.upper),
        bb_middle: round4_series(bands.middle),
        bb_lower: round4_series(bands.lower),
        stoch_k: round4_series(stoch.k),
        stoch_d: round4_series(stoch.d),
        atr: round4_series(atr::atr_series(bars, config.atr_period)),
        adx: round4_series(adx::adx_series(bars, config.adx_period)),
    }
}

pub async fn analyze(
    State(state): State<AppState>,
    Query(query): Query<AnalyzeQuery>,
) -> Result<Response, ApiError> {
    let period: FetchPeriod = query
        .period
        .as_deref()
        .unwrap_or("6mo")
        .parse()
        .map_err(|e: String| ApiError::bad_request(e))?;
    let ticker = query.ticker.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(ApiError::bad_request("ticker is required"));
    }

    let data_port = state.data_port.clone();
    let config = state.signal_config.clone();
    let response = task::spawn_blocking(move || -> Result<AnalyzeResponse, ApiError> {
        let bars = data_port.fetch_daily(&ticker, period)?;
        ensure_min_history(&ticker, &bars, config.min_history)?;
        let indicators = compute_series(&bars, &config);
        let signals = signal::generate(&ticker, &bars, &config);
        Ok(AnalyzeResponse {
            ticker,
            bars,
            indicators,
            signals,
        })
    })
    .await
    .map_err(|e| ApiError::internal(e.to_string()))??;

    Ok(Json(response).into_response())
}

#[derive(Debug, Deserialize)]
pub struct BacktestQuery {
    pub ticker: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

pub async fn backtest(
    State(state): State<AppState>,
    Query(query): Query<BacktestQuery>,
) -> Result<Response, ApiError> {
    let ticker = query.ticker.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(ApiError::bad_request("ticker is required"));
    }
    let mut bt_config = (*state.backtest_config).clone();
    if let Some(start) = query.start {
        bt_config.start_date = start;
    }
    if let Some(end) = query.end {
        bt_config.end_date = end;
    }
    if bt_config.start_date > bt_config.end_date {
        return Err(ApiError::bad_request("start date is after end date"));
    }

    let data_port = state.data_port.clone();
    let signal_config = state.signal_config.clone();
    let result = task::spawn_blocking(move || {
        cli::backtest_ticker(data_port.as_ref(), &ticker, &signal_config, &bt_config)
    })
    .await
    .map_err(|e| ApiError::internal(e.to_string()))?
    .map_err(ApiError::from)?;

    Ok(Json(result).into_response())
}

pub async fn watchlist_show(State(state): State<AppState>) -> Result<Response, ApiError> {
    let watchlist = state.watchlist.clone();
    let tickers = task::spawn_blocking(move || watchlist.load())
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .map_err(ApiError::from)?;
    Ok(Json(json!({ "tickers": tickers })).into_response())
}

#[derive(Debug, Deserialize)]
pub struct WatchlistBody {
    pub ticker: String,
}

pub async fn watchlist_add(
    State(state): State<AppState>,
    Json(body): Json<WatchlistBody>,
) -> Result<Response, ApiError> {
    let watchlist = state.watchlist.clone();
    let ticker = body.ticker;
    let added = ticker.trim().to_uppercase();
    task::spawn_blocking(move || watchlist.add(&ticker))
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .map_err(ApiError::from)?;
    Ok((StatusCode::CREATED, Json(json!({ "ticker": added }))).into_response())
}

pub async fn watchlist_remove(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Response, ApiError> {
    let watchlist = state.watchlist.clone();
    task::spawn_blocking(move || watchlist.remove(&ticker))
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .map_err(ApiError::from)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
