//! Indicator provider: aligned per-day votes and gates for the aggregator.
//!
//! A day reaches the aggregator only when every vote input is defined, so
//! the aggregator itself never sees warm-up gaps. The binding constraint is
//! the longest moving average (60 days by default).

use chrono::NaiveDate;

use super::bar::Bar;
use super::config::SignalConfig;
use super::indicator::{adx, atr, bollinger, macd, moving_average, rsi, sma, stochastic};
use super::signal::Vote;

/// Everything the aggregator needs to know about one trading day, in the
/// canonical indicator order [MA, RSI, MACD, Bollinger, Stochastic].
#[derive(Debug, Clone)]
pub struct DayVotes {
    pub date: NaiveDate,
    pub close: f64,
    pub votes: [Vote; 5],
    pub trending: bool,
    pub volume_confirmed: bool,
    /// Volatility measure for risk levels; absent when ATR is undefined.
    pub atr: Option<f64>,
}

/// Compute all indicator votes and gates, dropping warm-up days.
pub fn compute_day_votes(bars: &[Bar], config: &SignalConfig) -> Vec<DayVotes> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let ma_long = sma(&closes, config.ma_long);
    let ma_votes = moving_average::crossover_votes(&closes, config.ma_fast, config.ma_slow);

    let rsi_values = rsi::rsi_series(&closes, config.rsi_period);
    let rsi_votes = rsi::band_votes(&rsi_values, config.rsi_overbought, config.rsi_oversold);

    let macd_values = macd::macd_series(
        &closes,
        config.macd_fast,
        config.macd_slow,
        config.macd_signal,
    );
    let macd_votes = macd::crossover_votes(&macd_values);

    let bands = bollinger::bands(&closes, config.bb_period, config.bb_std);
    let bb_votes = bollinger::touch_votes(&closes, &bands);

    let stoch = stochastic::stochastic_series(bars, config.stoch_k, config.stoch_d);
    let stoch_votes =
        stochastic::crossover_votes(&stoch, config.stoch_overbought, config.stoch_oversold);

    let atr_values = atr::atr_series(bars, config.atr_period);
    let adx_values = adx::adx_series(bars, config.adx_period);
    let trending = adx::trending_gate(&adx_values, config.adx_trend_threshold);
    let volume_ok = adx::volume_gate(bars, config.volume_ma_period);

    bars.iter()
        .enumerate()
        .filter_map(|(i, bar)| {
            // all five vote inputs must be defined; ATR and gates may lag
            let defined = ma_long[i].is_some()
                && rsi_values[i].is_some()
                && bands.middle[i].is_some()
                && stoch.d[i].is_some();
            if !defined {
                return None;
            }
            Some(DayVotes {
                date: bar.date,
                close: bar.close,
                votes: [
                    ma_votes[i],
                    rsi_votes[i],
                    macd_votes[i],
                    bb_votes[i],
                    stoch_votes[i],
                ],
                trending: trending[i],
                volume_confirmed: volume_ok[i],
                atr: atr_values[i],
            })
        })
        .collect()
}
