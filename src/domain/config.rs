//! Signal and backtest parameter objects.
//!
//! Every threshold and multiplier lives here as an explicit value object
//! passed into the pipeline, so two runs with the same inputs and the same
//! config are bit-identical.

use chrono::NaiveDate;

/// Parameters for indicator computation and consensus voting.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    /// Fast/slow windows for the MA crossover vote.
    pub ma_fast: usize,
    pub ma_slow: usize,
    /// Longest MA window; governs the warm-up cut-off.
    pub ma_long: usize,
    pub rsi_period: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bb_period: usize,
    pub bb_std: f64,
    pub stoch_k: usize,
    pub stoch_d: usize,
    pub stoch_overbought: f64,
    pub stoch_oversold: f64,
    pub atr_period: usize,
    /// Stop-loss distance in ATR multiples.
    pub stop_multiplier: f64,
    /// Target distance in ATR multiples.
    pub target_multiplier: f64,
    pub adx_period: usize,
    /// ADX below this means a ranging market; the trend gate closes.
    pub adx_trend_threshold: f64,
    pub volume_ma_period: usize,
    /// Minimum absolute vote sum for a BUY/SELL consensus.
    pub consensus_threshold: i32,
    /// Minimum bar count required before signal generation.
    pub min_history: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        SignalConfig {
            ma_fast: 5,
            ma_slow: 20,
            ma_long: 60,
            rsi_period: 14,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bb_period: 20,
            bb_std: 2.0,
            stoch_k: 14,
            stoch_d: 3,
            stoch_overbought: 80.0,
            stoch_oversold: 20.0,
            atr_period: 14,
            stop_multiplier: 1.5,
            target_multiplier: 3.0,
            adx_period: 14,
            adx_trend_threshold: 20.0,
            volume_ma_period: 20,
            consensus_threshold: 2,
            min_history: 60,
        }
    }
}

/// Parameters for one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            initial_capital: 1_000_000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds() {
        let cfg = SignalConfig::default();
        assert_eq!(cfg.consensus_threshold, 2);
        assert!((cfg.stop_multiplier - 1.5).abs() < f64::EPSILON);
        assert!((cfg.target_multiplier - 3.0).abs() < f64::EPSILON);
        assert_eq!(cfg.min_history, 60);
    }

    #[test]
    fn default_backtest_window() {
        let cfg = BacktestConfig::default();
        assert!(cfg.start_date < cfg.end_date);
        assert!((cfg.initial_capital - 1_000_000.0).abs() < f64::EPSILON);
    }
}
