//! Bar-by-bar trade simulation.
//!
//! Two states: FLAT (cash, no position) and LONG (all cash deployed). Exit
//! conditions on a LONG bar are checked in strict priority order — stop-loss,
//! then target, then SELL signal — and exactly one fires even when several
//! are numerically true. A position still open after the last bar is closed
//! at that bar's close.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use super::config::BacktestConfig;
use super::risk::round2;
use super::signal::{ConsensusSignal, SignalType};
use super::bar::Bar;

/// Deployed capital. Exists only while the simulator is LONG.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub stop_loss: Option<f64>,
    pub target: Option<f64>,
    pub shares: f64,
}

/// Mark-to-market value of cash plus any open position, one per bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Terminal artifact of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_return_pct: f64,
    pub trade_count: usize,
    pub win_rate_pct: f64,
    pub stop_loss_hits: usize,
    pub target_hits: usize,
    pub max_drawdown_pct: f64,
    pub signals: Vec<ConsensusSignal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitReason {
    StopLoss,
    Target,
    SellSignal,
}

/// Replay signals against a chronological bar window.
///
/// `bars` is the date-filtered window; an empty window produces a
/// zero-valued result. Signals are looked up by date (at most one per day).
pub fn simulate(
    ticker: &str,
    bars: &[Bar],
    signals: &[ConsensusSignal],
    config: &BacktestConfig,
) -> BacktestResult {
    if bars.is_empty() {
        warn!(ticker, "no bars in the requested window");
        return BacktestResult {
            ticker: ticker.to_string(),
            start_date: config.start_date,
            end_date: config.end_date,
            total_return_pct: 0.0,
            trade_count: 0,
            win_rate_pct: 0.0,
            stop_loss_hits: 0,
            target_hits: 0,
            max_drawdown_pct: 0.0,
            signals: signals.to_vec(),
        };
    }

    let by_date: HashMap<NaiveDate, &ConsensusSignal> =
        signals.iter().map(|s| (s.date, s)).collect();

    let mut cash = config.initial_capital;
    let mut position: Option<Position> = None;
    let mut equity_curve: Vec<EquityPoint> = Vec::with_capacity(bars.len());
    let mut trades = 0usize;
    let mut wins = 0usize;
    let mut stop_loss_hits = 0usize;
    let mut target_hits = 0usize;

    for bar in bars {
        if let Some(pos) = position.take() {
            let exit = if let Some(stop) = pos.stop_loss.filter(|stop| bar.low <= *stop) {
                Some((stop, ExitReason::StopLoss))
            } else if let Some(target) = pos.target.filter(|target| bar.high >= *target) {
                Some((target, ExitReason::Target))
            } else {
                match by_date.get(&bar.date) {
                    Some(sig) if sig.signal == SignalType::Sell => {
                        Some((sig.price, ExitReason::SellSignal))
                    }
                    _ => None,
                }
            };

            match exit {
                Some((exit_price, reason)) => {
                    cash = pos.shares * exit_price;
                    trades += 1;
                    match reason {
                        // a stop exit is never a win, even if the stop sits above entry
                        ExitReason::StopLoss => stop_loss_hits += 1,
                        ExitReason::Target => {
                            target_hits += 1;
                            wins += 1;
                        }
                        ExitReason::SellSignal => {
                            if exit_price > pos.entry_price {
                                wins += 1;
                            }
                        }
                    }
                    debug!(ticker, date = %bar.date, price = exit_price, ?reason, "exit");
                }
                None => position = Some(pos),
            }
        } else if let Some(sig) = by_date.get(&bar.date) {
            if sig.signal == SignalType::Buy {
                position = Some(Position {
                    entry_date: bar.date,
                    entry_price: sig.price,
                    stop_loss: sig.stop_loss,
                    target: sig.target,
                    shares: cash / sig.price,
                });
                cash = 0.0;
                debug!(ticker, date = %bar.date, price = sig.price, "entry");
            }
        }

        let value = cash + position.as_ref().map_or(0.0, |p| p.shares * bar.close);
        equity_curve.push(EquityPoint {
            date: bar.date,
            value,
        });
    }

    // settle any open position at the final close
    if let Some(pos) = position.take() {
        let final_close = bars[bars.len() - 1].close;
        cash = pos.shares * final_close;
        trades += 1;
        if final_close > pos.entry_price {
            wins += 1;
        }
        debug!(ticker, price = final_close, "forced close at end of window");
    }

    let total_return_pct = if config.initial_capital > 0.0 {
        round2((cash - config.initial_capital) / config.initial_capital * 100.0)
    } else {
        0.0
    };
    let win_rate_pct = if trades > 0 {
        round2(wins as f64 / trades as f64 * 100.0)
    } else {
        0.0
    };

    BacktestResult {
        ticker: ticker.to_string(),
        start_date: bars[0].date,
        end_date: bars[bars.len() - 1].date,
        total_return_pct,
        trade_count: trades,
        win_rate_pct,
        stop_loss_hits,
        target_hits,
        max_drawdown_pct: max_drawdown_pct(&equity_curve),
        signals: signals.to_vec(),
    }
}

/// Largest percentage decline from the running equity peak, in [0, 100].
pub fn max_drawdown_pct(curve: &[EquityPoint]) -> f64 {
    if curve.is_empty() {
        return 0.0;
    }
    let mut peak = curve[0].value;
    let mut max_dd = 0.0_f64;
    for point in curve {
        if point.value > peak {
            peak = point.value;
        } else if peak > 0.0 {
            let dd = (peak - point.value) / peak * 100.0;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    round2(max_dd)
}
