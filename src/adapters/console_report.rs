//! Console report rendering for analysis and backtest results.

use crate::domain::error::SignalError;
use crate::domain::signal::ConsensusSignal;
use crate::domain::simulator::BacktestResult;

fn fmt_level(level: Option<f64>) -> String {
    match level {
        Some(value) => format!("{value:.2}"),
        None => "-".to_string(),
    }
}

pub fn render_signals(ticker: &str, signals: &[ConsensusSignal]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Signals for {ticker}\n"));
    if signals.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }
    for sig in signals {
        out.push_str(&format!(
            "  {} {:<4} @ {:.2}  stop {}  target {}  [{}]\n",
            sig.date,
            sig.signal.to_string(),
            sig.price,
            fmt_level(sig.stop_loss),
            fmt_level(sig.target),
            sig.reasons.join(", "),
        ));
    }
    out
}

pub fn render_backtest(result: &BacktestResult) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Backtest {}  {} to {}\n",
        result.ticker, result.start_date, result.end_date
    ));
    out.push_str(&format!("  total return   {:>8.2}%\n", result.total_return_pct));
    out.push_str(&format!("  max drawdown   {:>8.2}%\n", result.max_drawdown_pct));
    out.push_str(&format!("  trades         {:>8}\n", result.trade_count));
    out.push_str(&format!("  win rate       {:>8.2}%\n", result.win_rate_pct));
    out.push_str(&format!("  stop-loss hits {:>8}\n", result.stop_loss_hits));
    out.push_str(&format!("  target hits    {:>8}\n", result.target_hits));
    out
}

pub fn render_json<T: serde::Serialize>(value: &T) -> Result<String, SignalError> {
    serde_json::to_string_pretty(value).map_err(|e| SignalError::Io(std::io::Error::other(e)))
}
