//! ATR (average true range) — the volatility measure behind stop/target
//! distances.

use super::sma;
use crate::domain::bar::Bar;

/// Rolling mean of the true range. The first bar's true range falls back to
/// its high-low span (no previous close).
pub fn atr_series(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    let tr: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect();
    sma(&tr, period)
}
