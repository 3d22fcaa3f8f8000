//! Moving-average crossover vote.
//!
//! Golden cross: the fast MA closes at or above the slow MA after being
//! below it the previous day. Dead cross mirrored.

use super::sma;
use crate::domain::signal::Vote;

/// Per-day crossover votes for `fast`/`slow` SMA windows over closes.
pub fn crossover_votes(closes: &[f64], fast: usize, slow: usize) -> Vec<Vote> {
    let fast_ma = sma(closes, fast);
    let slow_ma = sma(closes, slow);

    let diff_at = |i: usize| -> Option<f64> { Some(fast_ma[i]? - slow_ma[i]?) };

    let mut votes = vec![Vote::None; closes.len()];
    for i in 1..closes.len() {
        let (Some(prev), Some(curr)) = (diff_at(i - 1), diff_at(i)) else {
            continue;
        };
        if prev < 0.0 && curr >= 0.0 {
            votes[i] = Vote::Buy;
        } else if prev > 0.0 && curr <= 0.0 {
            votes[i] = Vote::Sell;
        }
    }
    votes
}
