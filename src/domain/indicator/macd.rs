//! MACD crossover vote.

use super::ema;
use crate::domain::signal::Vote;

/// MACD line and its signal line, defined for every day (EMA seeding).
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
}

pub fn macd_series(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let ema_fast = ema(closes, fast);
    let ema_slow = ema(closes, slow);
    let line: Vec<f64> = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .map(|(f, s)| f - s)
        .collect();
    let signal = ema(&line, signal);
    MacdSeries { line, signal }
}

/// MACD line crossing its signal line: up -> BUY, down -> SELL.
pub fn crossover_votes(series: &MacdSeries) -> Vec<Vote> {
    let mut votes = vec![Vote::None; series.line.len()];
    for i in 1..series.line.len() {
        let prev = series.line[i - 1] - series.signal[i - 1];
        let curr = series.line[i] - series.signal[i];
        if prev < 0.0 && curr >= 0.0 {
            votes[i] = Vote::Buy;
        } else if prev > 0.0 && curr <= 0.0 {
            votes[i] = Vote::Sell;
        }
    }
    votes
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn flat_prices_give_zero_macd() {
        let closes = vec![50.0; 40];
        let series = macd_series(&closes, 12, 26, 9);
        for (l, s) in series.line.iter().zip(series.signal.iter()) {
            assert_relative_eq!(*l, 0.0);
            assert_relative_eq!(*s, 0.0);
        }
    }

    #[test]
    fn rally_pushes_line_above_signal() {
        let mut closes = vec![100.0; 30];
        closes.extend((1..=10).map(|i| 100.0 + 2.0 * i as f64));
        let series = macd_series(&closes, 12, 26, 9);
        let last = closes.len() - 1;
        assert!(series.line[last] > series.signal[last]);
    }

    #[test]
    fn reversal_produces_cross_votes() {
        // downtrend then sharp recovery: exactly one golden cross after the turn
        let mut closes: Vec<f64> = (0..40).map(|i| 200.0 - i as f64).collect();
        closes.extend((0..20).map(|i| 160.0 + 4.0 * i as f64));
        let series = macd_series(&closes, 12, 26, 9);
        let votes = crossover_votes(&series);
        let buys = votes[40..].iter().filter(|&&v| v == Vote::Buy).count();
        assert_eq!(buys, 1);
    }

    #[test]
    fn flat_series_never_votes() {
        let closes = vec![75.0; 40];
        let series = macd_series(&closes, 12, 26, 9);
        let votes = crossover_votes(&series);
        assert!(votes.iter().all(|&v| v == Vote::None));
    }
}
