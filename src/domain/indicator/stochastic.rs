//! Stochastic oscillator crossover vote.

use super::{rolling_max, rolling_min};
use crate::domain::bar::Bar;
use crate::domain::signal::Vote;

/// %K and smoothed %D; `None` during warm-up or when the lookback range
/// is degenerate (highest high equals lowest low).
#[derive(Debug, Clone)]
pub struct StochSeries {
    pub k: Vec<Option<f64>>,
    pub d: Vec<Option<f64>>,
}

pub fn stochastic_series(bars: &[Bar], k_period: usize, d_period: usize) -> StochSeries {
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lowest = rolling_min(&lows, k_period);
    let highest = rolling_max(&highs, k_period);

    let k: Vec<Option<f64>> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let (low, high) = (lowest[i]?, highest[i]?);
            let range = high - low;
            if range > 0.0 {
                Some((bar.close - low) / range * 100.0)
            } else {
                None
            }
        })
        .collect();

    // %D is a d_period SMA of %K; undefined whenever any %K in its window is.
    let mut d = vec![None; k.len()];
    if d_period > 0 && k.len() >= d_period {
        for i in (d_period - 1)..k.len() {
            let window = &k[i + 1 - d_period..=i];
            if window.iter().all(Option::is_some) {
                let sum: f64 = window.iter().flatten().sum();
                d[i] = Some(sum / d_period as f64);
            }
        }
    }

    StochSeries { k, d }
}

/// %K crossing %D upward below the overbought band -> BUY; crossing
/// downward above the oversold band -> SELL.
pub fn crossover_votes(series: &StochSeries, overbought: f64, oversold: f64) -> Vec<Vote> {
    let mut votes = vec![Vote::None; series.k.len()];
    for i in 1..series.k.len() {
        let (Some(prev_k), Some(prev_d), Some(k), Some(d)) = (
            series.k[i - 1],
            series.d[i - 1],
            series.k[i],
            series.d[i],
        ) else {
            continue;
        };
        if prev_k < prev_d && k >= d && k < overbought {
            votes[i] = Vote::Buy;
        } else if prev_k > prev_d && k <= d && k > oversold {
            votes[i] = Vote::Sell;
        }
    }
    votes
}
