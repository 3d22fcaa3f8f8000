//! RSI band vote.
//!
//! Rolling-mean flavour: average gain/loss are plain `period`-day means of
//! the up/down moves (not Wilder smoothing). A window with zero losses has
//! no defined RSI and the day is excluded upstream.

use crate::domain::signal::Vote;

/// Per-day RSI values; `None` during warm-up and when the window has no
/// losing days.
pub fn rsi_series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() <= period {
        return out;
    }

    let gains: Vec<f64> = closes
        .windows(2)
        .map(|w| (w[1] - w[0]).max(0.0))
        .collect();
    let losses: Vec<f64> = closes
        .windows(2)
        .map(|w| (w[0] - w[1]).max(0.0))
        .collect();

    for i in period..closes.len() {
        let window = (i - period)..i;
        let avg_gain = gains[window.clone()].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[window].iter().sum::<f64>() / period as f64;
        if avg_loss > 0.0 {
            let rs = avg_gain / avg_loss;
            out[i] = Some(100.0 - 100.0 / (1.0 + rs));
        }
    }
    out
}

/// Oversold -> BUY, overbought -> SELL.
pub fn band_votes(rsi: &[Option<f64>], overbought: f64, oversold: f64) -> Vec<Vote> {
    rsi.iter()
        .map(|v| match v {
            Some(value) if *value > overbought => Vote::Sell,
            Some(value) if *value < oversold => Vote::Buy,
            _ => Vote::None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn warmup_is_undefined() {
        let closes: Vec<f64> = (0..14).map(|i| 100.0 + (i % 3) as f64).collect();
        let rsi = rsi_series(&closes, 14);
        assert!(rsi.iter().all(Option::is_none));
    }

    #[test]
    fn all_gains_is_undefined() {
        // zero average loss leaves RSI undefined rather than pinned at 100
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let rsi = rsi_series(&closes, 14);
        assert!(rsi.iter().all(Option::is_none));
    }

    #[test]
    fn balanced_moves_give_fifty() {
        let closes: Vec<f64> = (0..21)
            .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
            .collect();
        let rsi = rsi_series(&closes, 14);
        assert_relative_eq!(rsi[14].unwrap(), 50.0);
    }

    #[test]
    fn falling_market_reads_low() {
        let mut closes: Vec<f64> = (0..30).map(|i| 200.0 - 3.0 * i as f64).collect();
        closes[9] += 1.0; // one up day so the loss average stays defined
        let rsi = rsi_series(&closes, 14);
        let last = rsi.last().unwrap().unwrap();
        assert!(last < 30.0, "expected oversold, got {last}");
    }

    #[test]
    fn band_votes_map_extremes() {
        let rsi = [Some(75.0), Some(25.0), Some(50.0), None];
        let votes = band_votes(&rsi, 70.0, 30.0);
        assert_eq!(votes, vec![Vote::Sell, Vote::Buy, Vote::None, Vote::None]);
    }
}
