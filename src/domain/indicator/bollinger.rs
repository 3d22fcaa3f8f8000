//! Bollinger band touch vote.

use super::{rolling_std, sma};
use crate::domain::signal::Vote;

#[derive(Debug, Clone)]
pub struct Bands {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

pub fn bands(closes: &[f64], period: usize, std_mult: f64) -> Bands {
    let middle = sma(closes, period);
    let std = rolling_std(closes, period);

    let band = |sign: f64| -> Vec<Option<f64>> {
        middle
            .iter()
            .zip(std.iter())
            .map(|(m, s)| Some((*m)? + sign * std_mult * (*s)?))
            .collect()
    };

    Bands {
        upper: band(1.0),
        lower: band(-1.0),
        middle,
    }
}

/// Close at or beyond a band votes toward reversion: lower touch -> BUY,
/// upper touch -> SELL. When the bands collapse onto each other the upper
/// touch wins.
pub fn touch_votes(closes: &[f64], bands: &Bands) -> Vec<Vote> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| match (bands.upper[i], bands.lower[i]) {
            (Some(upper), _) if close >= upper => Vote::Sell,
            (_, Some(lower)) if close <= lower => Vote::Buy,
            _ => Vote::None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bands_bracket_the_mean() {
        let closes: Vec<f64> = (0..25).map(|i| 100.0 + (i % 5) as f64).collect();
        let b = bands(&closes, 20, 2.0);
        let i = 24;
        assert!(b.lower[i].unwrap() < b.middle[i].unwrap());
        assert!(b.middle[i].unwrap() < b.upper[i].unwrap());
    }

    #[test]
    fn warmup_has_no_bands() {
        let closes = vec![100.0; 10];
        let b = bands(&closes, 20, 2.0);
        assert!(b.upper.iter().all(Option::is_none));
    }

    #[test]
    fn spike_below_lower_band_votes_buy() {
        let mut closes: Vec<f64> = (0..30).map(|i| 100.0 + (i % 2) as f64).collect();
        closes[29] = 80.0;
        let b = bands(&closes, 20, 2.0);
        let votes = touch_votes(&closes, &b);
        assert_eq!(votes[29], Vote::Buy);
    }

    #[test]
    fn spike_above_upper_band_votes_sell() {
        let mut closes: Vec<f64> = (0..30).map(|i| 100.0 + (i % 2) as f64).collect();
        closes[29] = 120.0;
        let b = bands(&closes, 20, 2.0);
        let votes = touch_votes(&closes, &b);
        assert_eq!(votes[29], Vote::Sell);
    }

    #[test]
    fn collapsed_bands_prefer_sell() {
        // constant closes: std 0, upper == lower == close
        let closes = vec![100.0; 25];
        let b = bands(&closes, 20, 2.0);
        assert_relative_eq!(b.upper[24].unwrap(), b.lower[24].unwrap());
        let votes = touch_votes(&closes, &b);
        assert_eq!(votes[24], Vote::Sell);
    }
}
