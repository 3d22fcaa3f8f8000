//! ADX trend-strength filter and volume confirmation.
//!
//! Both gates fail open: days where the underlying series is still
//! undefined are treated as passing.

use super::sma;
use crate::domain::bar::Bar;

/// EWM-smoothed ADX. `None` until the first defined DX value has been
/// folded in (both directional indices zero keeps DX undefined).
pub fn adx_series(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    if bars.is_empty() {
        return Vec::new();
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let ewm_step = |state: f64, value: f64| alpha * value + (1.0 - alpha) * state;

    let mut tr_ewm = bars[0].high - bars[0].low;
    let mut plus_ewm = 0.0;
    let mut minus_ewm = 0.0;
    let mut adx: Option<f64> = None;
    let mut out = Vec::with_capacity(bars.len());
    out.push(None);

    for i in 1..bars.len() {
        let up = bars[i].high - bars[i - 1].high;
        let down = bars[i - 1].low - bars[i].low;
        let plus_dm = if up > down && up > 0.0 { up } else { 0.0 };
        let minus_dm = if down > plus_dm && down > 0.0 { down } else { 0.0 };

        tr_ewm = ewm_step(tr_ewm, bars[i].true_range(bars[i - 1].close));
        plus_ewm = ewm_step(plus_ewm, plus_dm);
        minus_ewm = ewm_step(minus_ewm, minus_dm);

        if tr_ewm > 0.0 {
            let plus_di = 100.0 * plus_ewm / tr_ewm;
            let minus_di = 100.0 * minus_ewm / tr_ewm;
            let di_sum = plus_di + minus_di;
            if di_sum > 0.0 {
                let dx = (plus_di - minus_di).abs() / di_sum * 100.0;
                adx = Some(match adx {
                    Some(prev) => ewm_step(prev, dx),
                    None => dx,
                });
            }
        }
        out.push(adx);
    }
    out
}

/// Trend gate: ADX at or above `threshold`, open while ADX is undefined.
pub fn trending_gate(adx: &[Option<f64>], threshold: f64) -> Vec<bool> {
    adx.iter()
        .map(|v| v.map_or(true, |value| value >= threshold))
        .collect()
}

/// Volume gate: volume at or above its moving average, open during the
/// average's warm-up.
pub fn volume_gate(bars: &[Bar], period: usize) -> Vec<bool> {
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();
    let volume_ma = sma(&volumes, period);
    volumes
        .iter()
        .zip(volume_ma.iter())
        .map(|(v, ma)| ma.map_or(true, |avg| *v >= avg))
        .collect()
}
