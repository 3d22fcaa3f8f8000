//! Stop-loss and target price derivation.

use super::signal::SignalType;

/// Round to 2 decimal places; all published price/percentage fields use this.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Derive (stop_loss, target) from an entry price and a volatility measure
/// (ATR-like, caller guarantees non-negative).
///
/// BUY:  stop = entry - volatility * stop_mult, target = entry + volatility * target_mult
/// SELL: stop = entry + volatility * stop_mult, target = entry - volatility * target_mult
pub fn stop_and_target(
    entry_price: f64,
    volatility: f64,
    direction: SignalType,
    stop_multiplier: f64,
    target_multiplier: f64,
) -> (f64, f64) {
    let (stop, target) = match direction {
        SignalType::Buy => (
            entry_price - volatility * stop_multiplier,
            entry_price + volatility * target_multiplier,
        ),
        SignalType::Sell => (
            entry_price + volatility * stop_multiplier,
            entry_price - volatility * target_multiplier,
        ),
    };
    (round2(stop), round2(target))
}
