//! Consensus signal generation.
//!
//! Five indicators vote independently per day; a day clears the consensus
//! threshold when the vote sum reaches `+threshold` (BUY) or `-threshold`
//! (SELL). The trend and volume gates can suppress a day entirely before
//! any votes are counted.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use super::bar::Bar;
use super::config::SignalConfig;
use super::indicator_helpers::{compute_day_votes, DayVotes};
use super::risk;

/// A single indicator's discrete directional opinion for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Vote {
    Buy,
    Sell,
    #[default]
    None,
}

impl Vote {
    pub fn score(self) -> i32 {
        match self {
            Vote::Buy => 1,
            Vote::Sell => -1,
            Vote::None => 0,
        }
    }
}

/// Canonical indicator order; also the order reasons are listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorKind {
    MaCross,
    RsiBand,
    MacdCross,
    BollingerTouch,
    StochCross,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 5] = [
        IndicatorKind::MaCross,
        IndicatorKind::RsiBand,
        IndicatorKind::MacdCross,
        IndicatorKind::BollingerTouch,
        IndicatorKind::StochCross,
    ];

    /// Human-readable label for a non-zero vote.
    pub fn label(self, vote: Vote) -> Option<&'static str> {
        match (self, vote) {
            (IndicatorKind::MaCross, Vote::Buy) => Some("MA golden cross"),
            (IndicatorKind::MaCross, Vote::Sell) => Some("MA dead cross"),
            (IndicatorKind::RsiBand, Vote::Buy) => Some("RSI oversold"),
            (IndicatorKind::RsiBand, Vote::Sell) => Some("RSI overbought"),
            (IndicatorKind::MacdCross, Vote::Buy) => Some("MACD golden cross"),
            (IndicatorKind::MacdCross, Vote::Sell) => Some("MACD dead cross"),
            (IndicatorKind::BollingerTouch, Vote::Buy) => Some("BB lower band touch"),
            (IndicatorKind::BollingerTouch, Vote::Sell) => Some("BB upper band touch"),
            (IndicatorKind::StochCross, Vote::Buy) => Some("Stochastic golden cross"),
            (IndicatorKind::StochCross, Vote::Sell) => Some("Stochastic dead cross"),
            (_, Vote::None) => None,
        }
    }
}

/// Fallback reason when a threshold is met with no individual labels.
const COMPOSITE_REASON: &str = "composite signal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalType {
    Buy,
    Sell,
}

impl std::fmt::Display for SignalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalType::Buy => write!(f, "BUY"),
            SignalType::Sell => write!(f, "SELL"),
        }
    }
}

/// One emitted trade decision. Immutable once created; at most one per day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsensusSignal {
    pub ticker: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub signal: SignalType,
    pub reasons: Vec<String>,
    pub price: f64,
    pub stop_loss: Option<f64>,
    pub target: Option<f64>,
}

/// Turn per-day votes and gates into the ordered signal list.
///
/// Days failing either gate are skipped before scoring. Risk levels come
/// from the day's ATR when available; a day without ATR emits a signal
/// without stop/target and the simulator trusts it as-is.
pub fn aggregate(ticker: &str, days: &[DayVotes], config: &SignalConfig) -> Vec<ConsensusSignal> {
    let mut signals = Vec::new();

    for day in days {
        if !day.trending || !day.volume_confirmed {
            continue;
        }

        let score: i32 = day.votes.iter().map(|v| v.score()).sum();
        let signal = if score >= config.consensus_threshold {
            SignalType::Buy
        } else if score <= -config.consensus_threshold {
            SignalType::Sell
        } else {
            continue;
        };

        let mut reasons: Vec<String> = IndicatorKind::ALL
            .iter()
            .zip(day.votes.iter())
            .filter_map(|(kind, vote)| kind.label(*vote))
            .map(str::to_string)
            .collect();
        if reasons.is_empty() {
            reasons.push(COMPOSITE_REASON.to_string());
        }

        let (stop_loss, target) = match day.atr {
            Some(atr) => {
                let (stop, target) = risk::stop_and_target(
                    day.close,
                    atr,
                    signal,
                    config.stop_multiplier,
                    config.target_multiplier,
                );
                (Some(stop), Some(target))
            }
            None => (None, None),
        };

        signals.push(ConsensusSignal {
            ticker: ticker.to_string(),
            date: day.date,
            signal,
            reasons,
            price: day.close,
            stop_loss,
            target,
        });
    }

    signals
}

/// Full per-ticker signal pipeline: indicator votes, gates, consensus.
///
/// An empty result is normal; callers check minimum history at the
/// boundary before invoking this.
pub fn generate(ticker: &str, bars: &[Bar], config: &SignalConfig) -> Vec<ConsensusSignal> {
    let days = compute_day_votes(bars, config);
    if days.is_empty() {
        warn!(ticker, "no valid rows after indicator warm-up");
        return Vec::new();
    }
    aggregate(ticker, &days, config)
}
