//! Daily price data access port.

use std::fmt;
use std::str::FromStr;

use crate::domain::bar::Bar;
use crate::domain::error::SignalError;

/// How far back to fetch daily bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPeriod {
    OneMonth,
    ThreeMonths,
    #[default]
    SixMonths,
    OneYear,
    TwoYears,
}

impl FetchPeriod {
    /// Calendar days covered by the period.
    pub fn days(self) -> i64 {
        match self {
            FetchPeriod::OneMonth => 31,
            FetchPeriod::ThreeMonths => 92,
            FetchPeriod::SixMonths => 183,
            FetchPeriod::OneYear => 366,
            FetchPeriod::TwoYears => 731,
        }
    }
}

impl fmt::Display for FetchPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FetchPeriod::OneMonth => "1mo",
            FetchPeriod::ThreeMonths => "3mo",
            FetchPeriod::SixMonths => "6mo",
            FetchPeriod::OneYear => "1y",
            FetchPeriod::TwoYears => "2y",
        };
        write!(f, "{name}")
    }
}

impl FromStr for FetchPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1mo" => Ok(FetchPeriod::OneMonth),
            "3mo" => Ok(FetchPeriod::ThreeMonths),
            "6mo" => Ok(FetchPeriod::SixMonths),
            "1y" => Ok(FetchPeriod::OneYear),
            "2y" => Ok(FetchPeriod::TwoYears),
            other => Err(format!(
                "unknown period '{other}' (expected 1mo, 3mo, 6mo, 1y or 2y)"
            )),
        }
    }
}

pub trait DataPort {
    /// Fetch daily bars for a ticker, oldest first.
    fn fetch_daily(&self, ticker: &str, period: FetchPeriod) -> Result<Vec<Bar>, SignalError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_parses_round_trip() {
        for period in [
            FetchPeriod::OneMonth,
            FetchPeriod::ThreeMonths,
            FetchPeriod::SixMonths,
            FetchPeriod::OneYear,
            FetchPeriod::TwoYears,
        ] {
            assert_eq!(period.to_string().parse::<FetchPeriod>(), Ok(period));
        }
    }

    #[test]
    fn unknown_period_is_rejected() {
        assert!("5mo".parse::<FetchPeriod>().is_err());
    }

    #[test]
    fn longer_periods_cover_more_days() {
        assert!(FetchPeriod::OneMonth.days() < FetchPeriod::TwoYears.days());
    }
}
