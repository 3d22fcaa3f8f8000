//! End-to-end pipeline tests over a mock data port.
//!
//! Tests cover:
//! - Error taxonomy: unavailable data propagates, short history is rejected
//! - Deterministic replay: identical inputs give identical results
//! - Window handling: out-of-range windows, result date bounds
//! - Statistic bounds over arbitrary price paths (proptest)

mod common;

use common::*;
use proptest::prelude::*;

use stocksignal::cli::{analyze_ticker, backtest_ticker};
use stocksignal::domain::config::{BacktestConfig, SignalConfig};
use stocksignal::domain::error::SignalError;
use stocksignal::ports::data_port::FetchPeriod;

fn wide_window() -> BacktestConfig {
    BacktestConfig {
        start_date: date(2023, 1, 1),
        end_date: date(2024, 12, 31),
        initial_capital: 100_000.0,
    }
}

mod error_taxonomy {
    use super::*;

    #[test]
    fn fetch_failure_propagates_unchanged() {
        let port = MockDataPort::new().with_error("AAPL", "connection refused");
        let err = analyze_ticker(&port, "AAPL", FetchPeriod::SixMonths, &SignalConfig::default())
            .unwrap_err();
        match err {
            SignalError::DataUnavailable { ticker, reason } => {
                assert_eq!(ticker, "AAPL");
                assert_eq!(reason, "connection refused");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn short_history_is_rejected_before_generation() {
        let port = MockDataPort::new().with_bars("AAPL", wavy_bars(30));
        let err = analyze_ticker(&port, "AAPL", FetchPeriod::SixMonths, &SignalConfig::default())
            .unwrap_err();
        match err {
            SignalError::InsufficientHistory {
                ticker,
                rows,
                minimum,
            } => {
                assert_eq!(ticker, "AAPL");
                assert_eq!(rows, 30);
                assert_eq!(minimum, 60);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_ticker_reads_as_empty_and_fails_history_check() {
        let port = MockDataPort::new();
        let err = backtest_ticker(
            &port,
            "NOPE",
            &SignalConfig::default(),
            &wide_window(),
        )
        .unwrap_err();
        assert!(matches!(err, SignalError::InsufficientHistory { rows: 0, .. }));
    }

    #[test]
    fn ticker_is_normalized_before_lookup() {
        let port = MockDataPort::new().with_bars("AAPL", wavy_bars(120));
        assert!(
            analyze_ticker(&port, " aapl ", FetchPeriod::SixMonths, &SignalConfig::default())
                .is_ok()
        );
    }
}

mod window_handling {
    use super::*;

    #[test]
    fn window_outside_data_gives_zero_result() {
        let port = MockDataPort::new().with_bars("AAPL", wavy_bars(120));
        let window = BacktestConfig {
            start_date: date(2030, 1, 1),
            end_date: date(2030, 12, 31),
            initial_capital: 100_000.0,
        };
        let result = backtest_ticker(&port, "AAPL", &SignalConfig::default(), &window).unwrap();
        assert_eq!(result.trade_count, 0);
        assert_eq!(result.total_return_pct, 0.0);
        assert_eq!(result.max_drawdown_pct, 0.0);
        // empty window falls back to the configured dates
        assert_eq!(result.start_date, window.start_date);
        assert_eq!(result.end_date, window.end_date);
    }

    #[test]
    fn result_dates_match_the_bar_window() {
        let port = MockDataPort::new().with_bars("AAPL", wavy_bars(150));
        let window = BacktestConfig {
            start_date: day(100),
            end_date: day(130),
            initial_capital: 100_000.0,
        };
        let result = backtest_ticker(&port, "AAPL", &SignalConfig::default(), &window).unwrap();
        assert_eq!(result.start_date, day(100));
        assert_eq!(result.end_date, day(130));
    }

    #[test]
    fn signals_outside_the_window_are_excluded() {
        let port = MockDataPort::new().with_bars("AAPL", wavy_bars(150));
        let window = BacktestConfig {
            start_date: day(100),
            end_date: day(130),
            initial_capital: 100_000.0,
        };
        let result = backtest_ticker(&port, "AAPL", &SignalConfig::default(), &window).unwrap();
        for sig in &result.signals {
            assert!(sig.date >= window.start_date && sig.date <= window.end_date);
        }
    }
}

mod determinism {
    use super::*;

    #[test]
    fn analyze_twice_gives_identical_signals() {
        let port = MockDataPort::new().with_bars("AAPL", wavy_bars(200));
        let config = SignalConfig::default();
        let a = analyze_ticker(&port, "AAPL", FetchPeriod::OneYear, &config).unwrap();
        let b = analyze_ticker(&port, "AAPL", FetchPeriod::OneYear, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn backtest_twice_gives_identical_results() {
        let port = MockDataPort::new().with_bars("AAPL", wavy_bars(300));
        let config = SignalConfig::default();
        let window = wide_window();
        let a = backtest_ticker(&port, "AAPL", &config, &window).unwrap();
        let b = backtest_ticker(&port, "AAPL", &config, &window).unwrap();
        assert_eq!(a, b);
    }
}

mod injected_signals {
    use super::*;
    use stocksignal::domain::bar::Bar;
    use stocksignal::domain::signal::{ConsensusSignal, SignalType};
    use stocksignal::domain::simulator::simulate;

    fn tight_bars(count: usize) -> Vec<Bar> {
        (0..count)
            .map(|i| Bar {
                date: day(i),
                open: 100.0,
                high: 100.5,
                low: 99.5,
                close: 100.0,
                volume: 10_000,
            })
            .collect()
    }

    fn buy_at(i: usize, price: f64, stop: f64, target: f64) -> ConsensusSignal {
        ConsensusSignal {
            ticker: "SYN".to_string(),
            date: day(i),
            signal: SignalType::Buy,
            reasons: vec!["MA golden cross".to_string(), "RSI oversold".to_string()],
            price,
            stop_loss: Some(stop),
            target: Some(target),
        }
    }

    #[test]
    fn forced_stop_hit_is_one_losing_trade() {
        let mut bars = tight_bars(120);
        bars[21].low = 98.5; // below the 99.0 stop
        let signals = vec![buy_at(20, 100.0, 99.0, 101.0)];
        let result = simulate("SYN", &bars, &signals, &wide_window());
        assert_eq!(result.trade_count, 1);
        assert_eq!(result.stop_loss_hits, 1);
        assert_eq!(result.target_hits, 0);
        assert_eq!(result.win_rate_pct, 0.0);
    }

    #[test]
    fn forced_target_hit_is_one_winning_trade() {
        let mut bars = tight_bars(120);
        bars[21].high = 102.0; // above the 101.0 target
        let signals = vec![buy_at(20, 100.0, 99.0, 101.0)];
        let result = simulate("SYN", &bars, &signals, &wide_window());
        assert_eq!(result.trade_count, 1);
        assert_eq!(result.target_hits, 1);
        assert_eq!(result.stop_loss_hits, 0);
        assert_eq!(result.win_rate_pct, 100.0);
    }
}

mod statistic_bounds {
    use super::*;

    proptest! {
        #[test]
        fn stats_stay_bounded_on_arbitrary_paths(
            closes in prop::collection::vec(50.0f64..150.0, 70..180)
        ) {
            let port = MockDataPort::new().with_bars("RAND", bars_from_closes(&closes));
            let result =
                backtest_ticker(&port, "RAND", &SignalConfig::default(), &wide_window()).unwrap();

            prop_assert!(result.win_rate_pct >= 0.0 && result.win_rate_pct <= 100.0);
            prop_assert!(result.max_drawdown_pct >= 0.0 && result.max_drawdown_pct <= 100.0);
            prop_assert!(result.stop_loss_hits + result.target_hits <= result.trade_count);
            prop_assert!(result.total_return_pct >= -100.0);
        }

        #[test]
        fn every_signal_carries_reasons_and_positive_price(
            closes in prop::collection::vec(50.0f64..150.0, 70..180)
        ) {
            let port = MockDataPort::new().with_bars("RAND", bars_from_closes(&closes));
            let signals = analyze_ticker(
                &port,
                "RAND",
                FetchPeriod::TwoYears,
                &SignalConfig::default(),
            )
            .unwrap();

            for sig in &signals {
                prop_assert!(!sig.reasons.is_empty());
                prop_assert!(sig.price > 0.0);
                if let (Some(stop), Some(target)) = (sig.stop_loss, sig.target) {
                    prop_assert!(stop != target);
                }
            }
        }
    }
}
