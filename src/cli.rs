//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::console_report;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::stooq_adapter::StooqAdapter;
use crate::adapters::watchlist_file::WatchlistFile;
use crate::domain::bar::{ensure_min_history, filter_window};
use crate::domain::config::{BacktestConfig, SignalConfig};
use crate::domain::error::SignalError;
use crate::domain::signal::{self, ConsensusSignal};
use crate::domain::simulator::{self, BacktestResult};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{DataPort, FetchPeriod};

#[derive(Parser, Debug)]
#[command(name = "stocksignal", about = "Multi-indicator consensus signals and backtesting")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate consensus signals for a ticker (or the whole watchlist)
    Analyze {
        /// Ticker symbol; omit to analyze every watchlist entry
        ticker: Option<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// History depth: 1mo, 3mo, 6mo, 1y or 2y
        #[arg(short, long, default_value = "6mo")]
        period: FetchPeriod,
        /// Read {TICKER}.csv files from this directory instead of the network
        #[arg(long)]
        csv_dir: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Replay signals over a date window and report statistics
    Backtest {
        ticker: String,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        csv_dir: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Manage the watchlist
    Watchlist {
        #[command(subcommand)]
        action: WatchlistAction,
        /// Watchlist file path
        #[arg(short, long)]
        file: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum WatchlistAction {
    /// Print all watched tickers
    Show,
    /// Add a ticker
    Add { ticker: String },
    /// Remove a ticker
    Remove { ticker: String },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            ticker,
            config,
            period,
            csv_dir,
            json,
        } => run_analyze(ticker.as_deref(), config.as_ref(), period, csv_dir, json),
        Command::Backtest {
            ticker,
            start,
            end,
            config,
            csv_dir,
            json,
        } => run_backtest(&ticker, start, end, config.as_ref(), csv_dir, json),
        Command::Watchlist {
            action,
            file,
            config,
        } => run_watchlist(action, file, config.as_ref()),
        Command::Serve { config } => run_serve(config.as_ref()),
    }
}

pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ExitCode> {
    match path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            FileConfigAdapter::from_file(path).map_err(|e| {
                eprintln!("error: {e}");
                ExitCode::from(&e)
            })
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

/// Read signal tuning from the `[signals]` section, defaulting every knob.
pub fn build_signal_config(adapter: &dyn ConfigPort) -> SignalConfig {
    let d = SignalConfig::default();
    SignalConfig {
        ma_fast: adapter.get_int("signals", "ma_fast", d.ma_fast as i64) as usize,
        ma_slow: adapter.get_int("signals", "ma_slow", d.ma_slow as i64) as usize,
        ma_long: adapter.get_int("signals", "ma_long", d.ma_long as i64) as usize,
        rsi_period: adapter.get_int("signals", "rsi_period", d.rsi_period as i64) as usize,
        rsi_overbought: adapter.get_double("signals", "rsi_overbought", d.rsi_overbought),
        rsi_oversold: adapter.get_double("signals", "rsi_oversold", d.rsi_oversold),
        macd_fast: adapter.get_int("signals", "macd_fast", d.macd_fast as i64) as usize,
        macd_slow: adapter.get_int("signals", "macd_slow", d.macd_slow as i64) as usize,
        macd_signal: adapter.get_int("signals", "macd_signal", d.macd_signal as i64) as usize,
        bb_period: adapter.get_int("signals", "bb_period", d.bb_period as i64) as usize,
        bb_std: adapter.get_double("signals", "bb_std", d.bb_std),
        stoch_k: adapter.get_int("signals", "stoch_k", d.stoch_k as i64) as usize,
        stoch_d: adapter.get_int("signals", "stoch_d", d.stoch_d as i64) as usize,
        stoch_overbought: adapter.get_double("signals", "stoch_overbought", d.stoch_overbought),
        stoch_oversold: adapter.get_double("signals", "stoch_oversold", d.stoch_oversold),
        atr_period: adapter.get_int("signals", "atr_period", d.atr_period as i64) as usize,
        stop_multiplier: adapter.get_double("signals", "stop_multiplier", d.stop_multiplier),
        target_multiplier: adapter.get_double("signals", "target_multiplier", d.target_multiplier),
        adx_period: adapter.get_int("signals", "adx_period", d.adx_period as i64) as usize,
        adx_trend_threshold: adapter.get_double(
            "signals",
            "adx_trend_threshold",
            d.adx_trend_threshold,
        ),
        volume_ma_period: adapter.get_int("signals", "volume_ma_period", d.volume_ma_period as i64)
            as usize,
        consensus_threshold: adapter.get_int(
            "signals",
            "consensus_threshold",
            d.consensus_threshold as i64,
        ) as i32,
        min_history: adapter.get_int("signals", "min_history", d.min_history as i64) as usize,
    }
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, SignalError> {
    let defaults = BacktestConfig::default();
    let parse_date = |key: &str, fallback: NaiveDate| -> Result<NaiveDate, SignalError> {
        match adapter.get_string("backtest", key) {
            Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                SignalError::ConfigInvalid {
                    section: "backtest".into(),
                    key: key.into(),
                    reason: "invalid date format (expected YYYY-MM-DD)".into(),
                }
            }),
            None => Ok(fallback),
        }
    };

    Ok(BacktestConfig {
        start_date: parse_date("start_date", defaults.start_date)?,
        end_date: parse_date("end_date", defaults.end_date)?,
        initial_capital: adapter.get_double(
            "backtest",
            "initial_capital",
            defaults.initial_capital,
        ),
    })
}

/// Pick the data source: an explicit `--csv-dir` wins, then `[data] source`.
pub fn build_data_port(
    adapter: &dyn ConfigPort,
    csv_dir: Option<PathBuf>,
) -> Box<dyn DataPort + Send + Sync> {
    if let Some(dir) = csv_dir {
        return Box::new(CsvAdapter::new(dir));
    }
    match adapter.get_string("data", "source").as_deref() {
        Some("csv") => {
            let dir = adapter
                .get_string("data", "csv_dir")
                .unwrap_or_else(|| ".".to_string());
            Box::new(CsvAdapter::new(PathBuf::from(dir)))
        }
        _ => {
            let retries = adapter.get_int("data", "max_retries", 3).max(1) as u32;
            Box::new(StooqAdapter::new(retries))
        }
    }
}

fn watchlist_path(adapter: &dyn ConfigPort, file: Option<PathBuf>) -> PathBuf {
    file.unwrap_or_else(|| {
        PathBuf::from(
            adapter
                .get_string("data", "watchlist")
                .unwrap_or_else(|| "watchlist.txt".to_string()),
        )
    })
}

/// Fetch history and generate signals for one ticker.
pub fn analyze_ticker(
    data_port: &dyn DataPort,
    ticker: &str,
    period: FetchPeriod,
    config: &SignalConfig,
) -> Result<Vec<ConsensusSignal>, SignalError> {
    let ticker = ticker.trim().to_uppercase();
    let bars = data_port.fetch_daily(&ticker, period)?;
    ensure_min_history(&ticker, &bars, config.min_history)?;
    Ok(signal::generate(&ticker, &bars, config))
}

/// Fetch history, generate signals, and replay them over the window.
pub fn backtest_ticker(
    data_port: &dyn DataPort,
    ticker: &str,
    signal_config: &SignalConfig,
    bt_config: &BacktestConfig,
) -> Result<BacktestResult, SignalError> {
    let ticker = ticker.trim().to_uppercase();
    // fetch deep so the indicator warm-up sits before the window
    let bars = data_port.fetch_daily(&ticker, FetchPeriod::TwoYears)?;
    ensure_min_history(&ticker, &bars, signal_config.min_history)?;

    let signals: Vec<ConsensusSignal> = signal::generate(&ticker, &bars, signal_config)
        .into_iter()
        .filter(|s| s.date >= bt_config.start_date && s.date <= bt_config.end_date)
        .collect();
    let window = filter_window(&bars, bt_config.start_date, bt_config.end_date);
    Ok(simulator::simulate(&ticker, &window, &signals, bt_config))
}

fn run_analyze(
    ticker: Option<&str>,
    config_path: Option<&PathBuf>,
    period: FetchPeriod,
    csv_dir: Option<PathBuf>,
    json: bool,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let signal_config = build_signal_config(&adapter);
    let data_port = build_data_port(&adapter, csv_dir);

    let tickers: Vec<String> = match ticker {
        Some(t) => vec![t.to_string()],
        None => {
            let watchlist = WatchlistFile::new(watchlist_path(&adapter, None));
            match watchlist.load() {
                Ok(tickers) if tickers.is_empty() => {
                    eprintln!("error: no ticker given and the watchlist is empty");
                    return ExitCode::from(3);
                }
                Ok(tickers) => tickers,
                Err(e) => {
                    eprintln!("error: {e}");
                    return ExitCode::from(&e);
                }
            }
        }
    };

    let many = tickers.len() > 1;
    let mut all_signals = Vec::new();
    for ticker in &tickers {
        match analyze_ticker(data_port.as_ref(), ticker, period, &signal_config) {
            Ok(signals) => {
                if !json {
                    print!("{}", console_report::render_signals(ticker, &signals));
                }
                all_signals.extend(signals);
            }
            Err(e) if many => eprintln!("warning: skipping {ticker} ({e})"),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(&e);
            }
        }
    }

    if json {
        match console_report::render_json(&all_signals) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(&e);
            }
        }
    }
    ExitCode::SUCCESS
}

fn run_backtest(
    ticker: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    config_path: Option<&PathBuf>,
    csv_dir: Option<PathBuf>,
    json: bool,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let signal_config = build_signal_config(&adapter);
    let mut bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };
    if let Some(start) = start {
        bt_config.start_date = start;
    }
    if let Some(end) = end {
        bt_config.end_date = end;
    }
    if bt_config.start_date > bt_config.end_date {
        eprintln!("error: start date is after end date");
        return ExitCode::from(2);
    }

    let data_port = build_data_port(&adapter, csv_dir);
    let result = match backtest_ticker(data_port.as_ref(), ticker, &signal_config, &bt_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    if json {
        match console_report::render_json(&result) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(&e);
            }
        }
    } else {
        print!("{}", console_report::render_backtest(&result));
    }
    ExitCode::SUCCESS
}

fn run_watchlist(
    action: WatchlistAction,
    file: Option<PathBuf>,
    config_path: Option<&PathBuf>,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let watchlist = WatchlistFile::new(watchlist_path(&adapter, file));

    let outcome = match action {
        WatchlistAction::Show => match watchlist.load() {
            Ok(tickers) => {
                for ticker in tickers {
                    println!("{ticker}");
                }
                Ok(())
            }
            Err(e) => Err(e),
        },
        WatchlistAction::Add { ticker } => watchlist.add(&ticker),
        WatchlistAction::Remove { ticker } => watchlist.remove(&ticker),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

fn run_serve(config_path: Option<&PathBuf>) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{build_router, AppState};
        use std::net::SocketAddr;
        use std::sync::Arc;

        let adapter = match load_config(config_path) {
            Ok(a) => a,
            Err(code) => return code,
        };
        let signal_config = build_signal_config(&adapter);
        let bt_config = match build_backtest_config(&adapter) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(&e);
            }
        };
        let data_port: Arc<dyn DataPort + Send + Sync> =
            Arc::from(build_data_port(&adapter, None));
        let watchlist = Arc::new(WatchlistFile::new(watchlist_path(&adapter, None)));

        let addr: SocketAddr = adapter
            .get_string("web", "listen")
            .unwrap_or_else(|| "127.0.0.1:3000".to_string())
            .parse()
            .unwrap_or_else(|_| "127.0.0.1:3000".parse().unwrap());

        eprintln!("Starting web server on {addr}");

        let state = AppState {
            data_port,
            watchlist,
            signal_config: Arc::new(signal_config),
            backtest_config: Arc::new(bt_config),
        };
        let router = build_router(state);

        match tokio::runtime::Runtime::new() {
            Ok(runtime) => {
                let served = runtime.block_on(async {
                    let listener = tokio::net::TcpListener::bind(addr).await?;
                    axum::serve(listener, router).await
                });
                match served {
                    Ok(()) => ExitCode::SUCCESS,
                    Err(e) => {
                        eprintln!("error: {e}");
                        ExitCode::from(1)
                    }
                }
            }
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::from(1)
            }
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
