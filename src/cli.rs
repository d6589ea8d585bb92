//! CLI definition and dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvCandleAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_candle_adapter::JsonCandleAdapter;
use crate::domain::breakout::BreakoutLevels;
use crate::domain::candle::Series;
use crate::domain::config_validation::{build_strategy_config, validate_strategy_config};
use crate::domain::crossover::{scan_crossovers, CrossDirection, CrossoverIndicators};
use crate::domain::engine::analyze_by_timeframe;
use crate::domain::error::SignalError;
use crate::domain::indicator::atr::trailing_atr;
use crate::domain::instrument::{normalize_instrument, parse_instruments};
use crate::domain::normalizer::normalize;
use crate::domain::signal::Signal;
use crate::domain::strategy::StrategyConfig;
use crate::ports::candle_port::CandlePort;
use crate::ports::config_port::ConfigPort;

#[derive(Parser, Debug)]
#[command(
    name = "candlesignal",
    about = "Turtle breakout and moving average crossover signal scanner"
)]
pub struct Cli {
    /// Write logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum DataFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze instruments and print signals
    Scan {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data_dir: PathBuf,
        /// Instrument ticker; repeat or comma-separate for several
        #[arg(short, long)]
        instrument: Vec<String>,
        #[arg(short, long, value_enum, default_value_t = DataFormat::Json)]
        format: DataFormat,
        /// Only print entry signals
        #[arg(long)]
        entries_only: bool,
        /// Print signals as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a strategy configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show breakout channels and crossover history for one instrument
    Levels {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data_dir: PathBuf,
        #[arg(short, long)]
        instrument: String,
        #[arg(short, long, value_enum, default_value_t = DataFormat::Json)]
        format: DataFormat,
    },
}

/// Installs the global tracing subscriber. Filter from `RUST_LOG`, default
/// `info`; output goes to stderr so stdout stays clean for results.
pub fn init_logging(json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    // A second initialization (tests calling into the CLI) is not an error.
    let _ = if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Scan {
            config,
            data_dir,
            instrument,
            format,
            entries_only,
            json,
        } => run_scan(&config, &data_dir, &instrument, format, entries_only, json),
        Command::Validate { config } => run_validate(&config),
        Command::Levels {
            config,
            data_dir,
            instrument,
            format,
        } => run_levels(&config, &data_dir, &instrument, format),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Loads, validates and builds the strategy configuration.
fn load_strategy_config(path: &Path) -> Result<(FileConfigAdapter, StrategyConfig), ExitCode> {
    let adapter = load_config(path)?;
    let built = validate_strategy_config(&adapter)
        .and_then(|()| build_strategy_config(&adapter))
        .map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        })?;
    Ok((adapter, built))
}

pub fn candle_port(format: DataFormat, data_dir: &Path) -> Box<dyn CandlePort> {
    match format {
        DataFormat::Json => Box::new(JsonCandleAdapter::new(data_dir.to_path_buf())),
        DataFormat::Csv => Box::new(CsvCandleAdapter::new(data_dir.to_path_buf())),
    }
}

/// Instruments to scan: the command line first, then `[scan] instruments`
/// in the config, then every instrument the candle source has for the first
/// enabled strategy's timeframe.
pub fn resolve_instruments(
    overrides: &[String],
    config: &dyn ConfigPort,
    port: &dyn CandlePort,
    strategy: &StrategyConfig,
) -> Result<Vec<String>, SignalError> {
    if !overrides.is_empty() {
        return Ok(parse_instruments(&overrides.join(","))?);
    }
    if let Some(list) = config
        .get_string("scan", "instruments")
        .filter(|s| !s.trim().is_empty())
    {
        return Ok(parse_instruments(&list)?);
    }
    let timeframe = if strategy.turtle.enabled {
        &strategy.turtle.timeframe
    } else {
        &strategy.ma_crossover.timeframe
    };
    port.list_instruments(timeframe)
}

pub fn load_series(
    port: &dyn CandlePort,
    instrument: &str,
    timeframe: &str,
) -> Result<Series, SignalError> {
    let raw = port.fetch_candles(instrument, timeframe)?;
    Ok(normalize(&raw))
}

/// Runs every enabled strategy for one instrument, each on candles of its own
/// timeframe.
pub fn scan_instrument(
    port: &dyn CandlePort,
    instrument: &str,
    config: &StrategyConfig,
) -> Result<Vec<Signal>, SignalError> {
    analyze_by_timeframe(instrument, config, |timeframe| {
        load_series(port, instrument, timeframe)
    })
}

#[derive(Debug, Default)]
pub struct ScanReport {
    pub signals: Vec<Signal>,
    pub failures: Vec<(String, SignalError)>,
}

/// Scans each instrument in turn. A failing instrument is logged and
/// recorded; the scan carries on with the rest.
pub fn scan_instruments(
    port: &dyn CandlePort,
    instruments: &[String],
    config: &StrategyConfig,
) -> ScanReport {
    let mut report = ScanReport::default();
    for instrument in instruments {
        match scan_instrument(port, instrument, config) {
            Ok(signals) => {
                tracing::info!(instrument = %instrument, count = signals.len(), "analyzed");
                report.signals.extend(signals);
            }
            Err(e) => {
                tracing::warn!(instrument = %instrument, error = %e, "skipping instrument");
                report.failures.push((instrument.clone(), e));
            }
        }
    }
    report
}

pub fn format_signal(signal: &Signal) -> String {
    let mut out = format!(
        "{} {} price={:.2}",
        signal.instrument, signal.kind, signal.price
    );
    if signal.kind.is_entry() {
        out.push_str(&format!(
            " stop={:.2} target={:.2} size={:.0}",
            signal.stop_loss, signal.take_profit, signal.position_size
        ));
    }
    out.push_str(&format!(" at {}", signal.timestamp));
    for line in signal.rationale.lines() {
        out.push_str("\n    ");
        out.push_str(line);
    }
    out
}

fn run_scan(
    config_path: &Path,
    data_dir: &Path,
    instrument_args: &[String],
    format: DataFormat,
    entries_only: bool,
    json: bool,
) -> ExitCode {
    let (adapter, strategy) = match load_strategy_config(config_path) {
        Ok(v) => v,
        Err(code) => return code,
    };
    if !strategy.turtle.enabled && !strategy.ma_crossover.enabled {
        eprintln!("error: no strategy is enabled in {}", config_path.display());
        return ExitCode::from(2);
    }

    let port = candle_port(format, data_dir);
    let instruments = match resolve_instruments(instrument_args, &adapter, port.as_ref(), &strategy)
    {
        Ok(list) => list,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if instruments.is_empty() {
        eprintln!("error: no instruments to scan");
        return ExitCode::from(4);
    }

    tracing::info!(count = instruments.len(), "scanning instruments");
    let mut report = scan_instruments(port.as_ref(), &instruments, &strategy);
    if entries_only {
        report.signals.retain(|s| s.kind.is_entry());
    }

    if json {
        match serde_json::to_string_pretty(&report.signals) {
            Ok(body) => println!("{body}"),
            Err(e) => {
                eprintln!("error: failed to encode signals: {e}");
                return ExitCode::from(1);
            }
        }
    } else {
        for signal in &report.signals {
            println!("{}", format_signal(signal));
        }
    }

    if !report.failures.is_empty() {
        eprintln!(
            "{} of {} instruments skipped",
            report.failures.len(),
            instruments.len()
        );
    }
    match report.failures.first() {
        Some((_, e)) if report.failures.len() == instruments.len() => e.into(),
        _ => ExitCode::SUCCESS,
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let (_, strategy) = match load_strategy_config(config_path) {
        Ok(v) => v,
        Err(code) => return code,
    };

    let t = &strategy.turtle;
    eprintln!("\nTurtle: {}", if t.enabled { "enabled" } else { "disabled" });
    if t.enabled {
        eprintln!(
            "  timeframe {} | lookback {} | entry {} | exit {} | ATR({}) x{} | risk {}",
            t.timeframe,
            t.lookback_period,
            t.entry_breakout_days,
            t.exit_breakout_days,
            t.atr_period,
            t.atr_multiplier,
            t.risk_per_trade
        );
    }

    let m = &strategy.ma_crossover;
    eprintln!(
        "\nMA crossover: {}",
        if m.enabled { "enabled" } else { "disabled" }
    );
    if m.enabled {
        eprintln!(
            "  timeframe {} | {:?} {}/{} | confirmation {} | trend {} | RSI filter {} | volume filter {}",
            m.timeframe,
            m.ma_type(),
            m.fast_period,
            m.slow_period,
            m.require_confirmation,
            m.trend_filter,
            m.rsi_filter,
            m.use_volume_confirmation
        );
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_levels(config_path: &Path, data_dir: &Path, instrument: &str, format: DataFormat) -> ExitCode {
    let (_, strategy) = match load_strategy_config(config_path) {
        Ok(v) => v,
        Err(code) => return code,
    };
    let instrument = match normalize_instrument(instrument) {
        Ok(i) => i,
        Err(e) => {
            let err = SignalError::from(e);
            eprintln!("error: {err}");
            return (&err).into();
        }
    };
    let port = candle_port(format, data_dir);

    let t = &strategy.turtle;
    let series = match load_series(port.as_ref(), &instrument, &t.timeframe) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if series.len() < t.minimum_bars() {
        let err = SignalError::InsufficientData {
            instrument: instrument.clone(),
            bars: series.len(),
            minimum: t.minimum_bars(),
        };
        eprintln!("error: {err}");
        return (&err).into();
    }
    let levels = BreakoutLevels::compute(&series, t);
    let atr = trailing_atr(&series.highs, &series.lows, &series.closes, t.atr_period);

    println!("{instrument} ({} bars, timeframe {})", series.len(), t.timeframe);
    println!("ATR({}): {atr:.2}", t.atr_period);
    for (label, level) in [
        ("entry high", &levels.entry_high),
        ("entry low", &levels.entry_low),
        ("exit high", &levels.exit_high),
        ("exit low", &levels.exit_low),
    ] {
        println!("{label:>10}: {:.2} (set {})", level.value, level.set_at);
    }

    let m = &strategy.ma_crossover;
    let ma_series = if m.timeframe == t.timeframe {
        Ok(series)
    } else {
        load_series(port.as_ref(), &instrument, &m.timeframe)
    };
    let ma_series = match ma_series {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let indicators = CrossoverIndicators::compute(&ma_series.closes, m);
    println!("\ncrossovers of {} over {}:", indicators.fast_type, indicators.slow_type);
    let crosses = scan_crossovers(&indicators.fast, &indicators.slow);
    if crosses.is_empty() {
        println!("  none");
    }
    for (i, direction) in crosses {
        let name = match direction {
            CrossDirection::Golden => "golden",
            CrossDirection::Death => "death",
        };
        let when = ma_series
            .timestamps
            .get(i)
            .map(|ts| ts.to_string())
            .unwrap_or_default();
        println!("  {name:>6} at bar {i} ({when})");
    }

    ExitCode::SUCCESS
}
