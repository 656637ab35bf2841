//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{run_universe, BacktestResult};
use crate::domain::cleaning::CleanedData;
use crate::domain::config_validation::{positive_int, validate_run_config};
use crate::domain::error::SmatraderError;
use crate::domain::execution::{ExecutionParams, FillPolicy};
use crate::domain::metrics::LedgerSummary;
use crate::domain::strategy::StrategyParams;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "smatrader", about = "SMA crossover backtester")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the SMA crossover backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Orders CSV path (overrides [output] orders_file)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only backtest this symbol
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Clean a raw price CSV and write a validation report
    Clean {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long)]
        report: Option<PathBuf>,
        /// Symbol for rows without one (defaults to the file name)
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols present in the configured data file
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Everything the `backtest` command reads from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub data_file: PathBuf,
    pub default_symbol: String,
    pub start_equity: f64,
    /// Informational only; bars are daily and carry no time of day.
    pub timezone: String,
    pub strategy: StrategyParams,
    pub execution: ExecutionParams,
    pub orders_file: Option<PathBuf>,
    pub report_file: Option<PathBuf>,
}

pub fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            config,
            output,
            symbol,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config)
            } else {
                run_backtest(&config, output.as_deref(), symbol.as_deref())
            }
        }
        Command::Clean {
            input,
            output,
            report,
            symbol,
        } => run_clean(&input, &output, report.as_deref(), symbol.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, SmatraderError> {
    FileConfigAdapter::from_file(path).map_err(|e| SmatraderError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn window(config: &dyn ConfigPort, key: &str) -> Result<usize, SmatraderError> {
    let value = positive_int(config, "strategy", key)?;
    usize::try_from(value).map_err(|_| SmatraderError::invalid_parameter(key, "window too large"))
}

pub fn build_strategy_params(config: &dyn ConfigPort) -> Result<StrategyParams, SmatraderError> {
    Ok(StrategyParams {
        fast: window(config, "fast")?,
        slow: window(config, "slow")?,
    })
}

pub fn build_execution_params(config: &dyn ConfigPort) -> Result<ExecutionParams, SmatraderError> {
    let fill = match config.get_string("execution", "fill") {
        Some(s) => s.parse::<FillPolicy>().map_err(|reason| SmatraderError::ConfigInvalid {
            section: "execution".into(),
            key: "fill".into(),
            reason,
        })?,
        None => FillPolicy::default(),
    };
    Ok(ExecutionParams {
        fill,
        quantity: positive_int(config, "execution", "quantity")?,
    })
}

/// The `[data]` section as a CSV data port.
pub fn build_data_port(config: &dyn ConfigPort) -> Result<CsvAdapter, SmatraderError> {
    let data_file =
        config
            .get_path("data", "data_file")
            .ok_or_else(|| SmatraderError::ConfigMissing {
                section: "data".into(),
                key: "data_file".into(),
            })?;

    let default_symbol = config
        .get_string("data", "symbol")
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| CsvAdapter::symbol_from_path(&data_file));

    Ok(CsvAdapter::new(data_file, default_symbol))
}

pub fn build_run_config(config: &dyn ConfigPort) -> Result<RunConfig, SmatraderError> {
    let data_port = build_data_port(config)?;
    let data_file = data_port.path().to_path_buf();
    let default_symbol = data_port.default_symbol().to_string();

    Ok(RunConfig {
        data_file,
        default_symbol,
        start_equity: config.get_double("backtest", "start_equity", 100_000.0),
        timezone: config
            .get_string("backtest", "timezone")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "UTC".to_string()),
        strategy: build_strategy_params(config)?,
        execution: build_execution_params(config)?,
        orders_file: config.get_path("output", "orders_file"),
        report_file: config.get_path("output", "report_file"),
    })
}

fn run_backtest(
    config_path: &Path,
    output_override: Option<&Path>,
    symbol: Option<&str>,
) -> Result<(), SmatraderError> {
    // Stage 1: Load and validate config
    tracing::info!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;
    validate_run_config(&adapter)?;
    let run_config = build_run_config(&adapter)?;

    // Stage 2: Resolve the orders path before doing any work
    let orders_path = output_override
        .map(Path::to_path_buf)
        .or_else(|| run_config.orders_file.clone())
        .ok_or_else(|| SmatraderError::ConfigMissing {
            section: "output".into(),
            key: "orders_file".into(),
        })?;

    // Stages 3-6: Data port dependent pipeline
    tracing::debug!(timezone = %run_config.timezone, "market timezone");
    let data_port = CsvAdapter::new(run_config.data_file.clone(), run_config.default_symbol.clone());
    let report_port = CsvReportAdapter::new();
    let results = run_backtest_pipeline(&data_port, &report_port, &run_config, &orders_path, symbol)?;

    print_summary(&results, run_config.start_equity);
    Ok(())
}

/// Load, clean, simulate every symbol and write the outputs.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    run_config: &RunConfig,
    orders_path: &Path,
    symbol: Option<&str>,
) -> Result<Vec<BacktestResult>, SmatraderError> {
    // Stage 3: Load and clean data
    let CleanedData { series, report } = data_port.load_all()?;
    tracing::info!(
        rows = report.rows_after,
        dropped = report.rows_dropped(),
        symbols = report.symbols.len(),
        "Loaded price data"
    );

    // Stage 4: Select series
    let universe = match symbol {
        Some(wanted) => {
            let wanted = wanted.trim().to_uppercase();
            let selected = series
                .into_iter()
                .find(|(s, _)| s.eq_ignore_ascii_case(&wanted))
                .map(|(_, series)| series)
                .ok_or(SmatraderError::NoData { symbol: wanted })?;
            vec![selected]
        }
        None => series.into_values().collect(),
    };
    if universe.is_empty() {
        return Err(SmatraderError::NoData {
            symbol: "any symbol".into(),
        });
    }

    // Report only once there is something to run
    if let Some(report_path) = &run_config.report_file {
        report_port.write_validation_report(&report, report_path)?;
    }

    // Stage 5: Simulate
    tracing::info!(
        "Running {} on {} symbol(s), quantity {}",
        run_config.strategy,
        universe.len(),
        run_config.execution.quantity
    );
    let results = run_universe(&universe, &run_config.strategy, &run_config.execution)?;

    // Stage 6: Write orders
    report_port.write_orders(&results, orders_path)?;
    Ok(results)
}

fn print_summary(results: &[BacktestResult], start_equity: f64) {
    println!("=== Per-Symbol Summary ===");
    for result in results {
        let summary = LedgerSummary::compute(&result.ledger, start_equity);
        let pnl_sign = if summary.total_pnl >= 0.0 { "+" } else { "" };
        println!(
            "  {}:  {} closed, {} open, {:.1}% win rate, {}{:.2}",
            result.symbol,
            summary.closed_trades,
            summary.open_trades,
            summary.win_rate * 100.0,
            pnl_sign,
            summary.total_pnl,
        );
    }

    let total = LedgerSummary::compute_many(results.iter().map(|r| &r.ledger), start_equity);
    println!("\n=== Aggregate ===");
    println!("Closed Trades:    {}", total.closed_trades);
    println!("Open Trades:      {}", total.open_trades);
    println!("Win Rate:         {:.1}%", total.win_rate * 100.0);
    println!("Realized PnL:     {:.2}", total.total_pnl);
    println!("Profit Factor:    {:.2}", total.profit_factor);
    println!("Avg Bars Held:    {:.1}", total.avg_bars_held);
    println!("Ending Equity:    {:.2}", total.ending_equity);
}

pub fn run_dry_run(config_path: &Path) -> Result<(), SmatraderError> {
    tracing::info!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;
    validate_run_config(&adapter)?;
    let run_config = build_run_config(&adapter)?;

    println!("Strategy:   {}", run_config.strategy);
    println!("Execution:  {} x {}", run_config.execution.fill, run_config.execution.quantity);
    println!("Data file:  {}", run_config.data_file.display());
    println!("Symbol:     {}", run_config.default_symbol);
    println!("Equity:     {:.2}", run_config.start_equity);
    println!("Timezone:   {}", run_config.timezone);
    if run_config.strategy.is_degenerate() {
        tracing::warn!("fast >= slow; crossover may be degenerate");
    }
    println!("\nDry run complete: configuration is valid");
    Ok(())
}

fn run_clean(
    input: &Path,
    output: &Path,
    report: Option<&Path>,
    symbol: Option<&str>,
) -> Result<(), SmatraderError> {
    tracing::info!("Reading {}", input.display());
    let default_symbol = symbol
        .map(str::to_uppercase)
        .unwrap_or_else(|| CsvAdapter::symbol_from_path(input));
    let cleaned = CsvAdapter::new(input.to_path_buf(), default_symbol).load_all()?;

    let report_port = CsvReportAdapter::new();
    report_port.write_clean_csv(cleaned.series.values(), output)?;
    tracing::info!(
        "Wrote cleaned file {} with {} rows",
        output.display(),
        cleaned.report.rows_after
    );

    if let Some(report_path) = report {
        report_port.write_validation_report(&cleaned.report, report_path)?;
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), SmatraderError> {
    tracing::info!("Validating config: {}", config_path.display());
    let adapter = load_config(config_path)?;
    validate_run_config(&adapter)?;
    let run_config = build_run_config(&adapter)?;

    println!("Strategy: {}", run_config.strategy);
    if run_config.strategy.is_degenerate() {
        println!("  warning: fast >= slow; crossover may be degenerate");
    }
    println!("Quantity: {}", run_config.execution.quantity);
    println!("\nConfiguration is valid.");
    Ok(())
}

fn run_list_symbols(config_path: &Path) -> Result<(), SmatraderError> {
    let adapter = load_config(config_path)?;
    let data_port = build_data_port(&adapter)?;

    let symbols = data_port.list_symbols()?;
    if symbols.is_empty() {
        tracing::warn!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        tracing::info!("{} symbols found", symbols.len());
    }
    Ok(())
}
