//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::config_validation::{
    PortfolioConfig, validate_data_dir, validate_portfolio_config,
};
use crate::domain::error::AccrueError;
use crate::domain::portfolio::{Portfolio, PortfolioView};
use crate::domain::position::build_position;
use crate::ports::data_port::{PricePort, RatePort};
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "accrue", about = "Compounded investment trajectories")]
pub struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Csv,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the portfolio and report its trajectories
    Run {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = ReportFormat::Csv)]
        format: ReportFormat,
        #[arg(long, default_value = "result")]
        view: PortfolioView,
        /// Last date of the portfolio axis (overrides the config)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Validate a portfolio configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the last known price of a ticker
    Price {
        #[arg(long)]
        ticker: String,
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            output,
            format,
            view,
            as_of,
        } => run_portfolio(&config, output.as_deref(), format, view, as_of),
        Command::Validate { config } => run_validate(&config),
        Command::Price { ticker, config } => run_price(&ticker, &config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Relative data directories are taken from the config file's directory.
pub fn resolve_data_dir(config_path: &Path, data_dir: &Path) -> PathBuf {
    if data_dir.is_absolute() {
        return data_dir.to_path_buf();
    }
    match config_path.parent() {
        Some(parent) => parent.join(data_dir),
        None => data_dir.to_path_buf(),
    }
}

/// Build every configured position and align them up to `as_of`.
///
/// A member whose source has no data for its range is left out with a
/// warning; the portfolio fails with that `NoData` only when no member is
/// left.
pub fn build_portfolio(
    config: &PortfolioConfig,
    prices: &dyn PricePort,
    rates: &dyn RatePort,
    as_of: NaiveDate,
) -> Result<Portfolio, AccrueError> {
    let mut positions = Vec::with_capacity(config.positions.len());
    let mut missing = None;

    for spec in &config.positions {
        match build_position(spec, prices, rates) {
            Ok(position) => positions.push(position),
            Err(e) if e.is_no_data() => {
                warn!(name = %spec.name, "{e}, leaving position out");
                missing = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    if positions.is_empty() {
        if let Some(e) = missing {
            return Err(e);
        }
    }
    Portfolio::new(positions, as_of)
}

fn run_portfolio(
    config_path: &Path,
    output_path: Option<&Path>,
    format: ReportFormat,
    view: PortfolioView,
    as_of_override: Option<NaiveDate>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let config = match validate_portfolio_config(&adapter, as_of_override) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data = CsvAdapter::new(resolve_data_dir(config_path, &config.data_dir));
    let portfolio = match build_portfolio(&config, &data, &data, config.as_of) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    for position in &portfolio.positions {
        match position.final_value() {
            Some(v) => eprintln!("  {position}: {v:.2}"),
            None => eprintln!("  {position}: no value"),
        }
    }

    let reporter: Box<dyn ReportPort> = match format {
        ReportFormat::Csv => Box::new(CsvReportAdapter::new()),
        ReportFormat::Json => Box::new(JsonReportAdapter::new()),
    };

    let written = match output_path {
        Some(path) => {
            let path_str = path.to_string_lossy();
            reporter
                .write_portfolio(&portfolio, view, &path_str)
                .map(|()| info!(path = %path_str, %view, "report written"))
        }
        None => reporter
            .render_portfolio(&portfolio, view)
            .map(|rendered| print!("{rendered}")),
    };

    match written {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating portfolio: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let config = match validate_portfolio_config(&adapter, None) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nData directory: {}", config.data_dir.display());
    eprintln!("As of:          {}", config.as_of);
    eprintln!("\nPositions:");
    for spec in &config.positions {
        let schedule = spec
            .frequency
            .map(|f| format!(", every {f}"))
            .unwrap_or_default();
        eprintln!(
            "  {}: {} {} {:.2} from {} to {}{}",
            spec.name, spec.kind, spec.identifier, spec.value, spec.start, spec.end, schedule
        );
    }

    eprintln!("\nPortfolio configuration is valid.");
    ExitCode::SUCCESS
}

fn run_price(ticker: &str, config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let data_dir = match validate_data_dir(&config) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data = CsvAdapter::new(resolve_data_dir(config_path, &data_dir));
    match data.last_price(ticker) {
        Ok(p) => {
            println!("{}: {} on {}", ticker, p.close, p.date);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
