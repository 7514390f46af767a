//! regsim-cli library
//!
//! Exports the CLI structures for the `regsim` binary and its tests.

use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use regsim::dgp::DgpKind;
use regsim::report::ChartKind;
use regsim::simulation::{Evaluation, MethodKind, DEFAULT_TEST_SIZE};
use tracing_subscriber::EnvFilter;

mod commands;
pub mod error;
mod output;

pub use error::{CliError, Result};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "REGSIM_LOG";

/// regsim - random forest vs OLS Monte Carlo experiments
#[derive(Parser, Debug)]
#[command(name = "regsim")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every experiment of a plan (the built-in comparison by default)
    Run {
        /// TOML experiment plan
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Directory charts are written to (overrides the plan)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Monte Carlo repetitions per sample size (overrides the plan)
        #[arg(short, long, value_parser = repetitions())]
        simulations: Option<usize>,
    },

    /// Run a single experiment described by flags
    Simulate {
        /// Data-generating process: linear or nonlinear
        #[arg(long)]
        dgp: DgpKind,

        /// Comma-separated training sample sizes
        #[arg(long, value_delimiter = ',', required = true)]
        sizes: Vec<usize>,

        /// Method to simulate: ols or forest (repeatable, run in order)
        #[arg(short, long = "method", required = true)]
        methods: Vec<MethodKind>,

        /// Monte Carlo repetitions per sample size
        #[arg(short, long, default_value_t = 1000, value_parser = repetitions())]
        simulations: usize,

        /// Scoring mode: R2 or RSS
        #[arg(short, long, default_value = "R2")]
        evaluate: Evaluation,

        /// Chart style written with --output
        #[arg(long, default_value = "bar")]
        chart: ChartKind,

        /// Write an SVG chart to this path
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Write the per-size scores as CSV to this path
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,

        /// Chart title
        #[arg(long)]
        title: Option<String>,

        /// Omit the chart legend
        #[arg(long)]
        no_legend: bool,

        /// Rows in each test set
        #[arg(long, default_value_t = DEFAULT_TEST_SIZE)]
        test_size: usize,
    },
}

/// At least one Monte Carlo repetition.
fn repetitions() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::<usize>::new().range(1..)
}

/// Installs the global `tracing` subscriber on stderr.
///
/// `REGSIM_LOG` takes precedence; otherwise `-q` selects `error`, `-v`
/// selects `debug` and the default is `info`.
pub fn init_tracing(verbose: bool, quiet: bool) {
    let fallback = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Dispatches the parsed command line.
///
/// # Errors
///
/// Returns a [`CliError`] whose [`CliError::exit_code`] the binary exits with.
pub fn execute(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Run {
            config,
            output_dir,
            simulations,
        } => commands::run::run(
            config.as_deref(),
            output_dir.as_deref(),
            *simulations,
            cli.json,
            cli.quiet,
        ),

        Commands::Simulate {
            dgp,
            sizes,
            methods,
            simulations,
            evaluate,
            chart,
            output,
            csv,
            title,
            no_legend,
            test_size,
        } => commands::simulate::run(&commands::simulate::SimulateArgs {
            dgp: *dgp,
            sizes,
            methods,
            simulations: *simulations,
            evaluate: *evaluate,
            chart: *chart,
            output: output.as_deref(),
            csv: csv.as_deref(),
            title: title.as_deref(),
            legend: !no_legend,
            test_size: *test_size,
            json: cli.json,
            quiet: cli.quiet,
        }),
    }
}
