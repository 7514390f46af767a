//! regsim - Monte Carlo comparison of random forests and OLS
//!
//! Usage:
//!   regsim run                                   # Built-in forest vs OLS comparison
//!   regsim run --config plan.toml -o plots       # Experiments from a TOML plan
//!   regsim simulate --dgp linear --sizes 100,1000 --method ols --evaluate RSS

use std::process::ExitCode;

use clap::Parser;
use regsim_cli::{execute, init_tracing, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}
