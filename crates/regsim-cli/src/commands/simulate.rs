//! `regsim simulate`: one experiment described on the command line.

use std::path::Path;

use regsim::dgp::DgpKind;
use regsim::report::{render_table, to_csv, write_chart, ChartConfig, ChartKind};
use regsim::simulation::{Evaluation, MethodKind, MonteCarloSimulation};

use tracing::info;

use super::experiment_json;
use crate::error::{CliError, Result};
use crate::output;

pub(crate) struct SimulateArgs<'a> {
    pub dgp: DgpKind,
    pub sizes: &'a [usize],
    pub methods: &'a [MethodKind],
    pub simulations: usize,
    pub evaluate: Evaluation,
    pub chart: ChartKind,
    pub output: Option<&'a Path>,
    pub csv: Option<&'a Path>,
    pub title: Option<&'a str>,
    pub legend: bool,
    pub test_size: usize,
    pub json: bool,
    pub quiet: bool,
}

pub(crate) fn run(args: &SimulateArgs<'_>) -> Result<()> {
    let mut sim = MonteCarloSimulation::new(args.dgp.build(), args.sizes.to_vec())?
        .with_test_size(args.test_size);

    for method in args.methods {
        let adapter = method.build();
        sim.simulate(adapter.as_ref(), args.simulations, args.evaluate)?;
    }

    let title = args
        .title
        .map_or_else(|| format!("{}-Scores for {}", args.evaluate, sim.dgp_name()), str::to_string);

    let chart_path = match args.output {
        Some(path) => {
            let config = ChartConfig::new(title.clone()).with_legend(args.legend);
            let svg = args.chart.render(sim.sample_sizes(), sim.results(), &config)?;
            Some(write_chart(path, &svg)?)
        }
        None => None,
    };

    if let Some(path) = args.csv {
        std::fs::write(path, to_csv(sim.sample_sizes(), sim.results())?)?;
        info!(path = %path.display(), "scores written");
    }

    if args.json {
        let chart = chart_path.as_ref().map(|p| p.display().to_string());
        let report = experiment_json(&title, &sim, chart.as_deref());
        println!(
            "{}",
            serde_json::to_string_pretty(&report).map_err(|e| CliError::Simulation(e.to_string()))?
        );
    } else if !args.quiet {
        output::section(&title);
        output::kv("Evaluation", args.evaluate);
        output::kv("Simulations", args.simulations);
        output::kv("Test size", sim.test_size());
        println!();
        print!("{}", render_table(sim.sample_sizes(), sim.results())?);
        if let Some(path) = chart_path {
            output::success(&format!("Chart written to: {}", path.display()));
        }
    }
    Ok(())
}
