//! `regsim run`: execute every experiment of a plan.

use std::path::Path;

use regsim::config::PlanConfig;
use regsim::report::{render_table, write_chart};
use tracing::info;

use super::experiment_json;
use crate::error::{CliError, Result};
use crate::output;

pub(crate) fn run(
    config: Option<&Path>,
    output_dir: Option<&Path>,
    simulations: Option<usize>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let mut plan = match config {
        Some(path) => PlanConfig::load(path)?,
        None => PlanConfig::builtin(),
    };
    if let Some(dir) = output_dir {
        plan.output_dir = dir.to_path_buf();
    }
    if let Some(n) = simulations {
        plan.override_simulation_num(n);
    }
    plan.validate()?;

    info!(
        experiments = plan.experiments.len(),
        output_dir = %plan.output_dir.display(),
        "running plan"
    );

    let mut reports = Vec::with_capacity(plan.experiments.len());
    for experiment in &plan.experiments {
        let sim = experiment.run()?;
        let svg = experiment
            .chart
            .render(sim.sample_sizes(), sim.results(), &experiment.chart_config())?;
        let path = write_chart(plan.output_dir.join(&experiment.name), &svg)?;

        if json {
            reports.push(experiment_json(
                &experiment.name,
                &sim,
                Some(path.display().to_string().as_str()),
            ));
        } else if !quiet {
            output::section(experiment.title());
            output::kv("DGP", sim.dgp_name());
            output::kv("Evaluation", experiment.evaluate);
            output::kv("Simulations", experiment.simulation_num);
            println!();
            print!("{}", render_table(sim.sample_sizes(), sim.results())?);
            output::success(&format!("Chart written to: {}", path.display()));
        }
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&reports)
                .map_err(|e| CliError::Simulation(e.to_string()))?
        );
    }
    Ok(())
}
