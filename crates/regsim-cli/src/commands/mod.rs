//! Subcommand implementations.

pub(crate) mod run;
pub(crate) mod simulate;

use regsim::simulation::MonteCarloSimulation;
use serde_json::{json, Value};

/// JSON object describing one finished experiment.
pub(crate) fn experiment_json(name: &str, sim: &MonteCarloSimulation, chart: Option<&str>) -> Value {
    let series: Vec<_> = sim.results().iter().collect();
    json!({
        "experiment": name,
        "dgp": sim.dgp_name(),
        "sample_sizes": sim.sample_sizes(),
        "series": series,
        "chart": chart,
    })
}
