//! Experiment plans loaded from TOML.
//!
//! ```toml
//! output_dir = "plots"
//!
//! [[experiment]]
//! name = "forest_vs_ols_nonlinearDGP"
//! title = "RSS-Scores for non-linear DGP"
//! dgp = "nonlinear"
//! sample_sizes = [100, 500, 1000]
//! methods = ["forest", "ols"]
//! simulation_num = 1
//! evaluate = "RSS"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dgp::DgpKind;
use crate::error::{RegsimError, Result};
use crate::report::{ChartConfig, ChartKind};
use crate::simulation::{Evaluation, MethodKind, MonteCarloSimulation, DEFAULT_TEST_SIZE};

/// Monte Carlo repetitions when a plan does not say.
pub const DEFAULT_SIMULATION_NUM: usize = 1000;

/// A set of experiments sharing an output directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Directory charts are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Experiments, run in order
    #[serde(rename = "experiment", default)]
    pub experiments: Vec<Experiment>,
}

/// One DGP compared across methods and sample sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    /// File stem of the chart
    pub name: String,
    /// Chart title; defaults to `name`
    #[serde(default)]
    pub title: Option<String>,
    /// Data-generating process
    pub dgp: DgpKind,
    /// Training sample sizes, in plotting order
    pub sample_sizes: Vec<usize>,
    /// Methods, simulated in this order
    pub methods: Vec<MethodKind>,
    /// Monte Carlo repetitions per sample size
    #[serde(default = "default_simulation_num")]
    pub simulation_num: usize,
    /// Scoring mode
    #[serde(default)]
    pub evaluate: Evaluation,
    /// Chart style
    #[serde(default)]
    pub chart: ChartKind,
    /// Draw a legend
    #[serde(default = "default_legend")]
    pub legend: bool,
    /// Test-set size
    #[serde(default = "default_test_size")]
    pub test_size: usize,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("plots")
}

fn default_simulation_num() -> usize {
    DEFAULT_SIMULATION_NUM
}

fn default_legend() -> bool {
    true
}

fn default_test_size() -> usize {
    DEFAULT_TEST_SIZE
}

impl PlanConfig {
    /// Parses and validates a plan.
    ///
    /// # Errors
    ///
    /// Returns [`RegsimError::InvalidConfig`] on malformed TOML or a plan
    /// that fails [`PlanConfig::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let plan: Self = toml::from_str(text)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Reads and validates a plan file.
    ///
    /// # Errors
    ///
    /// Returns [`RegsimError::Io`] if the file cannot be read, otherwise as
    /// [`PlanConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        info!(path = %path.display(), "loaded experiment plan");
        Self::from_toml_str(&text)
    }

    /// The two-experiment comparison: forest then OLS, one RSS iteration per
    /// size, bar charts.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            output_dir: default_output_dir(),
            experiments: vec![
                Experiment {
                    name: "forest_vs_ols_nonlinearDGP".into(),
                    title: Some("RSS-Scores for non-linear DGP".into()),
                    dgp: DgpKind::NonLinear,
                    sample_sizes: vec![100, 500, 1000, 5000, 10000, 50000, 75000, 100_000],
                    methods: vec![MethodKind::Forest, MethodKind::Ols],
                    simulation_num: 1,
                    evaluate: Evaluation::Rss,
                    chart: ChartKind::Bar,
                    legend: true,
                    test_size: DEFAULT_TEST_SIZE,
                },
                Experiment {
                    name: "forest_vs_ols_linearDGP".into(),
                    title: Some("RSS-Scores for linear DGP".into()),
                    dgp: DgpKind::Linear,
                    sample_sizes: vec![100, 1000, 5000, 10000, 50000, 100_000],
                    methods: vec![MethodKind::Forest, MethodKind::Ols],
                    simulation_num: 1,
                    evaluate: Evaluation::Rss,
                    chart: ChartKind::Bar,
                    legend: true,
                    test_size: DEFAULT_TEST_SIZE,
                },
            ],
        }
    }

    /// Checks that every experiment can run.
    ///
    /// # Errors
    ///
    /// Returns [`RegsimError::InvalidConfig`] naming the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.experiments.is_empty() {
            return Err(RegsimError::InvalidConfig(
                "plan contains no [[experiment]] entries".into(),
            ));
        }
        self.experiments.iter().try_for_each(Experiment::validate)
    }

    /// Sets `simulation_num` on every experiment.
    pub fn override_simulation_num(&mut self, simulation_num: usize) {
        for experiment in &mut self.experiments {
            experiment.simulation_num = simulation_num;
        }
    }
}

impl Experiment {
    /// Checks this experiment in isolation.
    ///
    /// # Errors
    ///
    /// Returns [`RegsimError::InvalidConfig`] on an empty name, no sizes, a
    /// zero size, no methods, or zero repetitions or test rows.
    pub fn validate(&self) -> Result<()> {
        let fail = |what: &str| {
            Err(RegsimError::InvalidConfig(format!(
                "experiment '{}': {what}",
                self.name
            )))
        };

        if self.name.trim().is_empty() {
            return fail("name must not be empty");
        }
        if self.sample_sizes.is_empty() {
            return fail("sample_sizes must not be empty");
        }
        if self.sample_sizes.contains(&0) {
            return fail("sample sizes must be positive");
        }
        if self.methods.is_empty() {
            return fail("methods must not be empty");
        }
        if self.simulation_num == 0 {
            return fail("simulation_num must be at least 1");
        }
        if self.test_size == 0 {
            return fail("test_size must be at least 1");
        }
        Ok(())
    }

    /// Chart title, falling back to the experiment name.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    /// Chart layout for this experiment.
    #[must_use]
    pub fn chart_config(&self) -> ChartConfig {
        ChartConfig::new(self.title()).with_legend(self.legend)
    }

    /// Runs every method in order and returns the populated driver.
    ///
    /// # Errors
    ///
    /// Propagates validation and simulation errors.
    pub fn run(&self) -> Result<MonteCarloSimulation> {
        self.validate()?;
        info!(
            experiment = %self.name,
            dgp = %self.dgp,
            methods = self.methods.len(),
            "running experiment"
        );

        let mut sim = MonteCarloSimulation::new(self.dgp.build(), self.sample_sizes.clone())?
            .with_test_size(self.test_size);
        for method in &self.methods {
            let adapter = method.build();
            sim.simulate(adapter.as_ref(), self.simulation_num, self.evaluate)?;
        }
        Ok(sim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = r#"
output_dir = "out"

[[experiment]]
name = "small"
dgp = "linear"
sample_sizes = [20, 40]
methods = ["ols"]
simulation_num = 2
evaluate = "RSS"
chart = "line"
"#;

    #[test]
    fn test_parse_with_defaults() {
        let plan = PlanConfig::from_toml_str(PLAN).expect("valid plan");
        assert_eq!(plan.output_dir, PathBuf::from("out"));

        let exp = &plan.experiments[0];
        assert_eq!(exp.dgp, DgpKind::Linear);
        assert_eq!(exp.methods, vec![MethodKind::Ols]);
        assert_eq!(exp.evaluate, Evaluation::Rss);
        assert_eq!(exp.chart, ChartKind::Line);
        assert!(exp.legend);
        assert_eq!(exp.test_size, DEFAULT_TEST_SIZE);
        assert_eq!(exp.title(), "small");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let plan = PlanConfig::from_toml_str(
            "[[experiment]]\nname = \"e\"\ndgp = \"nonlinear\"\nsample_sizes = [10]\nmethods = [\"forest\"]\n",
        )
        .expect("valid plan");
        let exp = &plan.experiments[0];
        assert_eq!(plan.output_dir, PathBuf::from("plots"));
        assert_eq!(exp.simulation_num, DEFAULT_SIMULATION_NUM);
        assert_eq!(exp.evaluate, Evaluation::R2);
        assert_eq!(exp.chart, ChartKind::Bar);
    }

    #[test]
    fn test_unsupported_evaluation_rejected() {
        let text = PLAN.replace("\"RSS\"", "\"MAE\"");
        let err = PlanConfig::from_toml_str(&text).expect_err("MAE is unsupported");
        assert!(matches!(err, RegsimError::InvalidConfig(ref msg) if msg.contains("MAE")));
    }

    #[test]
    fn test_unknown_dgp_rejected() {
        let text = PLAN.replace("\"linear\"", "\"cubic\"");
        assert!(PlanConfig::from_toml_str(&text).is_err());
    }

    #[test]
    fn test_validation_failures() {
        assert!(PlanConfig::from_toml_str("output_dir = \"x\"").is_err());
        assert!(PlanConfig::from_toml_str(&PLAN.replace("[20, 40]", "[20, 0]")).is_err());
        assert!(PlanConfig::from_toml_str(&PLAN.replace("[\"ols\"]", "[]")).is_err());
        assert!(
            PlanConfig::from_toml_str(&PLAN.replace("simulation_num = 2", "simulation_num = 0"))
                .is_err()
        );
    }

    #[test]
    fn test_builtin_plan() {
        let plan = PlanConfig::builtin();
        plan.validate().expect("builtin plan is valid");
        assert_eq!(plan.experiments.len(), 2);

        let nonlinear = &plan.experiments[0];
        assert_eq!(nonlinear.sample_sizes.len(), 8);
        assert_eq!(nonlinear.methods, vec![MethodKind::Forest, MethodKind::Ols]);
        assert_eq!(nonlinear.title(), "RSS-Scores for non-linear DGP");
        assert_eq!(plan.experiments[1].sample_sizes.last(), Some(&100_000));
    }

    #[test]
    fn test_override_simulation_num() {
        let mut plan = PlanConfig::builtin();
        plan.override_simulation_num(7);
        assert!(plan.experiments.iter().all(|e| e.simulation_num == 7));
    }

    #[test]
    fn test_load_from_file_and_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("plan.toml");
        std::fs::write(&path, PLAN).expect("write plan");

        let plan = PlanConfig::load(&path).expect("valid plan");
        let sim = plan.experiments[0].run().expect("run should succeed");
        let rss = sim.results().get("linearRegression").expect("present");
        assert_eq!(rss.len(), 2);
        assert!(rss.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        assert!(matches!(
            PlanConfig::load("/definitely/not/here.toml"),
            Err(RegsimError::Io(_))
        ));
    }
}
