//! Reporting of aggregated simulation results.
//!
//! Charts are rendered as standalone SVG documents with `plotters`:
//! - [`render_line_chart`]: one marked line per method over the sample sizes
//! - [`render_bar_chart`]: grouped bars, one group per sample size
//!
//! Tabular summaries are available through [`render_table`], [`to_json`] and
//! [`to_csv`].

mod chart;
mod export;

pub use chart::{render_bar_chart, render_line_chart};
pub use export::{render_table, to_csv, to_json};

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{RegsimError, Result};
use crate::simulation::SimulationResults;

/// Layout and labelling of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Title drawn above the plot
    pub title: String,
    /// Horizontal axis label
    pub x_label: String,
    /// Vertical axis label
    pub y_label: String,
    /// Draw a legend in the upper right corner
    pub legend: bool,
    /// Bar width in category units
    pub bar_width: f64,
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_label: "Sample Size".to_string(),
            y_label: "Score".to_string(),
            legend: true,
            bar_width: 0.3,
            width: 800,
            height: 500,
        }
    }
}

impl ChartConfig {
    /// Default layout with a title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Shows or hides the legend.
    #[must_use]
    pub fn with_legend(mut self, legend: bool) -> Self {
        self.legend = legend;
        self
    }

    /// Sets the canvas size.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the bar width.
    #[must_use]
    pub fn with_bar_width(mut self, bar_width: f64) -> Self {
        self.bar_width = bar_width;
        self
    }
}

/// Chart style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Line chart
    Line,
    /// Grouped bar chart
    #[default]
    Bar,
}

impl ChartKind {
    /// Renders `results` in this style.
    ///
    /// # Errors
    ///
    /// See [`render_line_chart`] and [`render_bar_chart`].
    pub fn render(
        self,
        sample_sizes: &[usize],
        results: &SimulationResults,
        config: &ChartConfig,
    ) -> Result<String> {
        match self {
            Self::Line => render_line_chart(sample_sizes, results, config),
            Self::Bar => render_bar_chart(sample_sizes, results, config),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line => write!(f, "line"),
            Self::Bar => write!(f, "bar"),
        }
    }
}

impl FromStr for ChartKind {
    type Err = RegsimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "line" | "plot" => Ok(Self::Line),
            "bar" => Ok(Self::Bar),
            other => Err(RegsimError::InvalidConfig(format!(
                "unknown chart kind '{other}', expected 'line' or 'bar'"
            ))),
        }
    }
}

/// Writes `svg` to `path`, creating parent directories. A `.svg` extension
/// is appended unless already present. Returns the path written.
///
/// # Errors
///
/// Returns [`RegsimError::Io`] if the directory or file cannot be written.
pub fn write_chart(path: impl AsRef<Path>, svg: &str) -> Result<PathBuf> {
    let path = svg_path(path.as_ref());
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&path, svg)?;
    info!(path = %path.display(), "chart written");
    Ok(path)
}

fn svg_path(path: &Path) -> PathBuf {
    let has_svg = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if has_svg {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".svg");
        PathBuf::from(name)
    }
}

/// Every series must have one score per sample size.
fn check_series(sample_sizes: &[usize], results: &SimulationResults) -> Result<()> {
    if sample_sizes.is_empty() {
        return Err(RegsimError::EmptyInput("no sample sizes to report".into()));
    }
    if results.is_empty() {
        return Err(RegsimError::EmptyInput("no results to report".into()));
    }
    for series in results.iter() {
        if series.scores.len() != sample_sizes.len() {
            return Err(RegsimError::DimensionMismatch {
                expected: format!("{} scores for '{}'", sample_sizes.len(), series.method),
                actual: format!("{}", series.scores.len()),
            });
        }
    }
    Ok(())
}
