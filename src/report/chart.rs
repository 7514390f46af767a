//! SVG chart rendering with `plotters`.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{check_series, ChartConfig};
use crate::error::{RegsimError, Result};
use crate::simulation::SimulationResults;

// matplotlib's default colour cycle.
const PALETTE: [RGBColor; 6] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
];

fn series_color(m: usize) -> RGBColor {
    PALETTE[m % PALETTE.len()]
}

/// Renders one line per method, x being the sample size.
///
/// # Errors
///
/// Returns [`RegsimError::DimensionMismatch`] if a series length differs
/// from the number of sample sizes, or [`RegsimError::EmptyInput`] when
/// there is nothing to draw.
///
/// # Example
///
/// ```
/// use regsim::report::{render_line_chart, ChartConfig};
/// use regsim::simulation::SimulationResults;
///
/// let mut results = SimulationResults::new();
/// results.insert("linearRegression", vec![1.2, 1.0]);
/// let svg = render_line_chart(&[100, 1000], &results, &ChartConfig::new("RSS")).unwrap();
/// assert!(svg.contains("<circle"));
/// ```
pub fn render_line_chart(
    sample_sizes: &[usize],
    results: &SimulationResults,
    config: &ChartConfig,
) -> Result<String> {
    check_series(sample_sizes, results)?;

    let xs: Vec<f64> = sample_sizes.iter().map(|&s| s as f64).collect();
    let (x_lo, x_hi) = padded(min_max(xs.iter().copied()), 0.05);
    let (y_lo, y_hi) = padded(min_max(all_scores(results)), 0.05);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (config.width, config.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(plot_error)?;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(10).x_label_area_size(40).y_label_area_size(70);
        if !config.title.is_empty() {
            builder.caption(&config.title, ("sans-serif", 20));
        }
        let mut chart = builder
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
            .map_err(plot_error)?;

        chart
            .configure_mesh()
            .x_desc(config.x_label.as_str())
            .y_desc(config.y_label.as_str())
            .x_label_formatter(&|v| format_value(*v))
            .y_label_formatter(&|v| format_value(*v))
            .draw()
            .map_err(plot_error)?;

        for (m, series) in results.iter().enumerate() {
            let color = series_color(m);
            let points: Vec<(f64, f64)> = xs
                .iter()
                .copied()
                .zip(series.scores.iter().copied())
                .filter(|(_, y)| y.is_finite())
                .collect();

            chart
                .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
                .map_err(plot_error)?
                .label(series.method.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
            chart
                .draw_series(points.iter().map(|&p| Circle::new(p, 3, color.filled())))
                .map_err(plot_error)?;
        }

        if config.legend {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK.mix(0.4))
                .draw()
                .map_err(plot_error)?;
        }
        root.present().map_err(plot_error)?;
    }
    Ok(svg)
}

/// Renders grouped bars: bar `j` of method `m` is centred at
/// `j + (m + 1) * bar_width`, and the tick for sample size `j` sits at
/// `j + (M + 1) * bar_width / 2` for `M` methods.
///
/// # Errors
///
/// Same as [`render_line_chart`]; additionally rejects a non-positive
/// `bar_width` as [`RegsimError::InvalidHyperparameter`].
pub fn render_bar_chart(
    sample_sizes: &[usize],
    results: &SimulationResults,
    config: &ChartConfig,
) -> Result<String> {
    check_series(sample_sizes, results)?;
    if !(config.bar_width > 0.0) {
        return Err(RegsimError::invalid_hyperparameter(
            "bar_width",
            config.bar_width,
            "> 0",
        ));
    }

    let bw = config.bar_width;
    let n_methods = results.len() as f64;
    let last = (sample_sizes.len() - 1) as f64;
    let (x_lo, x_hi) = (bw / 2.0 - 0.25, last + (n_methods + 0.5) * bw + 0.25);
    let (lo, hi) = min_max(all_scores(results));
    let (y_lo, y_hi) = padded((lo.min(0.0), hi.max(0.0)), 0.05);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (config.width, config.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(plot_error)?;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(10).x_label_area_size(40).y_label_area_size(70);
        if !config.title.is_empty() {
            builder.caption(&config.title, ("sans-serif", 20));
        }
        let mut chart = builder
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
            .map_err(plot_error)?;

        // Sample-size ticks are drawn by hand below; the mesh only labels y.
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(0)
            .x_desc(config.x_label.as_str())
            .y_desc(config.y_label.as_str())
            .y_label_formatter(&|v| format_value(*v))
            .draw()
            .map_err(plot_error)?;

        for (m, series) in results.iter().enumerate() {
            let color = series_color(m);
            let offset = (m as f64 + 1.0) * bw;
            chart
                .draw_series(
                    series
                        .scores
                        .iter()
                        .enumerate()
                        .filter(|(_, v)| v.is_finite())
                        .map(|(j, &v)| {
                            let center = j as f64 + offset;
                            Rectangle::new(
                                [(center - bw / 2.0, 0.0), (center + bw / 2.0, v)],
                                color.filled(),
                            )
                        }),
                )
                .map_err(plot_error)?
                .label(series.method.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 14, y + 5)], color.filled()));
        }

        let tick_style = TextStyle::from(("sans-serif", 12).into_font())
            .pos(Pos::new(HPos::Center, VPos::Top));
        chart
            .draw_series(sample_sizes.iter().enumerate().map(|(j, size)| {
                let tick = j as f64 + (n_methods + 1.0) * bw / 2.0;
                EmptyElement::at((tick, y_lo))
                    + PathElement::new(vec![(0, 0), (0, 5)], BLACK)
                    + Text::new(size.to_string(), (0, 8), tick_style.clone())
            }))
            .map_err(plot_error)?;

        if config.legend {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK.mix(0.4))
                .draw()
                .map_err(plot_error)?;
        }
        root.present().map_err(plot_error)?;
    }
    Ok(svg)
}

fn all_scores(results: &SimulationResults) -> impl Iterator<Item = f64> + '_ {
    results
        .iter()
        .flat_map(|s| s.scores.iter().copied())
        .filter(|v| v.is_finite())
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo > hi {
        (0.0, 1.0)
    } else {
        (lo, hi)
    }
}

fn padded((lo, hi): (f64, f64), fraction: f64) -> (f64, f64) {
    if hi - lo <= f64::EPSILON * hi.abs().max(1.0) {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * fraction;
    (lo - pad, hi + pad)
}

/// Axis label text: integers as-is, tiny or huge values in scientific form.
pub(super) fn format_value(v: f64) -> String {
    let a = v.abs();
    if a != 0.0 && !(0.01..1e5).contains(&a) {
        format!("{v:.2e}")
    } else if a >= 100.0 || v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.3}")
    }
}

fn plot_error(err: impl std::fmt::Display) -> RegsimError {
    RegsimError::Serialization(format!("failed to render SVG: {err}"))
}
