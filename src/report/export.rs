//! Text, JSON and CSV summaries.

use std::fmt::Write as _;

use serde::Serialize;

use super::check_series;
use crate::error::{RegsimError, Result};
use crate::simulation::{MethodSeries, SimulationResults};

#[derive(Serialize)]
struct ReportData<'a> {
    sample_sizes: &'a [usize],
    series: Vec<&'a MethodSeries>,
}

/// Aligned text table, one row per sample size, one column per method.
///
/// # Errors
///
/// Returns [`RegsimError::DimensionMismatch`] on ragged series.
pub fn render_table(sample_sizes: &[usize], results: &SimulationResults) -> Result<String> {
    check_series(sample_sizes, results)?;

    let mut header = vec!["Sample Size".to_string()];
    header.extend(results.methods().map(str::to_string));

    let rows: Vec<Vec<String>> = sample_sizes
        .iter()
        .enumerate()
        .map(|(j, size)| {
            let mut row = vec![size.to_string()];
            row.extend(results.iter().map(|s| format!("{:.6}", s.scores[j])));
            row
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|c| {
            rows.iter()
                .map(|r| r[c].len())
                .chain(std::iter::once(header[c].len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let line = |cells: &[String], out: &mut String| -> std::fmt::Result {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:>w$}"))
            .collect();
        writeln!(out, "{}", padded.join("  "))
    };

    line(&header, &mut out).map_err(table_error)?;
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    line(&rule, &mut out).map_err(table_error)?;
    for row in &rows {
        line(row, &mut out).map_err(table_error)?;
    }
    Ok(out)
}

/// Pretty JSON with `sample_sizes` and the ordered `series`.
///
/// # Errors
///
/// Returns [`RegsimError::DimensionMismatch`] on ragged series.
pub fn to_json(sample_sizes: &[usize], results: &SimulationResults) -> Result<String> {
    check_series(sample_sizes, results)?;
    let data = ReportData {
        sample_sizes,
        series: results.iter().collect(),
    };
    Ok(serde_json::to_string_pretty(&data)?)
}

/// CSV with a `sample_size` column followed by one column per method.
///
/// # Errors
///
/// Returns [`RegsimError::DimensionMismatch`] on ragged series.
pub fn to_csv(sample_sizes: &[usize], results: &SimulationResults) -> Result<String> {
    check_series(sample_sizes, results)?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut header = vec!["sample_size"];
    header.extend(results.methods());
    writer.write_record(&header).map_err(csv_error)?;

    for (j, size) in sample_sizes.iter().enumerate() {
        let mut record = vec![size.to_string()];
        record.extend(results.iter().map(|s| s.scores[j].to_string()));
        writer.write_record(&record).map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| RegsimError::Serialization(format!("failed to flush CSV: {e}")))?;
    String::from_utf8(bytes).map_err(|e| RegsimError::Serialization(e.to_string()))
}

fn csv_error(err: csv::Error) -> RegsimError {
    RegsimError::Serialization(format!("failed to write CSV: {err}"))
}

fn table_error(err: std::fmt::Error) -> RegsimError {
    RegsimError::Serialization(format!("failed to render table: {err}"))
}
