// src/export.rs

use csv::Writer;
use std::error::Error;
use std::path::Path;

use crate::data_analysis::metrics::{ExactSaccade, Metric, MetricRow};

/// Writes the rows carrying `metric` into one CSV table. The column order
/// is fixed by `MetricRow::columns` and must stay verbatim for downstream
/// statistics and plots to remain valid.
pub fn write_metric_table(
    path: &Path,
    metric: Metric,
    rows: &[MetricRow],
) -> Result<usize, Box<dyn Error>> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(MetricRow::columns(metric))?;

    let mut written = 0;
    for row in rows.iter().filter(|r| r.metric == metric) {
        writer.write_record(row.record())?;
        written += 1;
    }
    writer.flush()?;
    println!("  {} rows written to '{}'", written, path.display());
    Ok(written)
}

/// Writes the ground-truth saccade statistics table.
pub fn write_exact_saccades(path: &Path, rows: &[ExactSaccade]) -> Result<(), Box<dyn Error>> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(["Status", "Angle", "Noise", "Duration", "PeakVelocity"])?;
    for row in rows {
        writer.write_record([
            row.status.as_value().to_string(),
            row.angle.to_string(),
            row.noise.to_string(),
            row.duration.to_string(),
            row.peak_velocity.to_string(),
        ])?;
    }
    writer.flush()?;
    println!("  {} rows written to '{}'", rows.len(), path.display());
    Ok(())
}
