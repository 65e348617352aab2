// src/data_analysis/metrics.rs

use ndarray::{s, Array1};
use ndarray_stats::QuantileExt;

use crate::data_analysis::correspondence::{assign_detections, peak_index, saccades_of};
use crate::data_analysis::differentiation::{differentiate_with, DiffMethod, METHODS};
use crate::data_analysis::saccade_detection::SaccadeInterval;
use crate::data_input::trial_data::{Status, Trial};
use crate::error::{AnalysisError, Result};

/// Kind of measurement a row carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Mse,
    DetectedSaccades,
    PeakVelocity,
    Duration,
    Latency,
}

impl Metric {
    /// Column header used for the value field in exported tables.
    pub fn column_name(self) -> &'static str {
        match self {
            Metric::Mse => "MSE",
            Metric::DetectedSaccades => "DetectedSaccades",
            Metric::PeakVelocity => "PeakVelocity",
            Metric::Duration => "Duration",
            Metric::Latency => "Latency",
        }
    }
}

/// One measurement produced for a (trial, method, metric) combination.
/// Rows are flat values; downstream table builders must keep the `columns`
/// field order verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub filename: String,
    pub status: Status,
    pub noise: f64,
    pub angle: u32,
    pub method: &'static str,
    pub metric: Metric,
    pub value: f64,
}

impl MetricRow {
    /// Header row for a table holding `metric` rows.
    pub fn columns(metric: Metric) -> [&'static str; 6] {
        ["Filename", "Status", "Noise", "Angle", "Method", metric.column_name()]
    }

    /// Field values in `columns` order.
    pub fn record(&self) -> [String; 6] {
        [
            self.filename.clone(),
            self.status.as_value().to_string(),
            self.noise.to_string(),
            self.angle.to_string(),
            self.method.to_string(),
            self.value.to_string(),
        ]
    }
}

/// Duration and peak velocity of one reference saccade, taken from the
/// true velocity trace.
#[derive(Debug, Clone, PartialEq)]
pub struct ExactSaccade {
    pub status: Status,
    pub angle: u32,
    pub noise: f64,
    pub duration: f64,
    pub peak_velocity: f64,
}

/// Mean squared error between a true and an estimated velocity trace.
pub fn pointwise_error(real: &Array1<f64>, approximation: &Array1<f64>) -> Result<f64> {
    if real.len() != approximation.len() {
        return Err(AnalysisError::LengthMismatch {
            left: real.len(),
            right: approximation.len(),
        });
    }
    let squared = (real - approximation).mapv(|d| d * d);
    Ok(squared.mean().unwrap_or(f64::NAN))
}

fn trial_row(trial: &Trial, method: &'static str, metric: Metric, value: f64) -> MetricRow {
    MetricRow {
        filename: trial.filename.clone(),
        status: trial.status,
        noise: trial.noise,
        angle: trial.angle,
        method,
        metric,
        value,
    }
}

fn candidate_methods() -> impl Iterator<Item = &'static DiffMethod> {
    METHODS.iter().filter(|m| !m.is_baseline())
}

/// One MSE row per catalog method, baselines included.
pub fn mse_rows(trial: &Trial) -> Result<Vec<MetricRow>> {
    let mut rows = Vec::with_capacity(METHODS.len());
    for method in METHODS.iter() {
        let approximation = differentiate_with(&trial.position, trial.step, method)?;
        let value = pointwise_error(&trial.true_velocity, &approximation)?;
        rows.push(trial_row(trial, method.name, Metric::Mse, value));
    }
    Ok(rows)
}

/// Signed detection-count delta: positive when a method finds more
/// saccades than the reference count, negative when it misses some.
fn count_row(trial: &Trial, method: &'static str, detected: usize) -> MetricRow {
    let value = detected as f64 - trial.saccades_count as f64;
    trial_row(trial, method, Metric::DetectedSaccades, value)
}

/// One DetectedSaccades row per candidate method.
pub fn detected_saccade_rows(trial: &Trial) -> Result<Vec<MetricRow>> {
    let mut rows = Vec::new();
    for method in candidate_methods() {
        let estimated = differentiate_with(&trial.position, trial.step, method)?;
        let magnitude = estimated.mapv(f64::abs);
        let detected = saccades_of(trial, &magnitude).len();
        rows.push(count_row(trial, method.name, detected));
    }
    Ok(rows)
}

/// Peak-velocity error rows: one per (candidate method, reference saccade).
///
/// The error is read at the index where the true velocity magnitude peaks
/// inside the reference window, so it measures amplitude estimation alone,
/// independent of how well the method's own detection lines up in time.
pub fn peak_velocity_rows(trial: &Trial) -> Result<Vec<MetricRow>> {
    let true_magnitude = trial.true_velocity.mapv(f64::abs);
    let reference = saccades_of(trial, &true_magnitude);

    let mut rows = Vec::new();
    for method in candidate_methods() {
        let estimated = differentiate_with(&trial.position, trial.step, method)?;
        let approx_magnitude = estimated.mapv(f64::abs);
        peak_rows_for(trial, method.name, &true_magnitude, &approx_magnitude, &reference, &mut rows);
    }
    Ok(rows)
}

fn peak_rows_for(
    trial: &Trial,
    method: &'static str,
    true_magnitude: &Array1<f64>,
    approx_magnitude: &Array1<f64>,
    reference: &[SaccadeInterval],
    rows: &mut Vec<MetricRow>,
) {
    for r in reference {
        if let Some(relative) = peak_index(true_magnitude, r) {
            let idx = r.onset + relative;
            let value = approx_magnitude[idx] - true_magnitude[idx];
            rows.push(trial_row(trial, method, Metric::PeakVelocity, value));
        }
    }
}

/// Duration and latency error rows for every unambiguously matched
/// reference saccade, per candidate method. References matched by zero or
/// by several detections contribute nothing here.
pub fn timing_rows(trial: &Trial) -> Result<Vec<MetricRow>> {
    let true_magnitude = trial.true_velocity.mapv(f64::abs);
    let reference = saccades_of(trial, &true_magnitude);

    let mut rows = Vec::new();
    for method in candidate_methods() {
        let estimated = differentiate_with(&trial.position, trial.step, method)?;
        let approx_magnitude = estimated.mapv(f64::abs);
        let detected = saccades_of(trial, &approx_magnitude);
        timing_rows_for(trial, method.name, &reference, &detected, &mut rows);
    }
    Ok(rows)
}

fn timing_rows_for(
    trial: &Trial,
    method: &'static str,
    reference: &[SaccadeInterval],
    detected: &[SaccadeInterval],
    rows: &mut Vec<MetricRow>,
) {
    for slot in assign_detections(reference, detected) {
        if let Some(found) = slot.unambiguous() {
            let r = slot.reference;
            let duration_error = found.duration(trial.step) - r.duration(trial.step);
            let latency = (found.onset as f64 - r.onset as f64) * trial.step;
            rows.push(trial_row(trial, method, Metric::Duration, duration_error));
            rows.push(trial_row(trial, method, Metric::Latency, latency));
        }
    }
}

/// Ground-truth saccade statistics of one trial: the duration and peak
/// velocity of every reference saccade in the true velocity trace.
pub fn exact_saccade_stats(trial: &Trial) -> Vec<ExactSaccade> {
    let magnitude = trial.true_velocity.mapv(f64::abs);
    saccades_of(trial, &magnitude)
        .into_iter()
        .filter(|r| r.onset < r.offset)
        .map(|r| {
            let window = magnitude.slice(s![r.onset..r.offset]);
            let peak = window.max().map(|v| *v).unwrap_or(0.0);
            ExactSaccade {
                status: trial.status,
                angle: trial.angle,
                noise: trial.noise,
                duration: r.duration(trial.step),
                peak_velocity: peak,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::Array1;

    fn bare_trial(n: usize, step: f64) -> Trial {
        Trial::new(
            "unit".to_string(),
            20,
            0.5,
            step,
            Status::Affected,
            5,
            30.0,
            Array1::zeros(n),
            Array1::zeros(n),
            Array1::zeros(n),
            Array1::zeros(n),
        )
        .unwrap()
    }

    #[test]
    fn test_pointwise_error_mean_of_squares() {
        let real = Array1::from(vec![1.0, 2.0, 3.0, 4.0]);
        let approx = Array1::from(vec![1.0, 2.0, 3.0, 6.0]);
        let value = pointwise_error(&real, &approx).unwrap();
        assert_abs_diff_eq!(value, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pointwise_error_rejects_unequal_lengths() {
        let real = Array1::from(vec![1.0, 2.0]);
        let approx = Array1::from(vec![1.0]);
        let err = pointwise_error(&real, &approx).unwrap_err();
        assert_eq!(err, AnalysisError::LengthMismatch { left: 2, right: 1 });
    }

    #[test]
    fn test_count_row_signed_delta() {
        let trial = bare_trial(16, 0.005);
        let row = count_row(&trial, "sl7", 7);
        assert_eq!(row.metric, Metric::DetectedSaccades);
        assert_abs_diff_eq!(row.value, 2.0, epsilon = 0.0);
        let row = count_row(&trial, "sl7", 3);
        assert_abs_diff_eq!(row.value, -2.0, epsilon = 0.0);
    }

    #[test]
    fn test_timing_rows_for_single_match() {
        let step = 0.005;
        let trial = bare_trial(16, step);
        let reference = [SaccadeInterval { onset: 100, offset: 140 }];
        let detected = [SaccadeInterval { onset: 105, offset: 130 }];
        let mut rows = Vec::new();
        timing_rows_for(&trial, "l9", &reference, &detected, &mut rows);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].metric, Metric::Duration);
        assert_abs_diff_eq!(rows[0].value, 25.0 * step - 40.0 * step, epsilon = 1e-12);
        assert_eq!(rows[1].metric, Metric::Latency);
        assert_abs_diff_eq!(rows[1].value, 5.0 * step, epsilon = 1e-12);
    }

    #[test]
    fn test_timing_rows_for_ambiguous_match_emits_nothing() {
        let trial = bare_trial(16, 0.005);
        let reference = [SaccadeInterval { onset: 100, offset: 140 }];
        let detected = [
            SaccadeInterval { onset: 95, offset: 110 },
            SaccadeInterval { onset: 120, offset: 150 },
        ];
        let mut rows = Vec::new();
        timing_rows_for(&trial, "l9", &reference, &detected, &mut rows);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_timing_rows_for_unmatched_reference_emits_nothing() {
        let trial = bare_trial(16, 0.005);
        let reference = [SaccadeInterval { onset: 100, offset: 140 }];
        let mut rows = Vec::new();
        timing_rows_for(&trial, "l9", &reference, &[], &mut rows);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_peak_rows_read_the_reference_peak_index() {
        let trial = bare_trial(16, 0.005);
        let mut true_values = vec![0.0; 200];
        true_values[117] = 250.0;
        let mut approx_values = vec![0.0; 200];
        approx_values[117] = 240.0;
        let true_magnitude = Array1::from(true_values);
        let approx_magnitude = Array1::from(approx_values);
        let reference = [SaccadeInterval { onset: 100, offset: 140 }];

        let mut rows = Vec::new();
        peak_rows_for(&trial, "snr7", &true_magnitude, &approx_magnitude, &reference, &mut rows);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].metric, Metric::PeakVelocity);
        assert_abs_diff_eq!(rows[0].value, -10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_row_record_order_is_fixed() {
        let trial = bare_trial(16, 0.005);
        let row = trial_row(&trial, "l5", Metric::Mse, 2.5);
        assert_eq!(
            MetricRow::columns(Metric::Mse),
            ["Filename", "Status", "Noise", "Angle", "Method", "MSE"]
        );
        assert_eq!(
            row.record(),
            [
                "unit".to_string(),
                "1".to_string(),
                "0.5".to_string(),
                "20".to_string(),
                "l5".to_string(),
                "2.5".to_string(),
            ]
        );
    }

    #[test]
    fn test_candidate_methods_exclude_baselines() {
        let names: Vec<&str> = candidate_methods().map(|m| m.name).collect();
        assert_eq!(names.len(), 12);
        assert!(!names.iter().any(|n| n.starts_with("cd")));
    }
}
