// src/plot_functions/plot_method_comparison.rs

use ndarray::Array1;
use ndarray_stats::QuantileExt;
use plotters::style::RGBColor;
use std::error::Error;

use crate::constants::{
    COLOR_BASELINE_VELOCITY, COLOR_CANDIDATE_VELOCITY, COLOR_POSITION_MAIN, COLOR_TRUE_VELOCITY,
    LINE_WIDTH_PLOT,
};
use crate::data_analysis::differentiation::differentiate;
use crate::data_input::trial_data::Trial;
use crate::plot_framework::{calculate_range, draw_stacked_plot, PlotSeries};
use crate::types::TracePlotData;

fn series_of(time: &Array1<f64>, values: &Array1<f64>, label: &str, color: &RGBColor) -> PlotSeries {
    PlotSeries {
        data: time.iter().cloned().zip(values.iter().cloned()).collect(),
        label: label.to_string(),
        color: *color,
        stroke_width: LINE_WIDTH_PLOT,
    }
}

fn value_range(values: &[&Array1<f64>]) -> (f64, f64) {
    let mut low = f64::INFINITY;
    let mut high = f64::NEG_INFINITY;
    for array in values {
        if let Ok(min) = array.min() {
            low = low.min(*min);
        }
        if let Ok(max) = array.max() {
            high = high.max(*max);
        }
    }
    calculate_range(low, high)
}

/// Generates a stacked comparison figure for one trial: the recorded
/// position trace, then a baseline method and a candidate method each
/// drawn against the synthetic true velocity.
pub fn plot_method_comparison(
    trial: &Trial,
    baseline: &str,
    candidate: &str,
    root_name: &str,
) -> Result<(), Box<dyn Error>> {
    let baseline_velocity = differentiate(&trial.position, trial.step, baseline)?;
    let candidate_velocity = differentiate(&trial.position, trial.step, candidate)?;

    let output_file = format!("{root_name}_{baseline}_vs_{candidate}.png");
    let (time_low, time_high) = calculate_range(
        trial.time.min().map(|v| *v).unwrap_or(0.0),
        trial.time.max().map(|v| *v).unwrap_or(1.0),
    );

    let mut panes: Vec<Option<TracePlotData>> = Vec::with_capacity(3);

    let (pos_low, pos_high) = value_range(&[&trial.position]);
    panes.push(Some((
        "Movement signal".to_string(),
        time_low..time_high,
        pos_low..pos_high,
        vec![series_of(&trial.time, &trial.position, "Position", COLOR_POSITION_MAIN)],
        "Time (s)".to_string(),
        "Angle (deg)".to_string(),
    )));

    for (method, velocity, color) in [
        (baseline, &baseline_velocity, COLOR_BASELINE_VELOCITY),
        (candidate, &candidate_velocity, COLOR_CANDIDATE_VELOCITY),
    ] {
        let (low, high) = value_range(&[velocity, &trial.true_velocity]);
        panes.push(Some((
            format!("Differentiated with {method}"),
            time_low..time_high,
            low..high,
            vec![
                series_of(&trial.time, velocity, &format!("{method} output"), color),
                series_of(&trial.time, &trial.true_velocity, "Synthetic velocity", COLOR_TRUE_VELOCITY),
            ],
            "Time (s)".to_string(),
            "Velocity (deg/s)".to_string(),
        )));
    }

    draw_stacked_plot(&output_file, &trial.filename, panes.len(), move |pane_index| {
        panes.get_mut(pane_index).and_then(|p| p.take())
    })
}
