// src/types.rs
// Type aliases shared across the analysis pipeline

use ndarray::Array1;

/// One sampled channel of a trial (time, position or velocity).
pub type SampleSequence = Array1<f64>;

// Stacked trace plot data:
// (title, x_range, y_range, series, x_label, y_label)
pub type TracePlotData = (
    String,
    std::ops::Range<f64>,
    std::ops::Range<f64>,
    Vec<crate::plot_framework::PlotSeries>,
    String,
    String,
);

// src/types.rs
