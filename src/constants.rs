// src/constants.rs

// Import specific colors needed
use plotters::style::colors::full_palette::{GREEN, LIGHTBLUE, ORANGE, RED};
use plotters::style::RGBColor;

// Decimation factor applied to every trial before metric extraction.
// The recordings are oversampled; extraction runs at 1/5 of the raw rate.
pub const DOWNSAMPLE_FACTOR: usize = 5;

// Velocity (deg/s) a sample must stay at or above for a triggered saccade
// window to keep expanding around the onset sample.
pub const CONTINUATION_THRESHOLD_DEG_S: f64 = 20.0;

// Minimum saccade duration (s), keyed by stimulus angle bucket.
pub const MIN_DURATION_20_DEG: f64 = 0.09;
pub const MIN_DURATION_30_DEG: f64 = 0.115;
pub const MIN_DURATION_60_DEG: f64 = 0.175;

// Stimulus angles present in the dataset.
pub const STIMULUS_ANGLES: [u32; 3] = [20, 30, 60];

// Anti-aliasing FIR length is AA_TAPS_PER_FACTOR * factor + 1 taps, so the
// transition band narrows as the decimation factor grows.
pub const AA_TAPS_PER_FACTOR: usize = 20;

// Plot dimensions.
pub const PLOT_WIDTH: u32 = 1920;
pub const PLOT_HEIGHT: u32 = 1080;

// Font sizes used by the plot framework.
pub const FONT_SIZE_MAIN_TITLE: u32 = 30;
pub const FONT_SIZE_CHART_TITLE: u32 = 20;
pub const FONT_SIZE_AXIS_LABEL: u32 = 15;
pub const FONT_SIZE_LEGEND: u32 = 15;
pub const FONT_SIZE_MESSAGE: u32 = 20;

// Stroke widths for lines
pub const LINE_WIDTH_PLOT: u32 = 1;
pub const LINE_WIDTH_LEGEND: u32 = 2;

// --- Plot Color Assignments ---
pub const COLOR_POSITION_MAIN: &RGBColor = &GREEN;
pub const COLOR_TRUE_VELOCITY: &RGBColor = &ORANGE;
pub const COLOR_BASELINE_VELOCITY: &RGBColor = &LIGHTBLUE;
pub const COLOR_CANDIDATE_VELOCITY: &RGBColor = &RED;

// src/constants.rs
