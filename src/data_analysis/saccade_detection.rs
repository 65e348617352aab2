// src/data_analysis/saccade_detection.rs

use ndarray::Array1;

use crate::constants::CONTINUATION_THRESHOLD_DEG_S;

/// Sample-index extent of one detected or reference saccade.
///
/// Durations are measured over `offset - onset` samples; peak scans use the
/// `[onset, offset)` slice of the underlying trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaccadeInterval {
    pub onset: usize,
    pub offset: usize,
}

impl SaccadeInterval {
    /// Interval duration in seconds for the given sampling step.
    pub fn duration(&self, step: f64) -> f64 {
        (self.offset - self.onset) as f64 * step
    }

    /// True when `index` falls inside the closed `[onset, offset]` span.
    pub fn contains(&self, index: usize) -> bool {
        self.onset <= index && index <= self.offset
    }

    /// True when this interval covers the whole of `other`.
    pub fn spans(&self, other: &SaccadeInterval) -> bool {
        self.onset <= other.onset && self.offset >= other.offset
    }
}

/// Lazy left-to-right saccade scan over a velocity-magnitude trace.
///
/// A sample strictly above the primary threshold opens a candidate window,
/// which then expands in both directions while neighbouring samples stay at
/// or above the continuation threshold. Candidates shorter than the minimum
/// duration are dropped, but their window is consumed either way: the scan
/// resumes after the candidate's offset, so emitted intervals strictly
/// increase in onset and never overlap.
///
/// The scan is restartable: calling `detect_saccades` again re-scans the
/// trace from the start.
pub struct SaccadeScan<'a> {
    velocity: &'a Array1<f64>,
    primary_threshold: f64,
    continuation_threshold: f64,
    min_duration: f64,
    step: f64,
    cursor: usize,
}

impl<'a> SaccadeScan<'a> {
    /// Overrides the continuation threshold (deg/s) used to expand a
    /// triggered window.
    pub fn with_continuation_threshold(mut self, threshold: f64) -> Self {
        self.continuation_threshold = threshold;
        self
    }
}

/// Scans `velocity_magnitude` for saccades: excursions strictly above
/// `primary_threshold`, expanded while neighbours stay at or above the
/// default continuation threshold, lasting at least `min_duration` seconds.
pub fn detect_saccades<'a>(
    velocity_magnitude: &'a Array1<f64>,
    primary_threshold: f64,
    min_duration: f64,
    step: f64,
) -> SaccadeScan<'a> {
    SaccadeScan {
        velocity: velocity_magnitude,
        primary_threshold,
        continuation_threshold: CONTINUATION_THRESHOLD_DEG_S,
        min_duration,
        step,
        cursor: 0,
    }
}

impl Iterator for SaccadeScan<'_> {
    type Item = SaccadeInterval;

    fn next(&mut self) -> Option<SaccadeInterval> {
        let v = self.velocity;
        if v.len() < 2 {
            return None;
        }
        let last = v.len() - 1;

        while self.cursor < last {
            let i = self.cursor;
            if v[i] > self.primary_threshold {
                let mut onset = i;
                while onset > 0 && v[onset - 1] >= self.continuation_threshold {
                    onset -= 1;
                }
                let mut offset = i;
                while offset < last && v[offset + 1] >= self.continuation_threshold {
                    offset += 1;
                }

                // Accepted and rejected candidates both consume their window.
                self.cursor = offset + 1;

                let interval = SaccadeInterval { onset, offset };
                if interval.duration(self.step) >= self.min_duration {
                    return Some(interval);
                }
            } else {
                self.cursor += 1;
            }
        }
        None
    }
}
