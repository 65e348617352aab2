// src/data_input/trial_data.rs

use crate::constants::{MIN_DURATION_20_DEG, MIN_DURATION_30_DEG, MIN_DURATION_60_DEG};
use crate::data_analysis::downsample::downsample_sequence;
use crate::error::{AnalysisError, Result};
use crate::types::SampleSequence;

/// Clinical status of the recorded subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Healthy,
    Affected,
}

impl Status {
    /// Decodes the single-letter class code used in trial files.
    pub fn from_code(code: &str) -> Option<Status> {
        match code.trim() {
            "S" => Some(Status::Healthy),
            "E" => Some(Status::Affected),
            _ => None,
        }
    }

    /// Numeric class value used in exported tables.
    pub fn as_value(self) -> u8 {
        match self {
            Status::Healthy => 0,
            Status::Affected => 1,
        }
    }
}

/// One recorded or synthetic eye-movement session.
///
/// The four sample sequences share a single length and sampling step.
/// A trial never changes after construction; `downsampled` builds a new
/// trial rather than touching this one.
#[derive(Debug, Clone)]
pub struct Trial {
    pub filename: String,
    /// Stimulus angle in degrees.
    pub angle: u32,
    /// Injected-noise level of the recording.
    pub noise: f64,
    /// Sampling step in seconds per sample.
    pub step: f64,
    pub status: Status,
    /// Number of reference saccades in the recording.
    pub saccades_count: usize,
    /// Saccade-detection onset threshold in deg/s.
    pub threshold: f64,
    pub time: SampleSequence,
    pub position: SampleSequence,
    pub true_velocity: SampleSequence,
    pub clean_position: SampleSequence,
}

impl Trial {
    /// Builds a trial, enforcing the equal-length invariant across the four
    /// sample sequences.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        filename: String,
        angle: u32,
        noise: f64,
        step: f64,
        status: Status,
        saccades_count: usize,
        threshold: f64,
        time: SampleSequence,
        position: SampleSequence,
        true_velocity: SampleSequence,
        clean_position: SampleSequence,
    ) -> Result<Trial> {
        let len = time.len();
        for other in [position.len(), true_velocity.len(), clean_position.len()] {
            if other != len {
                return Err(AnalysisError::LengthMismatch { left: len, right: other });
            }
        }
        Ok(Trial {
            filename,
            angle,
            noise,
            step,
            status,
            saccades_count,
            threshold,
            time,
            position,
            true_velocity,
            clean_position,
        })
    }

    /// Number of samples per sequence.
    pub fn samples(&self) -> usize {
        self.time.len()
    }

    pub fn sampling_frequency(&self) -> f64 {
        1.0 / self.step
    }

    /// Minimum saccade duration (s) for this trial's stimulus angle.
    /// Smaller angles produce shorter saccades, so the floor scales with
    /// the angle bucket.
    pub fn min_saccade_duration(&self) -> f64 {
        if self.angle <= 20 {
            MIN_DURATION_20_DEG
        } else if self.angle <= 30 {
            MIN_DURATION_30_DEG
        } else {
            MIN_DURATION_60_DEG
        }
    }

    /// Returns a new trial with every sequence decimated by `factor` and
    /// the sampling step scaled accordingly. Scalar attributes are copied
    /// unchanged; the original trial is untouched.
    pub fn downsampled(&self, factor: usize) -> Result<Trial> {
        Ok(Trial {
            filename: self.filename.clone(),
            angle: self.angle,
            noise: self.noise,
            step: self.step * factor as f64,
            status: self.status,
            saccades_count: self.saccades_count,
            threshold: self.threshold,
            time: downsample_sequence(&self.time, factor)?,
            position: downsample_sequence(&self.position, factor)?,
            true_velocity: downsample_sequence(&self.true_velocity, factor)?,
            clean_position: downsample_sequence(&self.clean_position, factor)?,
        })
    }
}
