// src/data_analysis/correspondence.rs

use ndarray::{s, Array1};
use ndarray_stats::QuantileExt;

use crate::data_analysis::saccade_detection::{detect_saccades, SaccadeInterval};
use crate::data_input::trial_data::Trial;

/// One reference saccade with every detected interval the greedy matcher
/// assigned to it. Biomarker rows are emitted only when `candidates` holds
/// exactly one interval; zero (unidentified) and multiple (overidentified)
/// matches are counted elsewhere, not treated as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedSaccades {
    pub reference: SaccadeInterval,
    pub candidates: Vec<SaccadeInterval>,
}

impl MatchedSaccades {
    /// The single assigned detection, when the match is unambiguous.
    pub fn unambiguous(&self) -> Option<SaccadeInterval> {
        match self.candidates[..] {
            [only] => Some(only),
            _ => None,
        }
    }
}

/// Saccades of a velocity-magnitude trace under the trial's calibration:
/// the trial's onset threshold and its angle-keyed minimum duration.
pub fn saccades_of(trial: &Trial, velocity_magnitude: &Array1<f64>) -> Vec<SaccadeInterval> {
    detect_saccades(
        velocity_magnitude,
        trial.threshold,
        trial.min_saccade_duration(),
        trial.step,
    )
    .collect()
}

/// Greedy first-match assignment of detected intervals to reference
/// intervals.
///
/// Detected intervals are scanned in onset order; each one is assigned to
/// the first reference interval (also in onset order) that contains its
/// onset, contains its offset, or is spanned by it, and is never
/// reconsidered afterwards. The scan order is part of the contract: it
/// keeps results reproducible across runs.
pub fn assign_detections(
    reference: &[SaccadeInterval],
    detected: &[SaccadeInterval],
) -> Vec<MatchedSaccades> {
    let mut pairing: Vec<MatchedSaccades> = reference
        .iter()
        .map(|&r| MatchedSaccades { reference: r, candidates: Vec::new() })
        .collect();

    for &d in detected {
        for slot in pairing.iter_mut() {
            let r = slot.reference;
            if r.contains(d.onset) || r.contains(d.offset) || d.spans(&r) {
                slot.candidates.push(d);
                break;
            }
        }
    }
    pairing
}

/// Index of the peak of `magnitude` inside `[onset, offset)`, relative to
/// the interval's onset. `None` when the interval is empty.
pub fn peak_index(magnitude: &Array1<f64>, interval: &SaccadeInterval) -> Option<usize> {
    if interval.onset >= interval.offset {
        return None;
    }
    let window = magnitude.slice(s![interval.onset..interval.offset]);
    window.argmax().ok()
}
