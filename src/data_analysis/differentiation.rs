// src/data_analysis/differentiation.rs

use ndarray::Array1;

use crate::error::{AnalysisError, Result};

/// Filter family a differentiation method belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodFamily {
    /// Plain central differences. MSE baselines only; they are never
    /// candidates for saccade biomarker extraction.
    CentralDifference,
    /// Lanczos low-noise differentiators.
    Lanczos,
    /// Super Lanczos differentiators (fourth-order accurate).
    SuperLanczos,
    /// Smooth noise-robust differentiators.
    NoiseRobust,
}

/// One entry of the differentiation catalog.
///
/// Every method is an antisymmetric FIR kernel: the velocity estimate at
/// sample `i` is `sum_j weights[j-1] * (y[i+j] - y[i-j]) / (divisor * h)`,
/// where `h` is the sampling step in seconds.
#[derive(Debug)]
pub struct DiffMethod {
    pub name: &'static str,
    pub family: MethodFamily,
    /// Antisymmetric weights for offsets 1..=half_width.
    pub weights: &'static [f64],
    pub divisor: f64,
}

impl DiffMethod {
    /// Window half-width; the full kernel spans `2 * half_width + 1` samples.
    pub fn half_width(&self) -> usize {
        self.weights.len()
    }

    /// Full kernel width in samples.
    pub fn window(&self) -> usize {
        2 * self.half_width() + 1
    }

    /// Baseline methods feed the MSE comparison only and are excluded from
    /// saccade detection and biomarker extraction.
    pub fn is_baseline(&self) -> bool {
        self.family == MethodFamily::CentralDifference
    }
}

/// The fixed differentiation method catalog. Read-only, initialized at
/// compile time; the method set never changes at runtime.
pub static METHODS: [DiffMethod; 16] = [
    DiffMethod { name: "cd3", family: MethodFamily::CentralDifference, weights: &[1.0], divisor: 2.0 },
    DiffMethod { name: "cd5", family: MethodFamily::CentralDifference, weights: &[8.0, -1.0], divisor: 12.0 },
    DiffMethod { name: "cd7", family: MethodFamily::CentralDifference, weights: &[45.0, -9.0, 1.0], divisor: 60.0 },
    DiffMethod { name: "cd9", family: MethodFamily::CentralDifference, weights: &[672.0, -168.0, 32.0, -3.0], divisor: 840.0 },
    DiffMethod { name: "l5", family: MethodFamily::Lanczos, weights: &[1.0, 2.0], divisor: 10.0 },
    DiffMethod { name: "l7", family: MethodFamily::Lanczos, weights: &[1.0, 2.0, 3.0], divisor: 28.0 },
    DiffMethod { name: "l9", family: MethodFamily::Lanczos, weights: &[1.0, 2.0, 3.0, 4.0], divisor: 60.0 },
    DiffMethod { name: "l11", family: MethodFamily::Lanczos, weights: &[1.0, 2.0, 3.0, 4.0, 5.0], divisor: 110.0 },
    DiffMethod { name: "l13", family: MethodFamily::Lanczos, weights: &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], divisor: 182.0 },
    DiffMethod { name: "sl7", family: MethodFamily::SuperLanczos, weights: &[58.0, 67.0, -22.0], divisor: 252.0 },
    DiffMethod { name: "sl9", family: MethodFamily::SuperLanczos, weights: &[126.0, 193.0, 142.0, -86.0], divisor: 1188.0 },
    DiffMethod { name: "sl11", family: MethodFamily::SuperLanczos, weights: &[296.0, 503.0, 532.0, 294.0, -300.0], divisor: 5148.0 },
    DiffMethod { name: "snr5", family: MethodFamily::NoiseRobust, weights: &[2.0, 1.0], divisor: 8.0 },
    DiffMethod { name: "snr7", family: MethodFamily::NoiseRobust, weights: &[5.0, 4.0, 1.0], divisor: 32.0 },
    DiffMethod { name: "snr9", family: MethodFamily::NoiseRobust, weights: &[14.0, 14.0, 6.0, 1.0], divisor: 128.0 },
    DiffMethod { name: "snr11", family: MethodFamily::NoiseRobust, weights: &[42.0, 48.0, 27.0, 8.0, 1.0], divisor: 512.0 },
];

/// Looks up a catalog entry by name.
pub fn find_method(name: &str) -> Option<&'static DiffMethod> {
    METHODS.iter().find(|m| m.name == name)
}

/// Estimates velocity from an angular-position trace using the named
/// catalog method.
///
/// The output always has the same length as `position`. The first and last
/// `half_width` samples, where the full kernel does not fit, are computed
/// against a mirrored extension of the signal (see `mirrored_index`); the
/// rule is identical for every method so the resulting traces stay directly
/// comparable.
pub fn differentiate(position: &Array1<f64>, step: f64, method_name: &str) -> Result<Array1<f64>> {
    let method = find_method(method_name)
        .ok_or_else(|| AnalysisError::InvalidMethod(method_name.to_string()))?;
    differentiate_with(position, step, method)
}

/// Applies one catalog entry directly; used by the batch row producers that
/// iterate the catalog.
pub fn differentiate_with(
    position: &Array1<f64>,
    step: f64,
    method: &DiffMethod,
) -> Result<Array1<f64>> {
    let n = position.len();
    if n < method.window() {
        return Err(AnalysisError::InsufficientSamples {
            len: n,
            window: method.window(),
        });
    }

    let scale = 1.0 / (method.divisor * step);
    let mut velocity = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut acc = 0.0;
        for (j, &w) in method.weights.iter().enumerate() {
            let offset = (j + 1) as isize;
            let ahead = position[mirrored_index(n, i as isize + offset)];
            let behind = position[mirrored_index(n, i as isize - offset)];
            acc += w * (ahead - behind);
        }
        velocity[i] = acc * scale;
    }
    Ok(velocity)
}

/// Reflects an out-of-range sample index about the nearest end sample
/// (`-j` maps to `j`, `n-1+j` maps to `n-1-j`). The window check in
/// `differentiate_with` guarantees a single reflection lands in range.
fn mirrored_index(n: usize, idx: isize) -> usize {
    let last = n as isize - 1;
    let reflected = if idx < 0 {
        -idx
    } else if idx > last {
        2 * last - idx
    } else {
        idx
    };
    reflected as usize
}
