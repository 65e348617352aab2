// src/data_analysis/downsample.rs

use ndarray::Array1;

use crate::constants::AA_TAPS_PER_FACTOR;
use crate::error::{AnalysisError, Result};

/// Decimates `data` by `factor` after zero-phase anti-aliasing filtering.
///
/// The low-pass stage is a symmetric Hamming-windowed sinc FIR with cutoff
/// at the post-decimation Nyquist frequency, applied with mirrored edges;
/// the symmetric kernel keeps the output free of phase delay. The same
/// procedure runs on every sequence of a trial, so sample `i` of any output
/// sequence corresponds to input sample `i * factor` in all of them.
///
/// Output length is `ceil(len / factor)`. A factor of 1 is a no-op clone.
pub fn downsample_sequence(data: &Array1<f64>, factor: usize) -> Result<Array1<f64>> {
    if factor == 0 {
        return Err(AnalysisError::InvalidFactor(factor));
    }
    if factor == 1 || data.is_empty() {
        return Ok(data.clone());
    }

    let kernel = low_pass_kernel(factor);
    let filtered = convolve_mirrored(data, &kernel);

    let out_len = (data.len() + factor - 1) / factor;
    let mut out = Array1::<f64>::zeros(out_len);
    for i in 0..out_len {
        out[i] = filtered[i * factor];
    }
    Ok(out)
}

/// Hamming-windowed sinc low-pass, `AA_TAPS_PER_FACTOR * factor + 1` taps,
/// normalized to unit DC gain. Cutoff sits at `0.5 / factor` cycles per
/// input sample, i.e. the Nyquist frequency of the decimated signal.
fn low_pass_kernel(factor: usize) -> Vec<f64> {
    let taps = AA_TAPS_PER_FACTOR * factor + 1;
    let half = (taps / 2) as isize;
    let cutoff = 0.5 / factor as f64;

    let mut kernel = Vec::with_capacity(taps);
    let mut sum = 0.0;
    for m in -half..=half {
        let sinc = if m == 0 {
            2.0 * cutoff
        } else {
            let x = std::f64::consts::PI * m as f64;
            (2.0 * cutoff * x).sin() / x
        };
        let window = 0.54
            + 0.46 * (2.0 * std::f64::consts::PI * m as f64 / (taps - 1) as f64).cos();
        let tap = sinc * window;
        sum += tap;
        kernel.push(tap);
    }
    for tap in kernel.iter_mut() {
        *tap /= sum;
    }
    kernel
}

/// Same-length convolution with the signal mirrored about its end samples.
fn convolve_mirrored(data: &Array1<f64>, kernel: &[f64]) -> Array1<f64> {
    let n = data.len();
    let half = (kernel.len() / 2) as isize;
    let mut out = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut acc = 0.0;
        for (j, &w) in kernel.iter().enumerate() {
            let idx = i as isize + j as isize - half;
            acc += w * data[folded_index(n, idx)];
        }
        out[i] = acc;
    }
    out
}

/// Index reflection that stays valid for kernels wider than the signal:
/// the index is folded back and forth between the end samples until it
/// lands in range.
fn folded_index(n: usize, idx: isize) -> usize {
    let last = n as isize - 1;
    if last == 0 {
        return 0;
    }
    let period = 2 * last;
    let mut m = idx.rem_euclid(period);
    if m > last {
        m = period - m;
    }
    m as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_zero_factor_is_rejected() {
        let data = Array1::from(vec![1.0, 2.0, 3.0]);
        let err = downsample_sequence(&data, 0).unwrap_err();
        assert_eq!(err, AnalysisError::InvalidFactor(0));
    }

    #[test]
    fn test_factor_one_is_a_noop() {
        let data = Array1::from(vec![1.0, -2.0, 3.5, 0.25]);
        let out = downsample_sequence(&data, 1).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_output_length_rounds_up() {
        let data = Array1::from_iter((0..103).map(|i| i as f64));
        let out = downsample_sequence(&data, 5).unwrap();
        assert_eq!(out.len(), 21);
    }

    #[test]
    fn test_constant_signal_passes_through() {
        // Unit DC gain: a constant trace must survive filtering exactly.
        let data = Array1::from_elem(200, 4.25);
        let out = downsample_sequence(&data, 5).unwrap();
        for &v in out.iter() {
            assert_abs_diff_eq!(v, 4.25, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_slow_component_survives_decimation() {
        // A sine far below the new Nyquist should pass nearly untouched
        // away from the edges.
        let n = 500;
        let data = Array1::from_iter(
            (0..n).map(|i| (2.0 * std::f64::consts::PI * i as f64 / 250.0).sin()),
        );
        let out = downsample_sequence(&data, 5).unwrap();
        for i in 30..(out.len() - 30) {
            let expected = (2.0 * std::f64::consts::PI * (i * 5) as f64 / 250.0).sin();
            assert_abs_diff_eq!(out[i], expected, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_kernel_is_symmetric() {
        let kernel = low_pass_kernel(5);
        let len = kernel.len();
        assert_eq!(len % 2, 1);
        for j in 0..len / 2 {
            assert_abs_diff_eq!(kernel[j], kernel[len - 1 - j], epsilon = 1e-15);
        }
    }
}
