// src/error.rs

use std::fmt;

/// Error types for the signal-analysis core.
///
/// Every variant is raised synchronously at the violated precondition and
/// propagates to the caller; the core never retries or suppresses them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Method name not present in the differentiation catalog
    InvalidMethod(String),
    /// Input array shorter than the method's filter window
    InsufficientSamples { len: usize, window: usize },
    /// Downsampling factor must be a positive integer
    InvalidFactor(usize),
    /// Arrays passed together must share one length
    LengthMismatch { left: usize, right: usize },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidMethod(name) => {
                write!(f, "Unknown differentiation method: '{}'", name)
            }
            AnalysisError::InsufficientSamples { len, window } => {
                write!(
                    f,
                    "Insufficient samples: {} points. Need at least {} points for this filter window",
                    len, window
                )
            }
            AnalysisError::InvalidFactor(factor) => {
                write!(f, "Invalid downsampling factor: {}. Factor must be at least 1", factor)
            }
            AnalysisError::LengthMismatch { left, right } => {
                write!(f, "Array length mismatch: {} vs {}", left, right)
            }
        }
    }
}

impl std::error::Error for AnalysisError {}

/// Result type for core analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
