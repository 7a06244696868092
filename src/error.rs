//! Error taxonomy for the evaluation core.
//!
//! `ConfigError` covers every invalid input (kernel sizes, noise parameters,
//! descriptor lists, buffer shapes). It is raised before any pixel is touched
//! and is never retried. `EvalError` wraps it together with the two failure
//! modes that can only happen while a batch runs.
use thiserror::Error;

/// Invalid configuration or mismatched inputs.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("kernel size must be an odd positive integer, got {0}")]
    InvalidKernelSize(usize),
    #[error("{name} must lie in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("gaussian noise sigma must be finite and >= 0, got {0}")]
    InvalidSigma(f64),
    #[error("gaussian noise mean must be finite, got {0}")]
    InvalidMean(f64),
    #[error("buffer of {width}x{height} needs {expected} samples, got {actual}")]
    BufferLength {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
    #[error("shape mismatch: {left_height}x{left_width} vs {right_height}x{right_width} (height x width)")]
    ShapeMismatch {
        left_height: usize,
        left_width: usize,
        right_height: usize,
        right_width: usize,
    },
    #[error("filter descriptor list is empty")]
    EmptyFilterList,
    #[error("duplicate filter label '{0}'")]
    DuplicateLabel(String),
    #[error("filter label '{0}' does not map to a usable file name")]
    UnsafeLabel(String),
    #[error("filter labels '{first}' and '{second}' both map to file name '{stem}'")]
    StemCollision {
        stem: String,
        first: String,
        second: String,
    },
    #[error("result set is empty")]
    EmptyResultSet,
    #[error("result sets carry different filter labels (expected '{expected}', found '{found}')")]
    LabelMismatch { expected: String, found: String },
}

/// Failure of an evaluation batch.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EvalError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{metric} for filter '{label}' is not finite ({value})")]
    NonFinite {
        label: String,
        metric: &'static str,
        value: f64,
    },
    #[error("evaluation cancelled after {completed} filter(s)")]
    Cancelled { completed: usize },
}
