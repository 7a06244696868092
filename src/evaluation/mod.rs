//! Filter evaluation: run a battery of window filters over a noisy buffer and
//! score each output against the clean reference.
//!
//! ```text
//!  clean ──────────────────────────────┐
//!                                      ▼
//!  noisy ──► FilterDescriptor × N ──► mse / psnr ──► FilterResultSet
//!                                                        │
//!                                                        ▼
//!                                               EvaluationSummary
//! ```
//!
//! A `FilterResultSet` belongs to exactly one (clean, noisy) pair. The
//! summary is derived on demand and never changes the set.

mod engine;
mod progress;
mod summary;

pub use engine::{evaluate, EvaluationOptions, Evaluator};
pub use progress::{CancellationToken, ChannelObserver, FilterProgress, ProgressObserver};
pub use summary::{summarize, EvaluationSummary, MetricStats, RankedFilter};

use crate::diagnostics::TimingBreakdown;
use crate::filters::{FilterDescriptor, FilterKind, KernelSize};
use crate::image::GrayImageU8;
use crate::metrics::psnr_from_mse;
use serde::Serialize;

/// Filtered buffer plus its fidelity against the clean reference.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterResult {
    descriptor: FilterDescriptor,
    image: GrayImageU8,
    mse: f64,
    psnr: f64,
}

impl FilterResult {
    /// Attach `mse` (and the PSNR derived from it) to a filtered buffer.
    pub fn new(descriptor: FilterDescriptor, image: GrayImageU8, mse: f64) -> Self {
        Self {
            descriptor,
            image,
            mse,
            psnr: psnr_from_mse(mse),
        }
    }

    pub fn label(&self) -> &str {
        &self.descriptor.label
    }

    pub fn descriptor(&self) -> &FilterDescriptor {
        &self.descriptor
    }

    pub fn image(&self) -> &GrayImageU8 {
        &self.image
    }

    pub fn mse(&self) -> f64 {
        self.mse
    }

    /// `+inf` when the filter reproduced the clean image exactly.
    pub fn psnr(&self) -> f64 {
        self.psnr
    }

    pub fn metrics(&self) -> FilterMetrics {
        FilterMetrics {
            label: self.descriptor.label.clone(),
            kind: self.descriptor.kind,
            kernel_size: self.descriptor.kernel_size,
            mse: self.mse,
            psnr: self.psnr,
        }
    }
}

/// Serializable, image-free view of a [`FilterResult`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterMetrics {
    pub label: String,
    pub kind: FilterKind,
    pub kernel_size: KernelSize,
    pub mse: f64,
    pub psnr: f64,
}

/// Results of one evaluation, in descriptor order.
#[derive(Clone, Debug, Default)]
pub struct FilterResultSet {
    results: Vec<FilterResult>,
    timing: TimingBreakdown,
}

impl FilterResultSet {
    pub fn new(results: Vec<FilterResult>) -> Self {
        Self {
            results,
            timing: TimingBreakdown::default(),
        }
    }

    pub(crate) fn with_timing(results: Vec<FilterResult>, timing: TimingBreakdown) -> Self {
        Self { results, timing }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilterResult> {
        self.results.iter()
    }

    pub fn as_slice(&self) -> &[FilterResult] {
        &self.results
    }

    /// Result registered under `label`, if any.
    pub fn get(&self, label: &str) -> Option<&FilterResult> {
        self.results.iter().find(|r| r.label() == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.results.iter().map(FilterResult::label)
    }

    pub fn metrics(&self) -> Vec<FilterMetrics> {
        self.results.iter().map(FilterResult::metrics).collect()
    }

    /// Wall-clock time spent per filter (advisory).
    pub fn timing(&self) -> &TimingBreakdown {
        &self.timing
    }

    pub fn summarize(&self) -> Result<EvaluationSummary, crate::error::ConfigError> {
        summarize(self.as_slice())
    }
}

impl<'a> IntoIterator for &'a FilterResultSet {
    type Item = &'a FilterResult;
    type IntoIter = std::slice::Iter<'a, FilterResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
