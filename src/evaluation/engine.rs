//! Batch runner: one filter application plus scoring per descriptor.
//!
//! Inputs are validated up front (non-empty descriptor list, unique labels,
//! matching clean/noisy shapes) so a misconfigured batch fails before any
//! filter runs. With the `parallel` feature descriptors can be dispatched on
//! the rayon pool; results always come back in descriptor order.
use super::progress::{CancellationToken, FilterProgress, ProgressObserver};
use super::{FilterResult, FilterResultSet};
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::TimingBreakdown;
use crate::error::{ConfigError, EvalError};
use crate::filters::FilterDescriptor;
use crate::image::ImageU8;
use crate::metrics::{ensure_same_shape, mse};
use log::debug;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// One scored descriptor and the milliseconds it took.
type Outcome = Result<(FilterResult, f64), EvalError>;

#[derive(Clone, Copy, Debug)]
pub struct EvaluationOptions {
    /// Run descriptors concurrently. Ignored without the `parallel` feature.
    pub parallel: bool,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            parallel: cfg!(feature = "parallel"),
        }
    }
}

/// Configurable evaluation run. Holds no state between calls.
#[derive(Default)]
pub struct Evaluator<'a> {
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    options: EvaluationOptions,
    observer: Option<&'a dyn ProgressObserver>,
    cancel: Option<CancellationToken>,
}

impl<'a> Evaluator<'a> {
    pub fn new(options: EvaluationOptions) -> Self {
        Self {
            options,
            observer: None,
            cancel: None,
        }
    }

    pub fn with_observer(mut self, observer: &'a dyn ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Filter `noisy` with every descriptor and score against `clean`.
    pub fn run(
        &self,
        clean: ImageU8<'_>,
        noisy: ImageU8<'_>,
        descriptors: &[FilterDescriptor],
    ) -> Result<FilterResultSet, EvalError> {
        validate_inputs(clean, noisy, descriptors)?;
        let start = Instant::now();
        let completed = AtomicUsize::new(0);
        let total = descriptors.len();

        #[cfg(feature = "parallel")]
        let outcomes = if self.options.parallel {
            self.run_parallel(clean, noisy, descriptors, &completed)
        } else {
            self.run_sequential(clean, noisy, descriptors, &completed)
        };
        #[cfg(not(feature = "parallel"))]
        let outcomes = self.run_sequential(clean, noisy, descriptors, &completed);

        let mut results = Vec::with_capacity(total);
        let mut timing = TimingBreakdown::default();
        let mut cancelled = false;
        for outcome in outcomes {
            match outcome {
                Ok((result, ms)) => {
                    timing.push(result.label(), ms);
                    results.push(result);
                }
                Err(EvalError::Cancelled { .. }) => cancelled = true,
                Err(err) => return Err(err),
            }
        }
        if cancelled {
            return Err(EvalError::Cancelled {
                completed: completed.load(Ordering::Relaxed),
            });
        }
        timing.total_ms = elapsed_ms(start);
        debug!(
            "evaluated {} filter(s) on {}x{} in {:.2} ms",
            results.len(),
            clean.w,
            clean.h,
            timing.total_ms
        );
        Ok(FilterResultSet::with_timing(results, timing))
    }

    fn run_sequential(
        &self,
        clean: ImageU8<'_>,
        noisy: ImageU8<'_>,
        descriptors: &[FilterDescriptor],
        completed: &AtomicUsize,
    ) -> Vec<Outcome> {
        let total = descriptors.len();
        let mut out = Vec::with_capacity(total);
        for (index, descriptor) in descriptors.iter().enumerate() {
            let outcome = self.run_one(index, total, descriptor, clean, noisy, completed);
            let stop = outcome.is_err();
            out.push(outcome);
            if stop {
                break;
            }
        }
        out
    }

    #[cfg(feature = "parallel")]
    fn run_parallel(
        &self,
        clean: ImageU8<'_>,
        noisy: ImageU8<'_>,
        descriptors: &[FilterDescriptor],
        completed: &AtomicUsize,
    ) -> Vec<Outcome> {
        use rayon::prelude::*;

        let total = descriptors.len();
        descriptors
            .par_iter()
            .enumerate()
            .map(|(index, descriptor)| {
                self.run_one(index, total, descriptor, clean, noisy, completed)
            })
            .collect()
    }

    fn run_one(
        &self,
        index: usize,
        total: usize,
        descriptor: &FilterDescriptor,
        clean: ImageU8<'_>,
        noisy: ImageU8<'_>,
        completed: &AtomicUsize,
    ) -> Outcome {
        if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Err(EvalError::Cancelled {
                completed: completed.load(Ordering::Relaxed),
            });
        }
        let start = Instant::now();
        let filtered = descriptor.apply(noisy);
        let err = mse(&clean, &filtered)?;
        let result = FilterResult::new(descriptor.clone(), filtered, err);
        check_finite(&result)?;
        let ms = elapsed_ms(start);
        debug!(
            "{} ({}/{}): mse={:.4} psnr={:.4} dB in {:.2} ms",
            descriptor.label,
            index + 1,
            total,
            result.mse(),
            result.psnr(),
            ms
        );

        completed.fetch_add(1, Ordering::Relaxed);
        if let Some(observer) = self.observer {
            observer.on_filter_done(&FilterProgress {
                index,
                total,
                label: descriptor.label.clone(),
            });
        }
        Ok((result, ms))
    }
}

/// Evaluate with default options, no observer and no cancellation.
pub fn evaluate(
    clean: ImageU8<'_>,
    noisy: ImageU8<'_>,
    descriptors: &[FilterDescriptor],
) -> Result<FilterResultSet, EvalError> {
    Evaluator::default().run(clean, noisy, descriptors)
}

fn validate_inputs(
    clean: ImageU8<'_>,
    noisy: ImageU8<'_>,
    descriptors: &[FilterDescriptor],
) -> Result<(), ConfigError> {
    if descriptors.is_empty() {
        return Err(ConfigError::EmptyFilterList);
    }
    ensure_same_shape(&clean, &noisy)?;
    let mut seen = HashSet::with_capacity(descriptors.len());
    for d in descriptors {
        if !seen.insert(d.label.as_str()) {
            return Err(ConfigError::DuplicateLabel(d.label.clone()));
        }
    }
    Ok(())
}

fn check_finite(result: &FilterResult) -> Result<(), EvalError> {
    if !result.mse().is_finite() {
        return Err(EvalError::NonFinite {
            label: result.label().to_string(),
            metric: "mse",
            value: result.mse(),
        });
    }
    // +inf is the defined value for an exact reconstruction.
    if result.psnr().is_nan() || result.psnr() == f64::NEG_INFINITY {
        return Err(EvalError::NonFinite {
            label: result.label().to_string(),
            metric: "psnr",
            value: result.psnr(),
        });
    }
    Ok(())
}
