#![doc = include_str!("../README.md")]

// Evaluation core
pub mod error;
pub mod evaluation;
pub mod filters;
pub mod image;
pub mod metrics;
pub mod noise;

// Collaborators: configuration, reporting, sessions, test scenes.
pub mod config;
pub mod diagnostics;
pub mod report;
pub mod session;
pub mod synthetic;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{ConfigError, EvalError};
pub use crate::evaluation::{
    evaluate, summarize, EvaluationOptions, EvaluationSummary, Evaluator, FilterResult,
    FilterResultSet,
};
pub use crate::filters::{default_descriptors, FilterDescriptor, FilterKind, KernelSize};
pub use crate::noise::{GaussianParams, NoiseModel, SaltPepperParams};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use denoise_eval::prelude::*;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let clean = GrayImageU8::from_fn(64, 64, |x, y| ((x ^ y) * 4) as u8);
/// let noise = NoiseModel::SaltPepper(SaltPepperParams::new(0.02, 0.02)?);
/// let noisy = noise.apply(clean.as_view(), &mut StdRng::seed_from_u64(7))?;
///
/// let results = evaluate(clean.as_view(), noisy.as_view(), &default_descriptors())?;
/// let summary = results.summarize()?;
/// println!("best={} psnr={:.2} dB", summary.best.label, summary.best.psnr);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{GrayImageU8, ImageU8, ImageView};
    pub use crate::{
        default_descriptors, evaluate, FilterDescriptor, FilterKind, KernelSize, NoiseModel,
        SaltPepperParams,
    };
}
