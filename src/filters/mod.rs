//! Sliding-window smoothing filters over 8-bit intensity buffers.
//!
//! Every filter visits the square `k × k` window centred on each pixel and
//! reduces it to one output sample. Windows that run past the image border
//! replicate the nearest in-bounds row/column (coordinate clamping), the same
//! way for all four kinds so their scores are comparable.
//!
//! | kind     | reducer                                   | strategy              |
//! |----------|-------------------------------------------|-----------------------|
//! | mean     | arithmetic mean, rounded to nearest       | separable box sums    |
//! | gaussian | normalised 2-D Gaussian weights, rounded  | separable 1-D taps    |
//! | median   | middle of the sorted window               | running histogram     |
//! | mode     | most frequent value, lowest value on ties | running histogram     |
//!
//! Kernel sizes are validated by [`KernelSize::new`], so an even or zero size
//! is rejected before any pixel is read.

pub mod rank;
pub mod separable;


use crate::error::ConfigError;
use crate::image::{GrayImageU8, ImageU8};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Odd, positive window side length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct KernelSize(usize);

impl KernelSize {
    pub fn new(size: usize) -> Result<Self, ConfigError> {
        if size == 0 || size.is_multiple_of(2) {
            return Err(ConfigError::InvalidKernelSize(size));
        }
        Ok(Self(size))
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }

    /// Half-width of the window: `k / 2`.
    #[inline]
    pub fn radius(self) -> usize {
        self.0 / 2
    }

    /// Number of samples in the window (`k²`, always odd).
    #[inline]
    pub fn area(self) -> usize {
        self.0 * self.0
    }
}

impl TryFrom<usize> for KernelSize {
    type Error = ConfigError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<KernelSize> for usize {
    fn from(k: KernelSize) -> Self {
        k.0
    }
}

impl fmt::Display for KernelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Mean,
    Gaussian,
    Median,
    Mode,
}

impl FilterKind {
    pub const ALL: [FilterKind; 4] = [
        FilterKind::Mean,
        FilterKind::Gaussian,
        FilterKind::Median,
        FilterKind::Mode,
    ];

    /// Stateless filter implementing this kind.
    pub fn filter(self) -> &'static dyn WindowFilter {
        match self {
            FilterKind::Mean => &MeanFilter,
            FilterKind::Gaussian => &GaussianFilter,
            FilterKind::Median => &MedianFilter,
            FilterKind::Mode => &ModeFilter,
        }
    }

    pub fn apply(self, image: ImageU8<'_>, kernel: KernelSize) -> GrayImageU8 {
        self.filter().apply(image, kernel)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            FilterKind::Mean => "Mean",
            FilterKind::Gaussian => "Gaussian",
            FilterKind::Median => "Median",
            FilterKind::Mode => "Mode",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Common contract of the window filters: same-size output, fresh buffer.
pub trait WindowFilter: Sync {
    fn apply(&self, image: ImageU8<'_>, kernel: KernelSize) -> GrayImageU8;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MeanFilter;

#[derive(Clone, Copy, Debug, Default)]
pub struct GaussianFilter;

#[derive(Clone, Copy, Debug, Default)]
pub struct MedianFilter;

#[derive(Clone, Copy, Debug, Default)]
pub struct ModeFilter;

impl WindowFilter for MeanFilter {
    fn apply(&self, image: ImageU8<'_>, kernel: KernelSize) -> GrayImageU8 {
        separable::box_mean(image, kernel)
    }
}

impl WindowFilter for GaussianFilter {
    fn apply(&self, image: ImageU8<'_>, kernel: KernelSize) -> GrayImageU8 {
        let taps = separable::SeparableKernel::gaussian(kernel);
        separable::convolve(image, &taps)
    }
}

impl WindowFilter for MedianFilter {
    fn apply(&self, image: ImageU8<'_>, kernel: KernelSize) -> GrayImageU8 {
        rank::rank_filter(image, kernel, rank::WindowHistogram::median)
    }
}

impl WindowFilter for ModeFilter {
    fn apply(&self, image: ImageU8<'_>, kernel: KernelSize) -> GrayImageU8 {
        rank::rank_filter(image, kernel, rank::WindowHistogram::mode)
    }
}

/// A labelled filter configuration: what to run and under which name the
/// result is reported.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    pub label: String,
    pub kind: FilterKind,
    pub kernel_size: KernelSize,
}

impl FilterDescriptor {
    pub fn new(label: impl Into<String>, kind: FilterKind, kernel_size: KernelSize) -> Self {
        Self {
            label: label.into(),
            kind,
            kernel_size,
        }
    }

    /// Descriptor labelled `"<Kind> <k>x<k>"`, e.g. `"Median 3x3"`.
    pub fn labelled(kind: FilterKind, kernel_size: KernelSize) -> Self {
        Self::new(format!("{kind} {kernel_size}"), kind, kernel_size)
    }

    pub fn apply(&self, image: ImageU8<'_>) -> GrayImageU8 {
        self.kind.apply(image, self.kernel_size)
    }
}

/// The eight-entry battery: every kind at 3×3 and 7×7, kind-major.
pub fn default_descriptors() -> Vec<FilterDescriptor> {
    const SIZES: [KernelSize; 2] = [KernelSize(3), KernelSize(7)];
    FilterKind::ALL
        .iter()
        .flat_map(|&kind| {
            SIZES
                .iter()
                .map(move |&size| FilterDescriptor::labelled(kind, size))
        })
        .collect()
}

/// Clamp a possibly out-of-range coordinate into `[0, upper)`.
#[inline]
pub(crate) fn clamp_index(idx: isize, upper: usize) -> usize {
    if upper == 0 {
        return 0;
    }
    if idx < 0 {
        0
    } else if (idx as usize) >= upper {
        upper - 1
    } else {
        idx as usize
    }
}
