//! Separable linear filters: box mean and Gaussian.
//!
//! Both run as a horizontal pass followed by a vertical pass with border
//! clamping. The box mean keeps integer running sums, so each output costs
//! O(1) regardless of `k` and the rounding is exact. The Gaussian filters
//! with normalised f32 taps and keeps the horizontal pass in an `ImageF32`
//! so only the final result is rounded.
use super::{clamp_index, KernelSize};
use crate::image::{GrayImageU8, ImageF32, ImageU8, ImageView, ImageViewMut};

/// Gaussian standard deviation derived from the window size:
/// `0.3 * ((k - 1) * 0.5 - 1) + 0.8`.
pub fn gaussian_sigma(kernel: KernelSize) -> f64 {
    0.3 * ((kernel.get() as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Symmetric 1-D taps whose outer product is the 2-D kernel.
#[derive(Clone, Debug, PartialEq)]
pub struct SeparableKernel {
    taps: Vec<f32>,
}

impl SeparableKernel {
    /// Sampled Gaussian of [`gaussian_sigma`], normalised to sum to 1. The
    /// 2-D weights (outer product) therefore also sum to 1.
    pub fn gaussian(kernel: KernelSize) -> Self {
        let sigma = gaussian_sigma(kernel);
        let radius = kernel.radius() as f64;
        let denom = 2.0 * sigma * sigma;
        let raw: Vec<f64> = (0..kernel.get())
            .map(|i| {
                let d = i as f64 - radius;
                (-(d * d) / denom).exp()
            })
            .collect();
        let sum: f64 = raw.iter().sum();
        Self {
            taps: raw.iter().map(|&v| (v / sum) as f32).collect(),
        }
    }

    #[inline]
    pub fn taps(&self) -> &[f32] {
        &self.taps
    }

    #[inline]
    pub fn radius(&self) -> usize {
        self.taps.len() / 2
    }
}

/// Convolve with `kernel` horizontally then vertically, rounding to the
/// nearest sample at the end.
pub fn convolve(image: ImageU8<'_>, kernel: &SeparableKernel) -> GrayImageU8 {
    let (w, h) = (image.w, image.h);
    if w == 0 || h == 0 {
        return GrayImageU8::filled(w, h, 0);
    }
    let taps = kernel.taps();
    let radius = kernel.radius() as isize;

    let mut horiz = ImageF32::new(w, h);
    for y in 0..h {
        let src = image.row(y);
        let dst = horiz.row_mut(y);
        for (x, dst_px) in dst.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, &tap) in taps.iter().enumerate() {
                let sx = clamp_index(x as isize + k as isize - radius, w);
                acc += tap * src[sx] as f32;
            }
            *dst_px = acc;
        }
    }

    let mut out = ImageF32::new(w, h);
    for y in 0..h {
        let dst = out.row_mut(y);
        for (k, &tap) in taps.iter().enumerate() {
            let sy = clamp_index(y as isize + k as isize - radius, h);
            let src = horiz.row(sy);
            for (d, &s) in dst.iter_mut().zip(src) {
                *d += tap * s;
            }
        }
    }
    out.to_u8_rounded()
}

/// Arithmetic mean over the clamped `k × k` window, rounded to nearest.
pub fn box_mean(image: ImageU8<'_>, kernel: KernelSize) -> GrayImageU8 {
    let (w, h) = (image.w, image.h);
    let mut out = GrayImageU8::filled(w, h, 0);
    if w == 0 || h == 0 {
        return out;
    }
    let r = kernel.radius() as isize;

    // Horizontal running sums, one row of window sums per input row.
    let mut row_sums = vec![0u64; w * h];
    for y in 0..h {
        let src = image.row(y);
        let dst = &mut row_sums[y * w..(y + 1) * w];
        let mut acc: u64 = (-r..=r).map(|dx| src[clamp_index(dx, w)] as u64).sum();
        dst[0] = acc;
        for (x, sum) in dst.iter_mut().enumerate().skip(1) {
            let xi = x as isize;
            acc -= src[clamp_index(xi - 1 - r, w)] as u64;
            acc += src[clamp_index(xi + r, w)] as u64;
            *sum = acc;
        }
    }

    let area = kernel.area() as u64;
    let half = area / 2;
    let mut col_acc = vec![0u64; w];
    for dy in -r..=r {
        let sy = clamp_index(dy, h);
        add_row(&mut col_acc, &row_sums[sy * w..(sy + 1) * w]);
    }
    for y in 0..h {
        if y > 0 {
            let yi = y as isize;
            let leaving = clamp_index(yi - 1 - r, h);
            let entering = clamp_index(yi + r, h);
            for ((acc, &out_v), &in_v) in col_acc
                .iter_mut()
                .zip(&row_sums[leaving * w..(leaving + 1) * w])
                .zip(&row_sums[entering * w..(entering + 1) * w])
            {
                *acc = *acc - out_v + in_v;
            }
        }
        for (dst, &sum) in out.row_mut(y).iter_mut().zip(&col_acc) {
            *dst = ((sum + half) / area) as u8;
        }
    }
    out
}

#[inline]
fn add_row(acc: &mut [u64], row: &[u64]) {
    for (a, &v) in acc.iter_mut().zip(row) {
        *a += v;
    }
}
