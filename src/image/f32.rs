//! Owned single-channel f32 plane in row-major layout (stride == width).
//!
//! Holds the intermediate result between the horizontal and vertical passes
//! of the separable filters, so the first pass keeps full precision before
//! the final rounding back to 8 bits.
use super::traits::{ImageView, ImageViewMut};
use super::u8::GrayImageU8;

#[derive(Clone, Debug)]
pub struct ImageF32 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0.0; w * h],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.w + x]
    }

    /// Round every sample to the nearest integer and clamp into `[0, 255]`.
    pub fn to_u8_rounded(&self) -> GrayImageU8 {
        GrayImageU8::from_fn(self.w, self.h, |x, y| round_to_u8(self.get(x, y)))
    }
}

#[inline]
pub(crate) fn round_to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

impl ImageView for ImageF32 {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[f32]> {
        Some(&self.data)
    }
}

impl ImageViewMut for ImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.w;
        &mut self.data[start..start + self.w]
    }
}
