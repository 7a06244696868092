//! 8-bit intensity buffers.
//!
//! `GrayImageU8` owns its samples and is what every stage returns: noise
//! injection and filtering build a fresh buffer instead of mutating their
//! input. `ImageU8` is the borrowed, possibly strided view the stages read.
use super::traits::{ImageView, ImageViewMut};
use crate::error::ConfigError;

/// Borrowed row-major view over 8-bit samples.
#[derive(Clone, Copy, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    /// Wrap a tightly packed buffer, checking its length against `w * h`.
    pub fn new(w: usize, h: usize, data: &'a [u8]) -> Result<Self, ConfigError> {
        check_len(w, h, data.len())?;
        Ok(Self {
            w,
            h,
            stride: w,
            data,
        })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }

    /// Copy the visible samples into an owned, tightly packed buffer.
    pub fn to_gray_image(&self) -> GrayImageU8 {
        if let Some(slice) = self.as_slice() {
            return GrayImageU8 {
                width: self.w,
                height: self.h,
                data: slice.to_vec(),
            };
        }
        let mut data = Vec::with_capacity(self.w * self.h);
        for row in self.rows() {
            data.extend_from_slice(row);
        }
        GrayImageU8 {
            width: self.w,
            height: self.h,
            data,
        }
    }
}

impl<'a> ImageView for ImageU8<'a> {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        (self.stride == self.w).then_some(&self.data[..self.w * self.h])
    }
}

/// Owned, tightly packed 8-bit grayscale buffer. Dimensions are fixed at
/// construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImageU8 {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayImageU8 {
    /// Take ownership of `data`, which must hold exactly `width * height`
    /// row-major samples.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ConfigError> {
        check_len(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Buffer with every sample set to `value`.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> u8) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        self.data[y * self.width + x] = v;
    }

    /// Row-major samples.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Borrow as a read-only `ImageU8` view
    pub fn as_view(&self) -> ImageU8<'_> {
        ImageU8 {
            w: self.width,
            h: self.height,
            stride: self.width,
            data: &self.data,
        }
    }
}

impl ImageView for GrayImageU8 {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.width
    }
    #[inline]
    fn height(&self) -> usize {
        self.height
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        Some(&self.data)
    }
}

impl ImageViewMut for GrayImageU8 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.width;
        &mut self.data[start..start + self.width]
    }
}

fn check_len(width: usize, height: usize, actual: usize) -> Result<(), ConfigError> {
    let expected = width * height;
    if actual != expected {
        return Err(ConfigError::BufferLength {
            width,
            height,
            expected,
            actual,
        });
    }
    Ok(())
}
