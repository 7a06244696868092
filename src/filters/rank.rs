//! Order-statistic filters (median, mode) on a running histogram.
//!
//! For each output row the 256-bin histogram of the first window is built
//! once; moving one pixel right removes the leaving column and adds the
//! entering one (k samples each). With border clamping the window at `x`
//! is the multiset of columns `clamp(x - r ..= x + r)`, so sliding stays
//! exact at the edges. Reducers scan the histogram.
use super::{clamp_index, KernelSize};
use crate::image::{GrayImageU8, ImageU8, ImageView, ImageViewMut};

/// Counts of each intensity inside the current window.
#[derive(Clone, Debug)]
pub struct WindowHistogram {
    bins: [u32; 256],
    count: u32,
}

impl Default for WindowHistogram {
    fn default() -> Self {
        Self {
            bins: [0; 256],
            count: 0,
        }
    }
}

impl WindowHistogram {
    pub fn from_samples(samples: &[u8]) -> Self {
        let mut hist = Self::default();
        for &v in samples {
            hist.add(v);
        }
        hist
    }

    #[inline]
    pub fn add(&mut self, v: u8) {
        self.bins[v as usize] += 1;
        self.count += 1;
    }

    #[inline]
    pub fn remove(&mut self, v: u8) {
        debug_assert!(self.bins[v as usize] > 0, "removing absent sample {v}");
        self.bins[v as usize] -= 1;
        self.count -= 1;
    }

    pub fn clear(&mut self) {
        self.bins = [0; 256];
        self.count = 0;
    }

    pub fn len(&self) -> u32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Sample of rank `count / 2` in ascending order. For the odd window
    /// areas the filters use this is the unique middle value.
    pub fn median(&self) -> u8 {
        let target = self.count / 2;
        let mut seen = 0u32;
        for (value, &n) in self.bins.iter().enumerate() {
            seen += n;
            if seen > target {
                return value as u8;
            }
        }
        0
    }

    /// Most frequent sample; among equally frequent values the lowest wins.
    pub fn mode(&self) -> u8 {
        let mut best = 0usize;
        let mut best_count = 0u32;
        for (value, &n) in self.bins.iter().enumerate() {
            if n > best_count {
                best = value;
                best_count = n;
            }
        }
        best as u8
    }
}

/// Apply `reduce` to every clamped `k × k` window of `image`.
pub fn rank_filter(
    image: ImageU8<'_>,
    kernel: KernelSize,
    reduce: fn(&WindowHistogram) -> u8,
) -> GrayImageU8 {
    let (w, h) = (image.w, image.h);
    let mut out = GrayImageU8::filled(w, h, 0);
    if w == 0 || h == 0 {
        return out;
    }
    let r = kernel.radius() as isize;
    let mut rows: Vec<&[u8]> = Vec::with_capacity(kernel.get());
    let mut hist = WindowHistogram::default();

    for y in 0..h {
        rows.clear();
        rows.extend((-r..=r).map(|dy| image.row(clamp_index(y as isize + dy, h))));

        hist.clear();
        for row in &rows {
            for dx in -r..=r {
                hist.add(row[clamp_index(dx, w)]);
            }
        }

        let dst = out.row_mut(y);
        dst[0] = reduce(&hist);
        for (x, px) in dst.iter_mut().enumerate().skip(1) {
            let xi = x as isize;
            let leaving = clamp_index(xi - 1 - r, w);
            let entering = clamp_index(xi + r, w);
            if leaving != entering {
                for row in &rows {
                    hist.remove(row[leaving]);
                    hist.add(row[entering]);
                }
            }
            *px = reduce(&hist);
        }
    }
    out
}
