//! Seeded synthetic grayscale scenes for demos and tests when no input image
//! is supplied.
//!
//! Shapes are clipped at the image border; scenes smaller than the nominal
//! margins shrink the placement ranges instead of panicking.
use crate::image::GrayImageU8;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform integer in `[lo, hi)`, collapsing to `lo` for empty ranges.
fn span(rng: &mut StdRng, lo: usize, hi: usize) -> usize {
    if hi <= lo {
        lo
    } else {
        rng.gen_range(lo..hi)
    }
}

/// Placement range `[margin, extent - margin)` shrunk to fit small scenes.
fn interior(extent: usize, margin: usize) -> (usize, usize) {
    let margin = margin.min(extent / 2);
    (margin, extent - margin)
}

fn fill_disc(
    img: &mut GrayImageU8,
    cx: usize,
    cy: usize,
    radius: f32,
    ring: Option<f32>,
    value: u8,
) {
    let (w, h) = (img.as_view().w, img.as_view().h);
    let reach = (radius + ring.unwrap_or(0.0)).ceil() as isize + 1;
    let (cxi, cyi) = (cx as isize, cy as isize);
    for y in (cyi - reach).max(0)..(cyi + reach + 1).min(h as isize) {
        for x in (cxi - reach).max(0)..(cxi + reach + 1).min(w as isize) {
            let (dx, dy) = ((x - cxi) as f32, (y - cyi) as f32);
            let d = (dx * dx + dy * dy).sqrt();
            let inside = match ring {
                Some(half_width) => (d - radius).abs() <= half_width,
                None => d <= radius,
            };
            if inside {
                img.set(x as usize, y as usize, value);
            }
        }
    }
}

fn fill_rect(img: &mut GrayImageU8, x0: usize, y0: usize, x1: usize, y1: usize, value: u8) {
    let (w, h) = (img.as_view().w, img.as_view().h);
    for y in y0.min(h)..y1.min(h) {
        for x in x0.min(w)..x1.min(w) {
            img.set(x, y, value);
        }
    }
}

/// Light background with filled discs, some outlined by a darker ring.
pub fn circles(width: usize, height: usize, count: usize, seed: u64) -> GrayImageU8 {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut img = GrayImageU8::filled(width, height, 220);
    if width == 0 || height == 0 {
        return img;
    }
    let (x_lo, x_hi) = interior(width, 60);
    let (y_lo, y_hi) = interior(height, 60);
    for _ in 0..count {
        let cx = span(&mut rng, x_lo, x_hi);
        let cy = span(&mut rng, y_lo, y_hi);
        let radius = span(&mut rng, 20, 60) as f32;
        let value = span(&mut rng, 40, 180) as u8;
        fill_disc(&mut img, cx, cy, radius, None, value);
        if rng.gen::<f64>() > 0.5 {
            let outline = value.saturating_sub(50);
            fill_disc(&mut img, cx, cy, radius, Some(1.5), outline);
        }
    }
    img
}

/// Filled rectangles, some with a darker 2 px border.
pub fn rectangles(width: usize, height: usize, count: usize, seed: u64) -> GrayImageU8 {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut img = GrayImageU8::filled(width, height, 200);
    if width == 0 || height == 0 {
        return img;
    }
    for _ in 0..count {
        let x0 = span(&mut rng, 20.min(width / 2), width.saturating_sub(100));
        let y0 = span(&mut rng, 20.min(height / 2), height.saturating_sub(100));
        let rw = span(&mut rng, 30, 80);
        let rh = span(&mut rng, 30, 80);
        let value = span(&mut rng, 50, 200) as u8;
        let (x1, y1) = (x0 + rw, y0 + rh);
        fill_rect(&mut img, x0, y0, x1, y1, value);
        if rng.gen::<f64>() > 0.6 {
            let border = value.saturating_sub(40);
            fill_rect(&mut img, x0, y0, x1, y0 + 2, border);
            fill_rect(&mut img, x0, y1.saturating_sub(2), x1, y1, border);
            fill_rect(&mut img, x0, y0, x0 + 2, y1, border);
            fill_rect(&mut img, x1.saturating_sub(2), y0, x1, y1, border);
        }
    }
    img
}

/// 1 px grid lines every `spacing` pixels with random discs on crossings.
pub fn grid(width: usize, height: usize, spacing: usize, seed: u64) -> GrayImageU8 {
    let mut rng = StdRng::seed_from_u64(seed);
    let spacing = spacing.max(1);
    let mut img = GrayImageU8::from_fn(width, height, |x, y| {
        if x.is_multiple_of(spacing) || y.is_multiple_of(spacing) {
            200
        } else {
            240
        }
    });
    for x in (0..width).step_by(spacing) {
        for y in (0..height).step_by(spacing) {
            if rng.gen::<f64>() > 0.6 {
                let radius = span(&mut rng, 8, 20) as f32;
                let value = span(&mut rng, 80, 160) as u8;
                fill_disc(&mut img, x, y, radius, None, value);
            }
        }
    }
    img
}

/// Horizontal ramp from 0 at the left edge to 255 at the right edge.
pub fn gradient(width: usize, height: usize) -> GrayImageU8 {
    let denom = width.saturating_sub(1).max(1);
    GrayImageU8::from_fn(width, height, |x, _| ((x * 255 + denom / 2) / denom) as u8)
}

/// The named scenes a driver can generate, in a fixed order.
pub fn standard_scenes(width: usize, height: usize, seed: u64) -> Vec<(&'static str, GrayImageU8)> {
    let boxes = rectangles(width, height, 12, seed.wrapping_add(1));
    let lines = grid(width, height, 50, seed.wrapping_add(2));
    vec![
        ("circles", circles(width, height, 15, seed)),
        ("rectangles", boxes),
        ("grid", lines),
        ("gradient", gradient(width, height)),
    ]
}
