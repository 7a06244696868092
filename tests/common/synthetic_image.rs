use denoise_eval::image::GrayImageU8;

/// High-contrast checkerboard: piecewise-constant cells of 32 and 220.
pub fn checkerboard(width: usize, height: usize, cell: usize) -> GrayImageU8 {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    GrayImageU8::from_fn(width, height, |x, y| {
        if (x / cell + y / cell) & 1 == 0 {
            32
        } else {
            220
        }
    })
}

/// Smooth horizontal ramp, one intensity step per column.
pub fn ramp(width: usize, height: usize) -> GrayImageU8 {
    GrayImageU8::from_fn(width, height, |x, _| (x % 256) as u8)
}
