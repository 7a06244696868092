//! Reconstruction fidelity between two equally shaped 8-bit buffers.
//!
//! - `mse`: mean of squared per-pixel differences, accumulated in f64 so
//!   unsigned subtraction never wraps.
//! - `psnr`: `20 * log10(255 / sqrt(mse))`, `+inf` for identical inputs.
use crate::error::ConfigError;
use crate::image::ImageView;

/// Peak intensity of an 8-bit sample.
pub const MAX_INTENSITY: f64 = 255.0;

/// Mean squared error between `a` and `b`. Empty buffers compare equal.
pub fn mse<A, B>(a: &A, b: &B) -> Result<f64, ConfigError>
where
    A: ImageView<Pixel = u8>,
    B: ImageView<Pixel = u8>,
{
    ensure_same_shape(a, b)?;
    let n = a.width() * a.height();
    if n == 0 {
        return Ok(0.0);
    }
    let sum: f64 = a
        .rows()
        .zip(b.rows())
        .flat_map(|(ra, rb)| ra.iter().zip(rb))
        .map(|(&pa, &pb)| {
            let d = pa as f64 - pb as f64;
            d * d
        })
        .sum();
    Ok(sum / n as f64)
}

/// Peak signal-to-noise ratio in dB; `+inf` when the buffers are identical.
pub fn psnr<A, B>(a: &A, b: &B) -> Result<f64, ConfigError>
where
    A: ImageView<Pixel = u8>,
    B: ImageView<Pixel = u8>,
{
    mse(a, b).map(psnr_from_mse)
}

/// Convert an MSE value into PSNR.
pub fn psnr_from_mse(mse: f64) -> f64 {
    if mse == 0.0 {
        return f64::INFINITY;
    }
    20.0 * (MAX_INTENSITY / mse.sqrt()).log10()
}

/// Fail with `ShapeMismatch` unless both views have the same (height, width).
pub fn ensure_same_shape<A, B>(a: &A, b: &B) -> Result<(), ConfigError>
where
    A: ImageView + ?Sized,
    B: ImageView + ?Sized,
{
    let (left_height, left_width) = (a.height(), a.width());
    let (right_height, right_width) = (b.height(), b.width());
    if (left_height, left_width) != (right_height, right_width) {
        return Err(ConfigError::ShapeMismatch {
            left_height,
            left_width,
            right_height,
            right_width,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::GrayImageU8;

    #[test]
    fn identical_buffers_have_zero_mse_and_infinite_psnr() {
        let img = GrayImageU8::from_fn(6, 4, |x, y| (x * 40 + y) as u8);
        assert_eq!(mse(&img, &img).unwrap(), 0.0);
        assert_eq!(psnr(&img, &img).unwrap(), f64::INFINITY);
    }

    #[test]
    fn mse_does_not_wrap_and_is_symmetric() {
        let a = GrayImageU8::new(2, 1, vec![0, 255]).unwrap();
        let b = GrayImageU8::new(2, 1, vec![255, 0]).unwrap();
        let ab = mse(&a, &b).unwrap();
        assert_eq!(ab, 255.0 * 255.0);
        assert_eq!(ab, mse(&b, &a).unwrap());
        assert!(psnr(&a, &b).unwrap().abs() < 1e-12);
    }

    #[test]
    fn psnr_matches_closed_form() {
        let a = GrayImageU8::filled(4, 4, 100);
        let b = GrayImageU8::filled(4, 4, 110);
        assert_eq!(mse(&a, &b).unwrap(), 100.0);
        let expected = 20.0 * (255.0f64 / 10.0).log10();
        assert!((psnr(&a, &b).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let a = GrayImageU8::filled(4, 3, 0);
        let b = GrayImageU8::filled(3, 4, 0);
        assert_eq!(
            mse(&a, &b),
            Err(ConfigError::ShapeMismatch {
                left_height: 3,
                left_width: 4,
                right_height: 4,
                right_width: 3,
            })
        );
    }

    #[test]
    fn views_and_owned_buffers_compare() {
        let owned = GrayImageU8::filled(3, 3, 9);
        assert_eq!(mse(&owned.as_view(), &owned).unwrap(), 0.0);
    }
}
