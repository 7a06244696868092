//! Synthetic noise injection.
//!
//! Both models return a corrupted copy and leave the clean buffer untouched.
//! Randomness comes exclusively from the caller's `rng`, so a session seeded
//! with `StdRng::seed_from_u64` reproduces byte-identical noisy buffers.
//!
//! - Salt and pepper: two independent uniform draws per pixel. The salt draw
//!   forces 255 when below `salt_prob`; the pepper draw then forces 0 when
//!   below `pepper_prob`. A pixel hit by both ends up black.
//! - Gaussian: adds `N(mean, sigma)` to each sample, clamps to `[0, 255]` and
//!   truncates toward zero.
use crate::error::ConfigError;
use crate::image::{GrayImageU8, ImageU8, ImageView, ImageViewMut};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaltPepperParams {
    pub salt_prob: f64,
    pub pepper_prob: f64,
}

impl SaltPepperParams {
    pub fn new(salt_prob: f64, pepper_prob: f64) -> Result<Self, ConfigError> {
        let params = Self {
            salt_prob,
            pepper_prob,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("salt_prob", self.salt_prob)?;
        check_probability("pepper_prob", self.pepper_prob)
    }
}

impl Default for SaltPepperParams {
    fn default() -> Self {
        Self {
            salt_prob: 0.02,
            pepper_prob: 0.02,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GaussianParams {
    pub mean: f64,
    pub sigma: f64,
}

impl GaussianParams {
    pub fn new(mean: f64, sigma: f64) -> Result<Self, ConfigError> {
        let params = Self { mean, sigma };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.mean.is_finite() {
            return Err(ConfigError::InvalidMean(self.mean));
        }
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(ConfigError::InvalidSigma(self.sigma));
        }
        Ok(())
    }
}

impl Default for GaussianParams {
    fn default() -> Self {
        Self {
            mean: 0.0,
            sigma: 25.0,
        }
    }
}

/// Noise model selected by a session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NoiseModel {
    SaltPepper(SaltPepperParams),
    Gaussian(GaussianParams),
}

impl Default for NoiseModel {
    fn default() -> Self {
        NoiseModel::SaltPepper(SaltPepperParams::default())
    }
}

impl NoiseModel {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            NoiseModel::SaltPepper(p) => p.validate(),
            NoiseModel::Gaussian(p) => p.validate(),
        }
    }

    /// Short identifier used in logs and report file names.
    pub fn name(&self) -> &'static str {
        match self {
            NoiseModel::SaltPepper(_) => "salt_pepper",
            NoiseModel::Gaussian(_) => "gaussian",
        }
    }

    pub fn apply<R: Rng + ?Sized>(
        &self,
        image: ImageU8<'_>,
        rng: &mut R,
    ) -> Result<GrayImageU8, ConfigError> {
        match self {
            NoiseModel::SaltPepper(p) => apply_salt_and_pepper(image, p, rng),
            NoiseModel::Gaussian(p) => apply_gaussian(image, p, rng),
        }
    }
}

/// Impulse noise: salt mask first, then pepper mask, one draw each per pixel.
pub fn apply_salt_and_pepper<R: Rng + ?Sized>(
    image: ImageU8<'_>,
    params: &SaltPepperParams,
    rng: &mut R,
) -> Result<GrayImageU8, ConfigError> {
    params.validate()?;
    let mut out = image.to_gray_image();
    for y in 0..out.height() {
        for px in out.row_mut(y) {
            if rng.gen::<f64>() < params.salt_prob {
                *px = u8::MAX;
            }
            if rng.gen::<f64>() < params.pepper_prob {
                *px = 0;
            }
        }
    }
    Ok(out)
}

/// Additive Gaussian noise, clamped to `[0, 255]` and truncated.
pub fn apply_gaussian<R: Rng + ?Sized>(
    image: ImageU8<'_>,
    params: &GaussianParams,
    rng: &mut R,
) -> Result<GrayImageU8, ConfigError> {
    params.validate()?;
    let normal = Normal::new(params.mean, params.sigma)
        .map_err(|_| ConfigError::InvalidSigma(params.sigma))?;
    let mut out = image.to_gray_image();
    for y in 0..out.height() {
        for px in out.row_mut(y) {
            let noisy = *px as f64 + normal.sample(rng);
            *px = noisy.clamp(0.0, 255.0) as u8;
        }
    }
    Ok(out)
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidProbability { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scene() -> GrayImageU8 {
        GrayImageU8::from_fn(32, 24, |x, y| (40 + (x * 5 + y * 3) % 180) as u8)
    }

    fn impulses(img: &GrayImageU8, salt: f64, pepper: f64, seed: u64) -> GrayImageU8 {
        let params = SaltPepperParams::new(salt, pepper).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let view = img.as_view();
        apply_salt_and_pepper(view, &params, &mut rng).unwrap()
    }

    #[test]
    fn certain_salt_whitens_everything() {
        let img = scene();
        let noisy = impulses(&img, 1.0, 0.0, 1);
        assert!(noisy.data().iter().all(|&v| v == 255));
        assert_eq!(noisy.shape(), img.shape());
    }

    #[test]
    fn certain_pepper_blackens_everything() {
        let img = scene();
        let noisy = impulses(&img, 0.0, 1.0, 1);
        assert!(noisy.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn pepper_wins_when_both_masks_hit() {
        let img = scene();
        let noisy = impulses(&img, 1.0, 1.0, 3);
        assert!(noisy.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn zero_probabilities_leave_image_untouched() {
        let img = scene();
        let noisy = impulses(&img, 0.0, 0.0, 9);
        assert_eq!(noisy, img);
    }

    #[test]
    fn same_seed_reproduces_noise() {
        let img = scene();
        for model in [
            NoiseModel::SaltPepper(SaltPepperParams::new(0.1, 0.1).unwrap()),
            NoiseModel::Gaussian(GaussianParams::new(0.0, 25.0).unwrap()),
        ] {
            let a = model
                .apply(img.as_view(), &mut StdRng::seed_from_u64(42))
                .unwrap();
            let b = model
                .apply(img.as_view(), &mut StdRng::seed_from_u64(42))
                .unwrap();
            assert_eq!(a, b, "{}", model.name());
            assert_ne!(a, img, "{}", model.name());
        }
    }

    #[test]
    fn gaussian_with_zero_sigma_shifts_and_clamps() {
        let img = GrayImageU8::new(3, 1, vec![0, 100, 250]).unwrap();
        let shifted = apply_gaussian(
            img.as_view(),
            &GaussianParams::new(10.7, 0.0).unwrap(),
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();
        assert_eq!(shifted.data(), &[10, 110, 255]);

        let lowered = apply_gaussian(
            img.as_view(),
            &GaussianParams::new(-20.0, 0.0).unwrap(),
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();
        assert_eq!(lowered.data(), &[0, 80, 230]);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert_eq!(
            SaltPepperParams::new(1.5, 0.0),
            Err(ConfigError::InvalidProbability {
                name: "salt_prob",
                value: 1.5
            })
        );
        assert!(SaltPepperParams::new(0.0, -0.1).is_err());
        assert!(SaltPepperParams::new(f64::NAN, 0.0).is_err());
        assert_eq!(
            GaussianParams::new(0.0, -1.0),
            Err(ConfigError::InvalidSigma(-1.0))
        );
        assert!(GaussianParams::new(f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn unchecked_parameters_fail_before_touching_pixels() {
        let img = scene();
        let bad = SaltPepperParams {
            salt_prob: 2.0,
            pepper_prob: 0.0,
        };
        let mut rng = StdRng::seed_from_u64(0);
        let view = img.as_view();
        assert!(apply_salt_and_pepper(view, &bad, &mut rng).is_err());
    }

    #[test]
    fn noise_model_config_is_tagged() {
        let model: NoiseModel =
            serde_json::from_str(r#"{"type":"gaussian","mean":0.0,"sigma":12.5}"#).unwrap();
        assert_eq!(
            model,
            NoiseModel::Gaussian(GaussianParams {
                mean: 0.0,
                sigma: 12.5
            })
        );
    }
}
