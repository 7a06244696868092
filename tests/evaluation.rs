mod common;

use common::synthetic_image::{checkerboard, ramp};
use denoise_eval::evaluation::{EvaluationOptions, Evaluator};
use denoise_eval::image::GrayImageU8;
use denoise_eval::metrics::mse;
use denoise_eval::noise::{GaussianParams, NoiseModel, SaltPepperParams};
use denoise_eval::{default_descriptors, evaluate, ConfigError, EvalError, FilterKind};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn noisy_copy(clean: &GrayImageU8, model: NoiseModel, seed: u64) -> GrayImageU8 {
    model
        .apply(clean.as_view(), &mut StdRng::seed_from_u64(seed))
        .expect("valid noise parameters")
}

#[test]
fn rank_filters_win_against_impulse_noise() {
    let _ = env_logger::builder().is_test(true).try_init();
    let clean = checkerboard(96, 96, 16);
    let model = NoiseModel::SaltPepper(SaltPepperParams::new(0.02, 0.02).unwrap());
    let noisy = noisy_copy(&clean, model, 42);
    let noisy_mse = mse(&clean, &noisy).unwrap();

    let results = evaluate(clean.as_view(), noisy.as_view(), &default_descriptors()).unwrap();
    assert_eq!(results.len(), 8);

    let median3 = results.get("Median 3x3").unwrap();
    let mean3 = results.get("Mean 3x3").unwrap();
    assert!(
        median3.mse() < mean3.mse(),
        "median {:.3} should beat mean {:.3}",
        median3.mse(),
        mean3.mse()
    );
    assert!(median3.mse() < noisy_mse);

    let summary = results.summarize().unwrap();
    let best_kind = results.get(&summary.best.label).unwrap().descriptor().kind;
    assert!(
        matches!(best_kind, FilterKind::Median | FilterKind::Mode),
        "unexpected best filter {}",
        summary.best.label
    );
    assert!(summary.worst.mse >= summary.best.mse);
    let stats = &summary.mse;
    assert!(stats.min <= stats.mean && stats.mean <= stats.max);
}

#[test]
fn larger_mean_window_averages_out_gaussian_noise() {
    let _ = env_logger::builder().is_test(true).try_init();
    let clean = ramp(128, 64);
    let model = NoiseModel::Gaussian(GaussianParams::new(0.0, 25.0).unwrap());
    let noisy = noisy_copy(&clean, model, 7);
    let noisy_mse = mse(&clean, &noisy).unwrap();

    let results = evaluate(clean.as_view(), noisy.as_view(), &default_descriptors()).unwrap();
    let mean3 = results.get("Mean 3x3").unwrap().mse();
    let mean7 = results.get("Mean 7x7").unwrap().mse();
    assert!(mean3 < noisy_mse, "mean3 {mean3:.2} vs {noisy_mse:.2}");
    assert!(mean7 < mean3, "mean7 {mean7:.2} vs mean3 {mean3:.2}");
}

#[test]
fn sessions_are_reproducible_from_the_seed() {
    let clean = checkerboard(40, 30, 8);
    let model = NoiseModel::SaltPepper(SaltPepperParams::new(0.05, 0.05).unwrap());
    let first = noisy_copy(&clean, model, 1234);
    let second = noisy_copy(&clean, model, 1234);
    assert_eq!(first.data(), second.data());

    let options = EvaluationOptions { parallel: true };
    let a = Evaluator::new(options)
        .run(clean.as_view(), first.as_view(), &default_descriptors())
        .unwrap();
    let b = Evaluator::new(options)
        .run(clean.as_view(), second.as_view(), &default_descriptors())
        .unwrap();
    assert_eq!(a.as_slice(), b.as_slice());
}

#[test]
fn mismatched_pair_is_a_configuration_error() {
    let clean = checkerboard(32, 32, 8);
    let noisy = checkerboard(32, 31, 8);
    let err = evaluate(clean.as_view(), noisy.as_view(), &default_descriptors()).unwrap_err();
    assert!(matches!(
        err,
        EvalError::Config(ConfigError::ShapeMismatch { .. })
    ));
}

#[test]
fn clean_input_is_never_modified() {
    let clean = checkerboard(24, 24, 6);
    let snapshot = clean.clone();
    let model = NoiseModel::SaltPepper(SaltPepperParams::new(0.5, 0.5).unwrap());
    let noisy = noisy_copy(&clean, model, 3);
    let _ = evaluate(clean.as_view(), noisy.as_view(), &default_descriptors()).unwrap();
    assert_eq!(clean, snapshot);
}
