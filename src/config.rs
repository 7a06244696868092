//! JSON runtime configuration for the `denoise_eval` driver.
//!
//! ```json
//! {
//!   "inputs": ["photos/street.png"],
//!   "noise": { "type": "salt_pepper", "salt_prob": 0.02, "pepper_prob": 0.02 },
//!   "seed": 42,
//!   "output": { "dir": "results", "save_images": true }
//! }
//! ```
//!
//! Every section is optional. Without `inputs` the driver evaluates the
//! synthetic scenes described by `synthetic`; without `filters` it runs the
//! default eight-filter battery.
use crate::filters::{default_descriptors, FilterDescriptor};
use crate::noise::NoiseModel;
use crate::report::check_file_stems;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    pub width: usize,
    pub height: usize,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            seed: 42,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// Write original, noisy and filtered PNGs next to the metric tables.
    pub save_images: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("results"),
            save_images: true,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub inputs: Vec<PathBuf>,
    pub synthetic: SyntheticConfig,
    pub noise: NoiseModel,
    pub seed: u64,
    pub filters: Vec<FilterDescriptor>,
    pub parallel: bool,
    pub output: OutputConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            synthetic: SyntheticConfig::default(),
            noise: NoiseModel::default(),
            seed: 42,
            filters: default_descriptors(),
            parallel: true,
            output: OutputConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Reject configurations the evaluation would refuse anyway, so errors
    /// surface at load time with the file name attached.
    pub fn validate(&self) -> Result<(), String> {
        self.noise.validate().map_err(|e| e.to_string())?;
        if self.filters.is_empty() {
            return Err("filter list is empty".to_string());
        }
        let mut seen = HashSet::new();
        for f in &self.filters {
            if !seen.insert(f.label.as_str()) {
                return Err(format!("duplicate filter label '{}'", f.label));
            }
        }
        if self.output.save_images {
            check_file_stems(self.filters.iter().map(|f| f.label.as_str()))
                .map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

pub fn parse_config(json: &str) -> Result<RuntimeConfig, String> {
    let config: RuntimeConfig =
        serde_json::from_str(json).map_err(|e| format!("Failed to parse config: {e}"))?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&contents).map_err(|e| format!("{}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{FilterKind, KernelSize};
    use crate::noise::GaussianParams;

    #[test]
    fn empty_object_uses_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.filters.len(), 8);
        assert_eq!(config.seed, 42);
        assert!(config.inputs.is_empty());
        assert_eq!(config.noise, NoiseModel::default());
    }

    #[test]
    fn custom_filters_and_noise_parse() {
        let config = parse_config(
            r#"{
                "noise": {"type": "gaussian", "mean": 0.0, "sigma": 25.0},
                "filters": [{"label": "wide median", "kind": "median", "kernel_size": 9}]
            }"#,
        )
        .unwrap();
        assert_eq!(
            config.noise,
            NoiseModel::Gaussian(GaussianParams::new(0.0, 25.0).unwrap())
        );
        let k9 = KernelSize::new(9).unwrap();
        let wide = FilterDescriptor::new("wide median", FilterKind::Median, k9);
        assert_eq!(config.filters, vec![wide]);
    }

    #[test]
    fn invalid_values_fail_at_load_time() {
        for json in [
            r#"{"filters": [{"label": "m", "kind": "mean", "kernel_size": 4}]}"#,
            r#"{"noise": {"type": "salt_pepper", "salt_prob": 1.2, "pepper_prob": 0.0}}"#,
            r#"{"noise": {"type": "gaussian", "mean": 0.0, "sigma": -3.0}}"#,
            r#"{"filters": []}"#,
        ] {
            assert!(parse_config(json).is_err(), "{json}");
        }
    }

    #[test]
    fn labels_must_map_to_distinct_image_files() {
        let colliding = r#"{"filters": [
            {"label": "Box 3x3", "kind": "mean", "kernel_size": 3},
            {"label": "Bo 33", "kind": "median", "kernel_size": 3}
        ]}"#;
        let err = parse_config(colliding).unwrap_err();
        assert!(err.contains("bo_33"), "{err}");

        let escaping = r#"{"filters": [{"label": "../up", "kind": "mean", "kernel_size": 3}]}"#;
        assert!(parse_config(escaping).is_err());

        let csv_only = r#"{
            "filters": [{"label": "../up", "kind": "mean", "kernel_size": 3}],
            "output": {"save_images": false}
        }"#;
        assert!(parse_config(csv_only).is_ok());
    }

    #[test]
    fn load_config_names_the_file_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("run.json");
        std::fs::write(&good, r#"{"seed": 7, "parallel": false}"#).unwrap();
        let config = load_config(&good).unwrap();
        assert_eq!(config.seed, 7);
        assert!(!config.parallel);

        let bad = dir.path().join("broken.json");
        std::fs::write(&bad, "{ not json").unwrap();
        let err = load_config(&bad).unwrap_err();
        assert!(err.contains("broken.json"), "{err}");
    }
}
