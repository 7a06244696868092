//! Tabular export of evaluation metrics and cross-image aggregation.
//!
//! CSV files carry four decimals, one row per filter in descriptor order.
//! Aggregation across images averages each filter's MSE and PSNR over all
//! result sets, which must share the same labels in the same order.
use crate::error::ConfigError;
use crate::evaluation::FilterResultSet;
use crate::image::io::ensure_parent_dir;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Per-filter metrics averaged over several images.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageMetrics {
    pub label: String,
    pub mean_mse: f64,
    pub mean_psnr: f64,
}

/// Average every filter's metrics across `sets`.
pub fn average_across_images(sets: &[FilterResultSet]) -> Result<Vec<AverageMetrics>, ConfigError> {
    let first = sets.first().ok_or(ConfigError::EmptyResultSet)?;
    if first.is_empty() {
        return Err(ConfigError::EmptyResultSet);
    }
    for set in &sets[1..] {
        if set.len() != first.len() {
            let found = set.labels().next().unwrap_or_default().to_string();
            return Err(ConfigError::LabelMismatch {
                expected: format!("{} filters", first.len()),
                found: format!("{} filters starting at '{found}'", set.len()),
            });
        }
        for (expected, found) in first.labels().zip(set.labels()) {
            if expected != found {
                return Err(ConfigError::LabelMismatch {
                    expected: expected.to_string(),
                    found: found.to_string(),
                });
            }
        }
    }

    let n = sets.len() as f64;
    Ok(first
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let (mse_sum, psnr_sum) = sets.iter().fold((0.0, 0.0), |(m, p), set| {
                let entry = &set.as_slice()[i];
                (m + entry.mse(), p + entry.psnr())
            });
            AverageMetrics {
                label: r.label().to_string(),
                mean_mse: mse_sum / n,
                mean_psnr: psnr_sum / n,
            }
        })
        .collect())
}

/// Filter with the lowest mean MSE; the earliest entry wins ties.
pub fn best_by_mean_mse(averages: &[AverageMetrics]) -> Option<&AverageMetrics> {
    let mut best: Option<&AverageMetrics> = None;
    for a in averages {
        if best.is_none_or(|b| a.mean_mse < b.mean_mse) {
            best = Some(a);
        }
    }
    best
}

/// Write `Filter,MSE,PSNR (dB)` rows for one image.
pub fn write_metrics_csv(path: &Path, results: &FilterResultSet) -> Result<(), String> {
    let rows = results
        .iter()
        .map(|r| [r.label().to_string(), fmt4(r.mse()), fmt4(r.psnr())]);
    write_csv(path, ["Filter", "MSE", "PSNR (dB)"], rows)
}

/// Write `Filter,Mean MSE,Mean PSNR (dB)` rows for a multi-image run.
pub fn write_average_csv(path: &Path, averages: &[AverageMetrics]) -> Result<(), String> {
    let rows = averages
        .iter()
        .map(|a| [a.label.clone(), fmt4(a.mean_mse), fmt4(a.mean_psnr)]);
    write_csv(path, ["Filter", "Mean MSE", "Mean PSNR (dB)"], rows)
}

/// File stem for a filter's output image: `"Mean 3x3"` → `"mean_33"`.
pub fn image_file_stem(label: &str) -> String {
    label.to_lowercase().replace(' ', "_").replace('x', "")
}

/// Check that every label yields a distinct, non-empty file stem made of
/// letters, digits, `_` and `-` only.
pub fn check_file_stems<'a>(labels: impl IntoIterator<Item = &'a str>) -> Result<(), ConfigError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for label in labels {
        let stem = image_file_stem(label);
        let usable = !stem.is_empty() && stem.chars().all(is_stem_char);
        if !usable {
            return Err(ConfigError::UnsafeLabel(label.to_string()));
        }
        if let Some(first) = seen.get(&stem) {
            return Err(ConfigError::StemCollision {
                stem,
                first: first.to_string(),
                second: label.to_string(),
            });
        }
        seen.insert(stem, label);
    }
    Ok(())
}

fn is_stem_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn fmt4(v: f64) -> String {
    format!("{v:.4}")
}

fn write_csv(
    path: &Path,
    header: [&str; 3],
    rows: impl Iterator<Item = [String; 3]>,
) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| format!("Failed to create {}: {e}", path.display()))?;
    writer
        .write_record(header)
        .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
    for row in rows {
        writer
            .write_record(&row)
            .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
    }
    writer
        .flush()
        .map_err(|e| format!("Failed to flush {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::FilterResult;
    use crate::filters::{FilterDescriptor, FilterKind, KernelSize};
    use crate::image::GrayImageU8;

    fn set(entries: &[(&str, f64)]) -> FilterResultSet {
        let k = KernelSize::new(3).unwrap();
        FilterResultSet::new(
            entries
                .iter()
                .map(|&(label, mse)| {
                    FilterResult::new(
                        FilterDescriptor::new(label, FilterKind::Median, k),
                        GrayImageU8::filled(1, 1, 0),
                        mse,
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn averages_per_label_and_picks_best() {
        let sets = [
            set(&[("A", 10.0), ("B", 4.0)]),
            set(&[("A", 20.0), ("B", 8.0)]),
        ];
        let avg = average_across_images(&sets).unwrap();
        assert_eq!(avg[0].label, "A");
        assert_eq!(avg[0].mean_mse, 15.0);
        assert_eq!(avg[1].mean_mse, 6.0);
        assert_eq!(best_by_mean_mse(&avg).unwrap().label, "B");
    }

    #[test]
    fn mismatched_labels_are_rejected() {
        let sets = [set(&[("A", 1.0)]), set(&[("B", 1.0)])];
        assert_eq!(
            average_across_images(&sets),
            Err(ConfigError::LabelMismatch {
                expected: "A".into(),
                found: "B".into()
            })
        );
    }

    #[test]
    fn file_stems_drop_the_times_sign() {
        assert_eq!(image_file_stem("Mean 3x3"), "mean_33");
        assert_eq!(image_file_stem("Gaussian 7x7"), "gaussian_77");
    }

    #[test]
    fn default_labels_have_distinct_stems() {
        let descriptors = crate::filters::default_descriptors();
        assert_eq!(
            check_file_stems(descriptors.iter().map(|d| d.label.as_str())),
            Ok(())
        );
    }

    #[test]
    fn colliding_or_path_like_stems_are_rejected() {
        assert_eq!(
            check_file_stems(["Box 3x3", "Bo 33"]),
            Err(ConfigError::StemCollision {
                stem: "bo_33".into(),
                first: "Box 3x3".into(),
                second: "Bo 33".into()
            })
        );
        for label in ["../median", "median/3", "..", ""] {
            assert_eq!(
                check_file_stems([label]),
                Err(ConfigError::UnsafeLabel(label.into())),
                "{label:?}"
            );
        }
    }

    #[test]
    fn metrics_csv_keeps_header_order_and_precision() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image_1/metrics.csv");
        let results = set(&[
            ("Median 3x3", 12.345678),
            ("Exact", 0.0),
            ("Mean 3x3", 40.0),
        ]);

        write_metrics_csv(&path, &results).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "Filter,MSE,PSNR (dB)",
                "Median 3x3,12.3457,37.2157",
                "Exact,0.0000,inf",
                "Mean 3x3,40.0000,32.1102",
            ]
        );
    }

    #[test]
    fn average_csv_lists_every_filter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics_mean.csv");
        let averages = [
            AverageMetrics {
                label: "Mode 3x3".into(),
                mean_mse: 2.5,
                mean_psnr: 44.15,
            },
            AverageMetrics {
                label: "Mode 7x7".into(),
                mean_mse: 8.0,
                mean_psnr: 39.0625,
            },
        ];

        write_average_csv(&path, &averages).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "Filter,Mean MSE,Mean PSNR (dB)",
                "Mode 3x3,2.5000,44.1500",
                "Mode 7x7,8.0000,39.0625",
            ]
        );
    }
}
