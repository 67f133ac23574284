//! Fitted simple imputer
//!
//! The per-column statistics were computed when the model was trained
//! (mean, median, most frequent value, or a constant). At inference time the
//! imputer only substitutes them for NaN cells.
//!
//! Artifact format (JSON):
//!
//! ```json
//! {
//!   "strategy": "median",
//!   "statistics": [36.0, 802.0, ...],
//!   "feature_names": ["Age", "DailyRate", ...]
//! }
//! ```
//!
//! `statistics` must have one entry per canonical column. `feature_names` is
//! optional; when present it must match the canonical order exactly.

use serde::{Deserialize, Serialize};

use crate::schema::{FeatureVector, FEATURE_NAMES, NUM_FEATURES};

/// How the statistics were computed. Only informative at inference time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputeStrategy {
    #[default]
    Mean,
    Median,
    MostFrequent,
    Constant,
}

impl std::fmt::Display for ImputeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImputeStrategy::Mean => write!(f, "mean"),
            ImputeStrategy::Median => write!(f, "median"),
            ImputeStrategy::MostFrequent => write!(f, "most_frequent"),
            ImputeStrategy::Constant => write!(f, "constant"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ImputerArtifact {
    #[serde(default)]
    strategy: ImputeStrategy,
    statistics: Vec<f64>,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
}

/// Column-wise NaN replacement with precomputed statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleImputer {
    strategy: ImputeStrategy,
    statistics: [f64; NUM_FEATURES],
}

impl SimpleImputer {
    pub fn new(strategy: ImputeStrategy, statistics: [f64; NUM_FEATURES]) -> Self {
        Self {
            strategy,
            statistics,
        }
    }

    /// Parse and validate the JSON artifact.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let artifact: ImputerArtifact =
            serde_json::from_str(json).map_err(|e| format!("failed to parse imputer JSON: {e}"))?;

        if let Some(names) = &artifact.feature_names {
            check_feature_names(names)?;
        }

        let statistics: [f64; NUM_FEATURES] =
            artifact.statistics.as_slice().try_into().map_err(|_| {
                format!(
                    "imputer has {} statistics, expected {NUM_FEATURES}",
                    artifact.statistics.len()
                )
            })?;

        Ok(Self::new(artifact.strategy, statistics))
    }

    pub fn strategy(&self) -> ImputeStrategy {
        self.strategy
    }

    pub fn statistics(&self) -> &[f64; NUM_FEATURES] {
        &self.statistics
    }

    /// Replace every NaN cell with its column statistic.
    pub fn transform(&self, row: &FeatureVector) -> FeatureVector {
        let mut out = row.clone();
        for (value, &fill) in out.values.iter_mut().zip(self.statistics.iter()) {
            if value.is_nan() {
                *value = fill;
            }
        }
        out
    }
}

fn check_feature_names(names: &[String]) -> Result<(), String> {
    if names.len() != NUM_FEATURES {
        return Err(format!(
            "imputer was fit on {} features, expected {NUM_FEATURES}",
            names.len()
        ));
    }
    for (i, (got, want)) in names.iter().zip(FEATURE_NAMES.iter()).enumerate() {
        if got != want {
            return Err(format!(
                "imputer column {i} is '{got}', expected '{want}'"
            ));
        }
    }
    Ok(())
}
