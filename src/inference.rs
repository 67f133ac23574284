//! Inference service shared by the CLI prompt and the web form
//!
//! An [`InferenceService`] only exists once both artifacts have loaded, so
//! holding one means the classifier and imputer are ready. It is built once
//! at startup and handed to whichever front-end runs; every `predict` call
//! after that is read-only.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::classifier::{AttritionClassifier, Prediction, RiskModel, SimpleImputer};
use crate::schema::{FeatureVector, FieldWarning};

/// Default classifier artifact, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "xgb_model.json";

/// Default imputer artifact, relative to the working directory.
pub const DEFAULT_IMPUTER_PATH: &str = "imputer.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Model,
    Imputer,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::Model => write!(f, "model"),
            ArtifactKind::Imputer => write!(f, "imputer"),
        }
    }
}

/// Startup failure loading one of the two artifacts.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("{kind} file not found: {}", .path.display())]
    Missing { kind: ArtifactKind, path: PathBuf },

    #[error("failed to read {kind} file {}: {source}", .path.display())]
    Unreadable {
        kind: ArtifactKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {kind} file {}: {message}", .path.display())]
    Malformed {
        kind: ArtifactKind,
        path: PathBuf,
        message: String,
    },
}

impl ArtifactError {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            ArtifactError::Missing { kind, .. }
            | ArtifactError::Unreadable { kind, .. }
            | ArtifactError::Malformed { kind, .. } => *kind,
        }
    }
}

/// Where to find the two artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub imputer: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from(DEFAULT_MODEL_PATH),
            imputer: PathBuf::from(DEFAULT_IMPUTER_PATH),
        }
    }
}

fn read_artifact(kind: ArtifactKind, path: &Path) -> Result<String, ArtifactError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::Missing {
                kind,
                path: path.to_path_buf(),
            }
        } else {
            ArtifactError::Unreadable {
                kind,
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Loaded classifier plus imputer.
pub struct InferenceService {
    model: Box<dyn RiskModel>,
    imputer: SimpleImputer,
}

impl InferenceService {
    /// Load both artifacts from disk.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        let model_json = read_artifact(ArtifactKind::Model, &paths.model)?;
        let model =
            AttritionClassifier::from_json(&model_json).map_err(|message| ArtifactError::Malformed {
                kind: ArtifactKind::Model,
                path: paths.model.clone(),
                message,
            })?;

        let imputer_json = read_artifact(ArtifactKind::Imputer, &paths.imputer)?;
        let imputer =
            SimpleImputer::from_json(&imputer_json).map_err(|message| ArtifactError::Malformed {
                kind: ArtifactKind::Imputer,
                path: paths.imputer.clone(),
                message,
            })?;

        tracing::info!(
            model = %paths.model.display(),
            imputer = %paths.imputer.display(),
            strategy = %imputer.strategy(),
            "loaded attrition model"
        );
        Ok(Self::new(model, imputer))
    }

    /// Assemble a service from already-loaded parts.
    pub fn new(model: impl RiskModel + 'static, imputer: SimpleImputer) -> Self {
        Self {
            model: Box::new(model),
            imputer,
        }
    }

    /// Predict from a name → value mapping.
    ///
    /// Missing fields count as 0.0, unknown fields are ignored.
    pub fn predict(&self, raw: &HashMap<String, f64>) -> Prediction {
        self.predict_features(&FeatureVector::project(raw))
    }

    /// Predict from unparsed values; anything non-numeric becomes 0.0.
    pub fn predict_lenient(&self, raw: &HashMap<String, String>) -> (Prediction, Vec<FieldWarning>) {
        let (features, warnings) = FeatureVector::project_lenient(raw);
        (self.predict_features(&features), warnings)
    }

    /// Predict from a row already in canonical order.
    pub fn predict_features(&self, features: &FeatureVector) -> Prediction {
        let imputed = self.imputer.transform(features);
        let probability = self.model.positive_probability(imputed.as_slice());
        let prediction = Prediction::from_probability(probability);
        tracing::debug!(
            label = prediction.label,
            probability = prediction.probability,
            "prediction"
        );
        prediction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ImputeStrategy;
    use crate::schema::{feature_index, NUM_FEATURES};

    /// Logistic over overtime and income, enough to exercise both labels.
    struct OvertimeModel;

    impl RiskModel for OvertimeModel {
        fn positive_probability(&self, row: &[f64]) -> f64 {
            let overtime = row[feature_index("OverTime_Yes").unwrap()];
            let income = row[feature_index("MonthlyIncome").unwrap()];
            let z = 2.0 * overtime - income / 5000.0;
            1.0 / (1.0 + (-z).exp())
        }
    }

    /// Echoes the first column so tests can see what reached the model.
    struct EchoAge;

    impl RiskModel for EchoAge {
        fn positive_probability(&self, row: &[f64]) -> f64 {
            row[0] / 100.0
        }
    }

    fn service() -> InferenceService {
        InferenceService::new(
            OvertimeModel,
            SimpleImputer::new(ImputeStrategy::Median, [0.0; NUM_FEATURES]),
        )
    }

    fn raw(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_overtime_low_income_is_well_formed() {
        let p = service().predict(&raw(&[("OverTime_Yes", 1.0), ("MonthlyIncome", 1000.0)]));
        assert!((0.0..=1.0).contains(&p.probability));
        assert!(p.label <= 1);
        assert_eq!(p.label == 1, p.probability > 0.5);
        assert!(p.is_attrition());
    }

    #[test]
    fn test_missing_satisfaction_fields_default_to_zero() {
        let p = service().predict(&raw(&[("Age", 35.0), ("MonthlyIncome", 5000.0)]));
        assert!((0.0..=1.0).contains(&p.probability));
        assert!(!p.is_attrition());
    }

    #[test]
    fn test_predict_is_idempotent() {
        let svc = service();
        let input = raw(&[("OverTime_Yes", 1.0), ("MonthlyIncome", 9000.0), ("Age", 44.0)]);
        assert_eq!(svc.predict(&input), svc.predict(&input));
    }

    #[test]
    fn test_imputer_runs_before_model() {
        let mut stats = [0.0; NUM_FEATURES];
        stats[0] = 40.0;
        let svc = InferenceService::new(EchoAge, SimpleImputer::new(ImputeStrategy::Mean, stats));

        let p = svc.predict(&raw(&[("Age", f64::NAN)]));
        assert!((p.probability - 0.4).abs() < 1e-12);

        // Absent fields are 0.0 before the imputer sees them, so no fill
        let p = svc.predict(&HashMap::new());
        assert_eq!(p.probability, 0.0);
    }

    #[test]
    fn test_predict_lenient_falls_back_to_zero() {
        let svc = InferenceService::new(
            EchoAge,
            SimpleImputer::new(ImputeStrategy::Mean, [0.0; NUM_FEATURES]),
        );
        let mut input = HashMap::new();
        input.insert("Age".to_string(), "forty".to_string());
        let (p, warnings) = svc.predict_lenient(&input);
        assert_eq!(p.probability, 0.0);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "Age");
    }

    #[test]
    fn test_load_missing_model_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths {
            model: dir.path().join("xgb_model.json"),
            imputer: dir.path().join("imputer.json"),
        };
        let err = InferenceService::load(&paths).err().expect("load should fail");
        assert!(matches!(err, ArtifactError::Missing { .. }));
        assert_eq!(err.kind(), ArtifactKind::Model);
        assert!(err.to_string().contains("model file not found"));
    }

    #[test]
    fn test_load_corrupt_model_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("xgb_model.json");
        std::fs::write(&model, "definitely not json").unwrap();
        let paths = ArtifactPaths {
            model,
            imputer: dir.path().join("imputer.json"),
        };
        let err = InferenceService::load(&paths).err().expect("load should fail");
        assert!(matches!(err, ArtifactError::Malformed { kind: ArtifactKind::Model, .. }));
    }

    #[test]
    fn test_default_paths() {
        let paths = ArtifactPaths::default();
        assert_eq!(paths.model, PathBuf::from("xgb_model.json"));
        assert_eq!(paths.imputer, PathBuf::from("imputer.json"));
    }
}
