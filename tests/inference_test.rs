//! Inference service against a real trained model
//!
//! Loads artifacts through the same path the binaries use and checks the
//! prediction contract: bounded probability, consistent label, idempotence,
//! and zero-filling of absent fields.

use std::collections::HashMap;

use attrition_risk::schema::categorical::MARITAL_STATUS;
use attrition_risk::{ArtifactPaths, FeatureVector, InferenceService, FEATURE_NAMES};

mod common;
use common::{write_artifacts, write_dump_artifacts};

fn load() -> (tempfile::TempDir, InferenceService) {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let paths = ArtifactPaths {
        model: dir.path().join("xgb_model.json"),
        imputer: dir.path().join("imputer.json"),
    };
    let service = InferenceService::load(&paths).expect("artifacts should load");
    (dir, service)
}

fn raw(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn test_overtime_low_income_scenario() {
    let (_dir, service) = load();
    let all_zero: HashMap<String, f64> = FEATURE_NAMES
        .iter()
        .map(|n| (n.to_string(), 0.0))
        .chain([
            ("OverTime_Yes".to_string(), 1.0),
            ("MonthlyIncome".to_string(), 1000.0),
        ])
        .collect();

    let p = service.predict(&all_zero);
    assert!((0.0..=1.0).contains(&p.probability), "{}", p.probability);
    assert!(p.label <= 1);
    assert_eq!(p.label == 1, p.probability > 0.5);
}

#[test]
fn test_omitted_satisfaction_fields() {
    let (_dir, service) = load();
    let partial = raw(&[("Age", 35.0), ("MonthlyIncome", 5000.0), ("OverTime_Yes", 0.0)]);
    let p = service.predict(&partial);
    assert!((0.0..=1.0).contains(&p.probability));

    // Same as spelling the satisfaction fields out as 0.0
    let mut explicit = partial.clone();
    for name in [
        "JobSatisfaction",
        "EnvironmentSatisfaction",
        "RelationshipSatisfaction",
        "WorkLifeBalance",
    ] {
        explicit.insert(name.to_string(), 0.0);
    }
    assert_eq!(service.predict(&explicit), p);
}

#[test]
fn test_predict_twice_identical() {
    let (_dir, service) = load();
    let input = raw(&[("Age", 27.0), ("OverTime_Yes", 1.0), ("MonthlyIncome", 2300.0)]);
    assert_eq!(service.predict(&input), service.predict(&input));
}

#[test]
fn test_extra_fields_ignored() {
    let (_dir, service) = load();
    let base = raw(&[("Age", 50.0), ("MonthlyIncome", 12000.0)]);
    let mut noisy = base.clone();
    noisy.insert("EmployeeNumber".to_string(), 1234.0);
    assert_eq!(service.predict(&base), service.predict(&noisy));
}

#[test]
fn test_nan_cells_are_imputed() {
    let (_dir, service) = load();
    // Fixture imputer fills MonthlyIncome with 4919
    let with_nan = service.predict(&raw(&[("MonthlyIncome", f64::NAN), ("OverTime_Yes", 1.0)]));
    let with_median = service.predict(&raw(&[("MonthlyIncome", 4919.0), ("OverTime_Yes", 1.0)]));
    assert_eq!(with_nan, with_median);
}

#[test]
fn test_marital_status_one_hot_through_service() {
    let (_dir, service) = load();
    let mut features = FeatureVector::zeros();
    MARITAL_STATUS.encode("Married", &mut features).unwrap();
    assert_eq!(features.get("MaritalStatus_Married"), Some(1.0));
    assert_eq!(features.get("MaritalStatus_Single"), Some(0.0));

    let p = service.predict_features(&features);
    assert!((0.0..=1.0).contains(&p.probability));
}

#[test]
fn test_xgboost_dump_through_service() {
    let dir = tempfile::tempdir().unwrap();
    write_dump_artifacts(dir.path());
    let paths = ArtifactPaths {
        model: dir.path().join("xgb_model.json"),
        imputer: dir.path().join("imputer.json"),
    };
    let service = InferenceService::load(&paths).expect("dump should load");
    let sigmoid = |x: f64| 1.0 / (1.0 + (-x).exp());

    let leaves = service.predict(&raw(&[("OverTime_Yes", 1.0), ("MonthlyIncome", 1000.0)]));
    assert!((leaves.probability - sigmoid(0.6)).abs() < 1e-6);
    assert_eq!(leaves.label, 1);

    let stays = service.predict(&raw(&[("OverTime_Yes", 0.0)]));
    assert!((stays.probability - sigmoid(-0.4)).abs() < 1e-6);
    assert_eq!(stays.label, 0);
}
