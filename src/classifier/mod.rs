//! Attrition classifier and imputer
//!
//! Both artifacts are fit offline and loaded once. This module only runs
//! them: the imputer fills NaN cells, the GBDT produces the probability of
//! the positive ("attrition") class, and [`Prediction`] turns that into a
//! label with the same decision rule XGBoost's `predict` uses.

pub mod gbdt_model;
pub mod imputer;

pub use gbdt_model::AttritionClassifier;
pub use imputer::{ImputeStrategy, SimpleImputer};

use serde::Serialize;

/// Probability above which the label is 1.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Anything that maps one canonical-order row to a positive-class probability.
///
/// Implemented by [`AttritionClassifier`]; tests plug in fixed models.
pub trait RiskModel: Send + Sync {
    fn positive_probability(&self, row: &[f64]) -> f64;
}

/// Outcome of a single prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    /// 1 = attrition, 0 = stays.
    pub label: u8,
    /// Probability of attrition (0.0..=1.0).
    pub probability: f64,
}

impl Prediction {
    /// Build a prediction from a raw positive-class probability.
    ///
    /// Out-of-range values are clamped; a NaN falls back to the threshold
    /// itself, which labels as 0.
    pub fn from_probability(probability: f64) -> Self {
        let probability = if probability.is_nan() {
            DECISION_THRESHOLD
        } else {
            probability.clamp(0.0, 1.0)
        };
        Self {
            label: u8::from(probability > DECISION_THRESHOLD),
            probability,
        }
    }

    pub fn is_attrition(&self) -> bool {
        self.label == 1
    }

    /// Console wording for the label.
    pub fn label_text(&self) -> &'static str {
        if self.is_attrition() {
            "Attrition"
        } else {
            "No Attrition"
        }
    }

    /// Probability rounded to three decimals.
    pub fn rounded_probability(&self) -> f64 {
        (self.probability * 1000.0).round() / 1000.0
    }

    /// Probability as a percentage with two decimals, e.g. `"73.12%"`.
    pub fn percent(&self) -> String {
        format!("{:.2}%", self.probability * 100.0)
    }
}
