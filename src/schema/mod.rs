//! Canonical 47-feature schema for the attrition classifier
//!
//! The classifier and the imputer were both fit against one column order.
//! Every caller goes through [`FeatureVector::project`] (or its lenient
//! sibling) so the row handed to the imputer always has exactly these
//! columns, in exactly this order.
//!
//! Feature groups:
//!    0..24  Numeric / ordinal HR attributes
//!   24..26  Derived (tenure ratio, promotion gap), see [`derived`]
//!   26..47  One-hot indicators, see [`categorical`]

pub mod categorical;
pub mod derived;

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

/// Number of columns the model and imputer were fit on.
pub const NUM_FEATURES: usize = 47;

/// Index of the first one-hot indicator column.
const FIRST_INDICATOR: usize = 26;

/// Column names, in fit order.
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "Age",
    "DailyRate",
    "DistanceFromHome",
    "Education",
    "EmployeeCount",
    "EnvironmentSatisfaction",
    "HourlyRate",
    "JobInvolvement",
    "JobLevel",
    "JobSatisfaction",
    "MonthlyIncome",
    "MonthlyRate",
    "NumCompaniesWorked",
    "PercentSalaryHike",
    "PerformanceRating",
    "RelationshipSatisfaction",
    "StockOptionLevel",
    "TotalWorkingYears",
    "TrainingTimesLastYear",
    "WorkLifeBalance",
    "YearsAtCompany",
    "YearsInCurrentRole",
    "YearsSinceLastPromotion",
    "YearsWithCurrManager",
    "TenureRatio",
    "PromotionGap",
    "Gender_Male",
    "Department_Research & Development",
    "Department_Sales",
    "JobRole_Human Resources",
    "JobRole_Laboratory Technician",
    "JobRole_Manager",
    "JobRole_Manufacturing Director",
    "JobRole_Research Director",
    "JobRole_Research Scientist",
    "JobRole_Sales Executive",
    "JobRole_Sales Representative",
    "MaritalStatus_Married",
    "MaritalStatus_Single",
    "EducationField_Life Sciences",
    "EducationField_Marketing",
    "EducationField_Medical",
    "EducationField_Other",
    "EducationField_Technical Degree",
    "BusinessTravel_Travel_Frequently",
    "BusinessTravel_Travel_Rarely",
    "OverTime_Yes",
];

/// Position of a feature in the canonical order.
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_NAMES.iter().position(|&n| n == name)
}

/// How a column is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    /// Free-form numeric or ordinal HR attribute.
    Numeric,
    /// Computed by the caller from other attributes.
    Derived,
    /// 0/1 membership flag of a categorical attribute.
    Indicator,
}

impl FeatureKind {
    pub fn of_index(index: usize) -> Self {
        match FEATURE_NAMES[index] {
            derived::TENURE_RATIO | derived::PROMOTION_GAP => FeatureKind::Derived,
            _ if index >= FIRST_INDICATOR => FeatureKind::Indicator,
            _ => FeatureKind::Numeric,
        }
    }
}

impl std::fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureKind::Numeric => write!(f, "numeric"),
            FeatureKind::Derived => write!(f, "derived"),
            FeatureKind::Indicator => write!(f, "indicator"),
        }
    }
}

// ---------------------------------------------------------------------------
// Lenient value parsing
// ---------------------------------------------------------------------------

/// A field value that could not be read as a number.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("'{raw}' is not a number")]
pub struct InvalidValue {
    pub raw: String,
}

/// Parse a user-supplied value as `f64`.
///
/// Surrounding whitespace is ignored. `nan` is accepted and left for the
/// imputer to fill.
pub fn parse_lenient(raw: &str) -> Result<f64, InvalidValue> {
    raw.trim().parse::<f64>().map_err(|_| InvalidValue {
        raw: raw.to_string(),
    })
}

/// Flatten a JSON object into raw strings for lenient projection.
///
/// Numbers keep their textual form and booleans become `1`/`0`. Anything
/// else is passed through as its JSON text, which then fails to parse.
pub fn stringify_json_values(
    object: &serde_json::Map<String, serde_json::Value>,
) -> HashMap<String, String> {
    object
        .iter()
        .map(|(k, v)| {
            let text = match v {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Bool(b) => u8::from(*b).to_string(),
                other => other.to_string(),
            };
            (k.clone(), text)
        })
        .collect()
}

/// A field that fell back to 0.0 during lenient projection.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldWarning {
    pub field: &'static str,
    pub error: InvalidValue,
}

impl std::fmt::Display for FieldWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid input for {}, using 0.0", self.field)
    }
}

// ---------------------------------------------------------------------------
// Feature vector
// ---------------------------------------------------------------------------

/// One row in canonical column order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub values: [f64; NUM_FEATURES],
}

impl FeatureVector {
    pub fn new(values: [f64; NUM_FEATURES]) -> Self {
        Self { values }
    }

    /// All-zero row.
    pub fn zeros() -> Self {
        Self::new([0.0; NUM_FEATURES])
    }

    /// Project a name → value mapping onto the canonical order.
    ///
    /// Missing fields become 0.0; keys outside the schema are ignored.
    pub fn project(raw: &HashMap<String, f64>) -> Self {
        let mut values = [0.0_f64; NUM_FEATURES];
        for (slot, name) in values.iter_mut().zip(FEATURE_NAMES.iter()) {
            if let Some(&v) = raw.get(*name) {
                *slot = v;
            }
        }
        let ignored = raw.keys().filter(|k| feature_index(k).is_none()).count();
        if ignored > 0 {
            tracing::debug!("ignored {ignored} field(s) outside the feature schema");
        }
        Self { values }
    }

    /// Like [`FeatureVector::project`], but for unparsed string values.
    ///
    /// Anything that does not parse becomes 0.0 and is reported back so the
    /// front-end can tell the user.
    pub fn project_lenient(raw: &HashMap<String, String>) -> (Self, Vec<FieldWarning>) {
        let mut values = [0.0_f64; NUM_FEATURES];
        let mut warnings = Vec::new();
        for (slot, &name) in values.iter_mut().zip(FEATURE_NAMES.iter()) {
            let Some(text) = raw.get(name) else {
                continue;
            };
            match parse_lenient(text) {
                Ok(v) => *slot = v,
                Err(error) => {
                    tracing::warn!(field = name, "{error}, using 0.0");
                    warnings.push(FieldWarning { field: name, error });
                }
            }
        }
        (Self { values }, warnings)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        feature_index(name).map(|i| self.values[i])
    }

    /// Set a field by name. Returns `false` if the name is not in the schema.
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        match feature_index(name) {
            Some(i) => {
                self.values[i] = value;
                true
            }
            None => false,
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Name/value pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::zeros()
    }
}
