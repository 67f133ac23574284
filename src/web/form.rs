//! Form layout and submission decoding
//!
//! The form only asks for the attributes that matter most; every other
//! column stays at 0.0. Numeric widgets carry their range so the browser
//! enforces it, but decoding does not: out-of-range values go to the model
//! as submitted.

use std::collections::HashMap;

use crate::schema::categorical::{
    CategoricalAttribute, BUSINESS_TRAVEL, GENDER, MARITAL_STATUS, OVERTIME,
};
use crate::schema::{derived, parse_lenient, FeatureVector};

/// A numeric input bound to one schema column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericInput {
    pub field: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

const fn numeric(
    field: &'static str,
    label: &'static str,
    min: f64,
    max: f64,
    default: f64,
    step: f64,
) -> NumericInput {
    NumericInput {
        field,
        label,
        min,
        max,
        default,
        step,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Widget {
    Slider(NumericInput),
    Number(NumericInput),
    Radio(&'static CategoricalAttribute),
    Select(&'static CategoricalAttribute),
}

impl Widget {
    /// Form key the widget submits under.
    pub fn key(&self) -> &'static str {
        match self {
            Widget::Slider(n) | Widget::Number(n) => n.field,
            Widget::Radio(a) | Widget::Select(a) => a.key,
        }
    }

    /// Value shown before the user touches the widget.
    pub fn default_value(&self) -> String {
        match self {
            Widget::Slider(n) | Widget::Number(n) => format_number(n.default),
            Widget::Radio(a) | Widget::Select(a) => a
                .choices
                .first()
                .map(|c| c.label.to_string())
                .unwrap_or_default(),
        }
    }
}

/// A titled group of widgets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Section {
    pub title: &'static str,
    /// Rendered folded away until opened.
    pub collapsible: bool,
    pub widgets: &'static [Widget],
}

pub static SECTIONS: [Section; 3] = [
    Section {
        title: "Demographics & Background",
        collapsible: false,
        widgets: &[
            Widget::Slider(numeric("Age", "Age", 18.0, 70.0, 35.0, 1.0)),
            Widget::Slider(numeric(
                "DistanceFromHome",
                "Distance From Home (miles)",
                1.0,
                30.0,
                5.0,
                1.0,
            )),
            Widget::Number(numeric(
                "NumCompaniesWorked",
                "Number of Past Companies",
                0.0,
                20.0,
                2.0,
                1.0,
            )),
            Widget::Radio(&GENDER),
            Widget::Select(&MARITAL_STATUS),
        ],
    },
    Section {
        title: "Job & Compensation Details",
        collapsible: false,
        widgets: &[
            Widget::Number(numeric(
                "MonthlyIncome",
                "Monthly Income ($)",
                1000.0,
                20000.0,
                5000.0,
                100.0,
            )),
            Widget::Slider(numeric(
                "PercentSalaryHike",
                "Percent Salary Hike",
                10.0,
                25.0,
                15.0,
                1.0,
            )),
            Widget::Slider(numeric(
                "TotalWorkingYears",
                "Total Working Years",
                0.0,
                50.0,
                10.0,
                1.0,
            )),
            Widget::Radio(&OVERTIME),
            Widget::Select(&BUSINESS_TRAVEL),
        ],
    },
    Section {
        title: "Show More Details (Satisfaction, etc.)",
        collapsible: true,
        widgets: &[
            Widget::Slider(numeric("JobSatisfaction", "Job Satisfaction", 1.0, 4.0, 3.0, 1.0)),
            Widget::Slider(numeric(
                "EnvironmentSatisfaction",
                "Environment Satisfaction",
                1.0,
                4.0,
                3.0,
                1.0,
            )),
            Widget::Slider(numeric(
                "RelationshipSatisfaction",
                "Relationship Satisfaction",
                1.0,
                4.0,
                3.0,
                1.0,
            )),
            Widget::Slider(numeric("WorkLifeBalance", "Work-Life Balance", 1.0, 4.0, 3.0, 1.0)),
            Widget::Slider(numeric(
                "YearsAtCompany",
                "Years at Company",
                0.0,
                40.0,
                5.0,
                1.0,
            )),
            Widget::Slider(numeric(
                "YearsSinceLastPromotion",
                "Years Since Last Promotion",
                0.0,
                15.0,
                1.0,
                1.0,
            )),
        ],
    },
];

/// Render a number without a trailing `.0` for whole values.
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

/// Turn a form submission into a feature row.
///
/// Absent widgets take their default. Values that do not parse, and choices
/// that are not offered, fall back (to 0.0 or the baseline category) and are
/// reported in the returned warnings.
pub fn decode_submission(form: &HashMap<String, String>) -> (FeatureVector, Vec<String>) {
    let mut features = FeatureVector::zeros();
    let mut warnings = Vec::new();

    for widget in SECTIONS.iter().flat_map(|s| s.widgets.iter()) {
        let submitted = form.get(widget.key()).cloned();
        let value = submitted.unwrap_or_else(|| widget.default_value());
        match widget {
            Widget::Slider(n) | Widget::Number(n) => match parse_lenient(&value) {
                Ok(v) => {
                    features.set(n.field, v);
                }
                Err(e) => {
                    tracing::warn!(field = n.field, "{e}, using 0.0");
                    warnings.push(format!("Invalid input for {}, using 0.0", n.label));
                }
            },
            Widget::Radio(attr) | Widget::Select(attr) => {
                if let Err(e) = attr.encode(&value, &mut features) {
                    tracing::warn!("{e}");
                    let fallback = attr.baseline().map(|c| c.label).unwrap_or("none");
                    warnings.push(format!("Unknown {} '{}', using {}", attr.label, value, fallback));
                }
            }
        }
    }

    derived::fill(&mut features);
    for name in [derived::TENURE_RATIO, derived::PROMOTION_GAP] {
        if let Some(value) = form.get(name) {
            match parse_lenient(value) {
                Ok(v) => {
                    features.set(name, v);
                }
                Err(e) => {
                    tracing::warn!(field = name, "{e}, keeping computed value");
                    warnings.push(format!("Invalid input for {name}, using computed value"));
                }
            }
        }
    }
    (features, warnings)
}
