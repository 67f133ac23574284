//! One-hot encoding of the categorical HR attributes
//!
//! Each attribute lists its choices as shown to the user and the indicator
//! column each choice switches on. The dropped (baseline) category of every
//! attribute has no column: selecting it leaves the whole group at 0.

use thiserror::Error;

use super::FeatureVector;

/// One selectable value of a categorical attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    /// Label shown in the form.
    pub label: &'static str,
    /// Indicator column set to 1, or `None` for the baseline category.
    pub indicator: Option<&'static str>,
}

const fn choice(label: &'static str, indicator: Option<&'static str>) -> Choice {
    Choice { label, indicator }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{choice}' is not a valid {attribute}")]
pub struct UnknownChoice {
    pub attribute: &'static str,
    pub choice: String,
}

/// A categorical attribute and its one-hot group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoricalAttribute {
    /// Form field key.
    pub key: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    pub choices: &'static [Choice],
}

impl CategoricalAttribute {
    /// Indicator columns owned by this attribute.
    pub fn indicators(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.choices.iter().filter_map(|c| c.indicator)
    }

    pub fn find(&self, label: &str) -> Option<&Choice> {
        let label = label.trim();
        self.choices
            .iter()
            .find(|c| c.label.eq_ignore_ascii_case(label))
    }

    /// The choice that switches no indicator on.
    pub fn baseline(&self) -> Option<&Choice> {
        self.choices.iter().find(|c| c.indicator.is_none())
    }

    /// Write the group's indicators for `label` into `features`.
    ///
    /// Every indicator of the group is written: the selected one to 1.0,
    /// the rest to 0.0.
    pub fn encode(&self, label: &str, features: &mut FeatureVector) -> Result<(), UnknownChoice> {
        let selected = self.find(label).ok_or_else(|| UnknownChoice {
            attribute: self.key,
            choice: label.to_string(),
        })?;
        for indicator in self.indicators() {
            let on = selected.indicator == Some(indicator);
            features.set(indicator, if on { 1.0 } else { 0.0 });
        }
        Ok(())
    }
}

pub const GENDER: CategoricalAttribute = CategoricalAttribute {
    key: "Gender",
    label: "Gender",
    choices: &[
        choice("Male", Some("Gender_Male")),
        choice("Female", None),
    ],
};

pub const MARITAL_STATUS: CategoricalAttribute = CategoricalAttribute {
    key: "MaritalStatus",
    label: "Marital Status",
    choices: &[
        choice("Single", Some("MaritalStatus_Single")),
        choice("Married", Some("MaritalStatus_Married")),
        choice("Divorced", None),
    ],
};

pub const DEPARTMENT: CategoricalAttribute = CategoricalAttribute {
    key: "Department",
    label: "Department",
    choices: &[
        choice("Research & Development", Some("Department_Research & Development")),
        choice("Sales", Some("Department_Sales")),
        choice("Human Resources", None),
    ],
};

pub const JOB_ROLE: CategoricalAttribute = CategoricalAttribute {
    key: "JobRole",
    label: "Job Role",
    choices: &[
        choice("Healthcare Representative", None),
        choice("Human Resources", Some("JobRole_Human Resources")),
        choice("Laboratory Technician", Some("JobRole_Laboratory Technician")),
        choice("Manager", Some("JobRole_Manager")),
        choice("Manufacturing Director", Some("JobRole_Manufacturing Director")),
        choice("Research Director", Some("JobRole_Research Director")),
        choice("Research Scientist", Some("JobRole_Research Scientist")),
        choice("Sales Executive", Some("JobRole_Sales Executive")),
        choice("Sales Representative", Some("JobRole_Sales Representative")),
    ],
};

pub const EDUCATION_FIELD: CategoricalAttribute = CategoricalAttribute {
    key: "EducationField",
    label: "Education Field",
    choices: &[
        choice("Human Resources", None),
        choice("Life Sciences", Some("EducationField_Life Sciences")),
        choice("Marketing", Some("EducationField_Marketing")),
        choice("Medical", Some("EducationField_Medical")),
        choice("Other", Some("EducationField_Other")),
        choice("Technical Degree", Some("EducationField_Technical Degree")),
    ],
};

pub const BUSINESS_TRAVEL: CategoricalAttribute = CategoricalAttribute {
    key: "BusinessTravel",
    label: "Business Travel Frequency",
    choices: &[
        choice("Travel Frequently", Some("BusinessTravel_Travel_Frequently")),
        choice("Travel Rarely", Some("BusinessTravel_Travel_Rarely")),
        choice("Non-Travel", None),
    ],
};

pub const OVERTIME: CategoricalAttribute = CategoricalAttribute {
    key: "OverTime",
    label: "Works Overtime?",
    choices: &[choice("Yes", Some("OverTime_Yes")), choice("No", None)],
};

/// Every categorical attribute, in the order their indicators appear.
pub static ATTRIBUTES: [CategoricalAttribute; 7] = [
    GENDER,
    DEPARTMENT,
    JOB_ROLE,
    MARITAL_STATUS,
    EDUCATION_FIELD,
    BUSINESS_TRAVEL,
    OVERTIME,
];

pub fn attribute(key: &str) -> Option<&'static CategoricalAttribute> {
    ATTRIBUTES.iter().find(|a| a.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{feature_index, FeatureKind, FEATURE_NAMES, NUM_FEATURES};
    use std::collections::HashSet;

    #[test]
    fn test_indicators_exist_in_schema() {
        for attr in ATTRIBUTES.iter() {
            for ind in attr.indicators() {
                let idx = feature_index(ind)
                    .unwrap_or_else(|| panic!("{ind} missing from schema"));
                assert_eq!(FeatureKind::of_index(idx), FeatureKind::Indicator);
            }
        }
    }

    #[test]
    fn test_indicators_cover_all_indicator_columns_once() {
        let mut seen = HashSet::new();
        for attr in ATTRIBUTES.iter() {
            for ind in attr.indicators() {
                assert!(seen.insert(ind), "{ind} claimed by two attributes");
            }
        }
        let schema_indicators: HashSet<&str> = (0..NUM_FEATURES)
            .filter(|&i| FeatureKind::of_index(i) == FeatureKind::Indicator)
            .map(|i| FEATURE_NAMES[i])
            .collect();
        assert_eq!(seen, schema_indicators);
    }

    #[test]
    fn test_single_selection_is_mutually_exclusive() {
        for attr in ATTRIBUTES.iter() {
            for c in attr.choices {
                let mut fv = FeatureVector::zeros();
                attr.encode(c.label, &mut fv).unwrap();
                let on: Vec<&str> = attr
                    .indicators()
                    .filter(|ind| fv.get(ind) == Some(1.0))
                    .collect();
                match c.indicator {
                    Some(ind) => assert_eq!(on, vec![ind], "{} / {}", attr.key, c.label),
                    None => assert!(on.is_empty(), "{} baseline set {:?}", attr.key, on),
                }
            }
        }
    }

    #[test]
    fn test_reencode_clears_previous_selection() {
        let mut fv = FeatureVector::zeros();
        MARITAL_STATUS.encode("Single", &mut fv).unwrap();
        MARITAL_STATUS.encode("Married", &mut fv).unwrap();
        assert_eq!(fv.get("MaritalStatus_Single"), Some(0.0));
        assert_eq!(fv.get("MaritalStatus_Married"), Some(1.0));
    }

    #[test]
    fn test_encode_leaves_other_groups_alone() {
        let mut fv = FeatureVector::zeros();
        fv.set("OverTime_Yes", 1.0);
        BUSINESS_TRAVEL.encode("Travel Rarely", &mut fv).unwrap();
        assert_eq!(fv.get("OverTime_Yes"), Some(1.0));
        assert_eq!(fv.get("BusinessTravel_Travel_Rarely"), Some(1.0));
    }

    #[test]
    fn test_unknown_choice() {
        let mut fv = FeatureVector::zeros();
        let err = GENDER.encode("Robot", &mut fv).unwrap_err();
        assert_eq!(err.attribute, "Gender");
        assert_eq!(fv, FeatureVector::zeros());
    }

    #[test]
    fn test_choice_lookup_is_case_insensitive() {
        assert!(OVERTIME.find("yes").is_some());
        assert!(BUSINESS_TRAVEL.find(" non-travel ").is_some());
        assert_eq!(attribute("JobRole"), Some(&JOB_ROLE));
        assert!(attribute("Shoe").is_none());
    }

    #[test]
    fn test_every_attribute_has_one_baseline() {
        for attr in ATTRIBUTES.iter() {
            let baselines = attr.choices.iter().filter(|c| c.indicator.is_none()).count();
            assert_eq!(baselines, 1, "{}", attr.key);
        }
    }
}
