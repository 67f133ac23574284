//! attrition-risk - employee attrition prediction
//!
//! Loads a pretrained GBDT classifier and its fitted imputer once, then
//! serves predictions through an interactive prompt or a web form. Both
//! front-ends share one [`inference::InferenceService`] and one feature
//! schema ([`schema::FEATURE_NAMES`]).

pub mod classifier;
pub mod cli;
pub mod config;
pub mod inference;
pub mod schema;
pub mod web;

pub use classifier::Prediction;
pub use inference::{ArtifactError, ArtifactPaths, InferenceService};
pub use schema::{FeatureVector, FEATURE_NAMES, NUM_FEATURES};
