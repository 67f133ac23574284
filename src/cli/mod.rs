//! CLI command definitions and handlers

mod doctor;
mod features;
pub(crate) mod predict;
mod serve;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::inference::{ArtifactPaths, InferenceService};

/// HR attrition risk predictor
///
/// Runs a pretrained GBDT classifier over employee attributes, either
/// through an interactive prompt or a web form.
#[derive(Parser, Debug)]
#[command(name = "attrition-risk")]
#[command(
    version,
    about = "Predict employee attrition risk from HR attributes",
    after_help = "\
Examples:
  attrition-risk                          Prompt for all 47 features
  attrition-risk predict --input emp.json Predict from a JSON field map
  attrition-risk serve --bind 0.0.0.0:8501  Start the web form
  attrition-risk features                 List the feature schema
  attrition-risk doctor                   Check that the model files load"
)]
pub struct Cli {
    /// Classifier artifact (XGBoost JSON dump or gbdt model)
    #[arg(long, global = true, env = "ATTRITION_MODEL")]
    pub model: Option<PathBuf>,

    /// Imputer artifact (JSON)
    #[arg(long, global = true, env = "ATTRITION_IMPUTER")]
    pub imputer: Option<PathBuf>,

    /// Config file (default: ./attrition.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict attrition for one employee (default command)
    #[command(after_help = "\
Without --input, prompts for each feature in schema order. Answers that are
not numbers count as 0.0.

Examples:
  attrition-risk predict
  attrition-risk predict --input employee.json --format json")]
    Predict {
        /// JSON object mapping feature names to values; skips the prompts
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Serve the prediction web form
    Serve {
        /// Listen address (default: 127.0.0.1:8501)
        #[arg(long, env = "ATTRITION_BIND")]
        bind: Option<String>,
    },

    /// List the 47 model features in schema order
    Features {
        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Check that the model and imputer load
    Doctor,
}

/// Load both artifacts or stop.
fn load_service(paths: &ArtifactPaths) -> Result<InferenceService> {
    InferenceService::load(paths).with_context(|| {
        format!(
            "Model or imputer file not found or unusable. Please ensure '{}' and '{}' are in the correct directory.",
            paths.model.display(),
            paths.imputer.display()
        )
    })
}

pub fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let paths = config.artifact_paths(cli.model, cli.imputer);

    match cli.command {
        None => predict::run(&load_service(&paths)?, None, "text"),

        Some(Commands::Predict { input, format }) => {
            predict::run(&load_service(&paths)?, input.as_deref(), &format)
        }

        Some(Commands::Serve { bind }) => {
            let service = load_service(&paths)?;
            serve::run(&config.bind(bind), service)
        }

        Some(Commands::Features { format }) => features::run(&format),

        Some(Commands::Doctor) => doctor::run(&paths),
    }
}
