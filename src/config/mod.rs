//! Configuration for attrition-risk
//!
//! Settings come from, highest priority first:
//! - CLI flags (and their `ATTRITION_*` environment variables)
//! - `attrition.toml` in the working directory, or the file given by `--config`
//! - Built-in defaults
//!
//! ```toml
//! [artifacts]
//! model = "xgb_model.json"
//! imputer = "imputer.json"
//!
//! [server]
//! bind = "127.0.0.1:8501"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::inference::ArtifactPaths;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "attrition.toml";

/// Default listen address for the web form.
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactsConfig {
    /// Classifier artifact path
    pub model: Option<PathBuf>,
    /// Imputer artifact path
    pub imputer: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Listen address, e.g. "0.0.0.0:8080"
    pub bind: Option<String>,
}

impl AppConfig {
    /// Load the config file.
    ///
    /// An explicit path must exist. The default file is optional, but if it
    /// exists it must parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Artifact locations after applying CLI overrides.
    pub fn artifact_paths(&self, model: Option<PathBuf>, imputer: Option<PathBuf>) -> ArtifactPaths {
        let defaults = ArtifactPaths::default();
        ArtifactPaths {
            model: model
                .or_else(|| self.artifacts.model.clone())
                .unwrap_or(defaults.model),
            imputer: imputer
                .or_else(|| self.artifacts.imputer.clone())
                .unwrap_or(defaults.imputer),
        }
    }

    /// Listen address after applying the CLI override.
    pub fn bind(&self, cli: Option<String>) -> String {
        cli.or_else(|| self.server.bind.clone())
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
    }
}
