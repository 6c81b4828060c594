//! Application configuration: built-in defaults, then an optional YAML file, then environment.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::catalog::DEFAULT_CATALOG_PATH;
use crate::planning::PlanAssumptions;

pub const DEFAULT_CONFIG_PATH: &str = "riadesk.yaml";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_REASONING_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_FAST_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid config value '{field}': {message}")]
    Invalid { field: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub endpoint: String,
    /// Never written back out; comes from the file or `GEMINI_API_KEY` / `API_KEY`.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub reasoning_model: String,
    pub fast_model: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            reasoning_model: DEFAULT_REASONING_MODEL.to_string(),
            fast_model: DEFAULT_FAST_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind: String,
    pub data_dir: PathBuf,
    pub catalog_path: PathBuf,
    pub advisor: AdvisorConfig,
    pub planning: PlanAssumptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            advisor: AdvisorConfig::default(),
            planning: PlanAssumptions::default(),
        }
    }
}

impl AppConfig {
    /// Load from `RIADESK_CONFIG` (or [DEFAULT_CONFIG_PATH]) and the process environment.
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("RIADESK_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        let mut config = Self::from_file(&path)?;
        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the projection meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.planning.validate()
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(raw) => Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Overlay environment variables; `lookup` returns None for unset names.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(bind) = non_empty("RIADESK_BIND") {
            self.bind = bind;
        }
        if let Some(dir) = non_empty("RIADESK_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(catalog) = non_empty("RIADESK_CATALOG") {
            self.catalog_path = PathBuf::from(catalog);
        }
        if let Some(key) = non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")) {
            self.advisor.api_key = Some(key);
        }
        if let Some(model) = non_empty("RIADESK_REASONING_MODEL") {
            self.advisor.reasoning_model = model;
        }
        if let Some(model) = non_empty("RIADESK_FAST_MODEL") {
            self.advisor.fast_model = model;
        }
    }
}
