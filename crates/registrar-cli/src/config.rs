//! CLI configuration

use crate::error::{CliError, CliResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Directory holding the package manifests
    pub root: Option<PathBuf>,

    /// Packages scanned when `--pkgs` is not given
    #[serde(default)]
    pub workflow_packages: Vec<String>,

    /// Default project
    pub project: Option<String>,

    /// Default domain
    pub domain: Option<String>,

    /// Default registration version
    pub version: Option<String>,

    /// Container image whose tag is the version when none is set
    pub image: Option<String>,

    /// Local registry directory
    pub registry_dir: Option<PathBuf>,
}

impl CliConfig {
    /// Load configuration from file. A missing file gives the defaults.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path()?,
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            Self::parse(&contents)
        } else {
            Ok(CliConfig::default())
        }
    }

    pub fn parse(contents: &str) -> CliResult<Self> {
        toml::from_str(contents).map_err(|e| CliError::Config(e.to_string()))
    }

    /// Get the default configuration file path
    fn default_config_path() -> CliResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CliError::Config("Cannot find config directory".into()))?;
        Ok(config_dir.join("registrar").join("config.toml"))
    }
}
