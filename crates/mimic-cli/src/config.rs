//! CLI configuration and settings management

use crate::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration loaded from config files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MimicConfig {
    /// Output settings
    pub output: OutputConfig,

    /// Class pairs mimicked by `apply` when none is given on the command line
    pub pairs: Vec<MimicPair>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where `apply` writes the updated model; stdout when unset
    pub path: Option<PathBuf>,

    /// Log the added/skipped counts of every mimicked pair
    pub report: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: None,
            report: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MimicPair {
    pub source: String,
    pub destination: String,
}

impl MimicPair {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

impl MimicConfig {
    /// Load configuration from file or use defaults
    ///
    /// Without an explicit path, `<config dir>/mimic/config.toml` is read
    /// first and `./mimic.toml` is merged over it.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let mut config = Self::default();
        if let Some(system_config) = Self::default_config_path() {
            if system_config.exists() {
                config = config.merge(Self::load_from_file(&system_config)?);
            }
        }
        let local_config = Path::new("mimic.toml");
        if local_config.exists() {
            config = config.merge(Self::load_from_file(local_config)?);
        }
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            CliError::Config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CliError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Settings of `other` win; its pairs replace ours unless it lists none.
    pub fn merge(self, other: Self) -> Self {
        Self {
            output: other.output,
            pairs: if other.pairs.is_empty() {
                self.pairs
            } else {
                other.pairs
            },
        }
    }

    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mimic").join("config.toml"))
    }
}
