//! Configuration file for docblock-checker.
//!
//! The configuration mirrors the command-line switches so a project can
//! commit its settings. Command-line flags are applied on top.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::detect::{ExcludeSet, ScanConfig};

/// File names searched for in the working directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &[".docblock-checker.yaml", "docblock-checker.yaml"];

/// Contents of the default configuration written by `init`.
pub const DEFAULT_TEMPLATE: &str = include_str!("templates/default.yaml");

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(flatten)]
    pub scan: ScanConfig,
    /// Paths or glob patterns, relative to the scanned directory.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Extensions (without dot) scanned during directory walks.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    vec!["php".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            exclude: Vec::new(),
            extensions: default_extensions(),
        }
    }
}

impl Config {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        // An empty file deserializes to null; treat it as all defaults.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Build the matcher for `exclude`.
    pub fn exclude_set(&self) -> anyhow::Result<ExcludeSet> {
        ExcludeSet::new(&self.exclude)
    }
}

/// Look for a configuration file in `dir`.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Validate a configuration for correctness.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    if config.extensions.is_empty() {
        anyhow::bail!("extensions must not be empty");
    }
    for ext in &config.extensions {
        if ext.is_empty() || ext.starts_with('.') {
            anyhow::bail!("invalid extension {:?}, give it without the leading dot", ext);
        }
    }

    config.exclude_set()?;

    Ok(())
}
