//! On-disk CLI configuration.
//!
//! ```toml
//! format = "json"
//!
//! [builder]
//! property_order = "sorted"
//! max_parameters = 512
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::OutputFormat;
use crate::query::BuilderOptions;

/// Loaded CLI configuration; defaults apply when no file exists.
#[derive(Debug, Default)]
pub struct CliConfig {
    path: Option<PathBuf>,
    data: RawConfig,
}

impl CliConfig {
    /// Loads `explicit`, or the default config path when `None`.
    ///
    /// A missing file yields the defaults; an unreadable or invalid one is an
    /// error.
    pub fn load(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = explicit.or_else(default_config_path);
        let data = match path.as_ref() {
            Some(config_path) if config_path.exists() => read_file(config_path)?,
            _ => RawConfig::default(),
        };
        debug!(path = ?path, "cli config loaded");
        Ok(Self { path, data })
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let data = toml::from_str(input).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        Ok(Self { path: None, data })
    }

    /// Path the configuration was looked up at.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Builder options from the `[builder]` section.
    pub fn builder_options(&self) -> &BuilderOptions {
        &self.data.builder
    }

    /// Preferred output format, if configured.
    pub fn default_format(&self) -> Option<OutputFormat> {
        self.data.format
    }
}

fn read_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    format: Option<OutputFormat>,
    #[serde(default)]
    builder: BuilderOptions,
}

/// Errors raised while loading the CLI configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read CLI config {path}: {source}")]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The config file is not valid TOML or has unknown keys.
    #[error("failed to parse CLI config {path}: {source}")]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

/// Default location of the CLI config file.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("sombra").join("cypher.toml"))
}
