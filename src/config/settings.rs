//! Application settings configuration
//!
//! Defaults for the check itself and for how results are printed. Every
//! value can be overridden from the command line.

use crate::cli::OutputFormat;
use crate::runner::DEFAULT_TIMEOUT_SECS;
use crate::utils::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "checkssl.toml";

/// Check settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CheckSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub days: i64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            days: 0,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_color")]
    pub color: bool,
    #[serde(default)]
    pub csv_header: bool,
}

fn default_color() -> bool {
    true
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
            csv_header: false,
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub check: CheckSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

impl Settings {
    /// Load settings from the default config file, if present
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_path = Path::new(DEFAULT_CONFIG_FILE);
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
    }
}
