//! Configuration module for checkssl
//!
//! Handles loading settings from TOML files.

pub mod settings;

pub use settings::{CheckSettings, OutputSettings, Settings, DEFAULT_CONFIG_FILE};

use crate::utils::Result;
use std::path::Path;

/// Load settings from an explicit path, or the default file when none is given
pub fn load_settings<P: AsRef<Path>>(path: Option<P>) -> Result<Settings> {
    let settings = match path {
        Some(path) => Settings::load_from_file(path)?,
        None => Settings::load_default()?,
    };
    Ok(settings)
}
