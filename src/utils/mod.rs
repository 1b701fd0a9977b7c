//! Utility modules for checkssl
//!
//! This module contains the error types shared by the checks and the binary.

pub mod error;

pub use error::{ConfigError, ProbeError, Result, ToolkitError};
