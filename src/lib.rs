//! checkssl library
//!
//! Checks the TLS certificate chain a server presents:
//! - connects to a target and records the negotiated TLS parameters
//! - classifies every certificate against an expiry threshold
//! - retries without chain validation to report untrusted chains
//! - renders the result as text, JSON or CSV
//!
//! # Usage
//!
//! ```rust,ignore
//! use checkssl::runner::check_server;
//! use chrono::{Duration, Utc};
//!
//! #[tokio::main]
//! async fn main() {
//!     let threshold = Utc::now() + Duration::days(30);
//!     let result = check_server("example.com", threshold, 15, false).await;
//!     println!("{} exit={}", result.target, result.exit_code);
//! }
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod models;
pub mod output;
pub mod runner;
pub mod utils;
pub mod web;

// Re-export commonly used types
pub use cli::{Cli, OutputFormat};
pub use config::Settings;
pub use models::{CheckCert, CheckStatus, CheckedServer};
pub use runner::{check_server, Checker, DEFAULT_TIMEOUT_SECS};
pub use utils::{ProbeError, Result, ToolkitError};
