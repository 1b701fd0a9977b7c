//! Data models for checkssl
//!
//! This module contains the result types produced by a check and consumed
//! by the renderers.

pub mod checked_server;
pub mod status;

pub use checked_server::{CheckCert, CheckedServer, MISSING_COMMON_NAME};
pub use status::CheckStatus;
