//! Custom error types for checkssl
//!
//! This module defines the failure modes of a single probe and of
//! configuration loading using `thiserror`. The orchestrator turns every
//! probe error into fields of the returned result, so these types never
//! reach the caller of a check.

use std::net::IpAddr;
use thiserror::Error;

/// Top-level error type for the checkssl binary
#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of a single connection probe
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("invalid target {target}: {message}")]
    InvalidTarget { target: String, message: String },

    #[error("no Host in request URL")]
    MissingHost,

    #[error("lookup {host}: {message}")]
    Dns { host: String, message: String },

    #[error("{phase} timed out after {seconds}s")]
    Timeout { phase: &'static str, seconds: u64 },

    #[error("connection refused by {ip}:{port}")]
    ConnectionRefused { ip: IpAddr, port: u16 },

    #[error("connection to {host}:{port} failed: {message}")]
    Connection {
        host: String,
        port: u16,
        message: String,
    },

    #[error("tls: {message}")]
    Certificate { message: String },

    #[error("tls handshake failed: {message}")]
    Handshake { message: String },

    #[error("certificate could not be parsed: {message}")]
    UnparsableCertificate { message: String },

    #[error("http request failed: {message}")]
    Http { message: String },

    #[error("TLS configuration error: {message}")]
    Configuration { message: String },
}

impl ProbeError {
    /// Whether the failure means the server never answered in time
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProbeError::Timeout { .. })
    }

    /// Whether the trust layer rejected the presented chain
    pub fn is_certificate_error(&self) -> bool {
        matches!(self, ProbeError::Certificate { .. })
    }

    /// The underlying cause, without the transport-level wrapping
    pub fn cause(&self) -> String {
        match self {
            ProbeError::Certificate { message }
            | ProbeError::Handshake { message }
            | ProbeError::Http { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },
}

/// Result type alias using ToolkitError
pub type Result<T> = std::result::Result<T, ToolkitError>;
