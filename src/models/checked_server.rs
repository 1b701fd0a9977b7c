//! Result of checking one server

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel used when a certificate subject carries no common name
pub const MISSING_COMMON_NAME: &str = "(missing common name)";

/// One certificate of the presented chain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckCert {
    /// Subject common name, or [`MISSING_COMMON_NAME`]
    pub common_name: String,
    /// Intermediate or root CA
    pub is_certificate_authority: bool,
    pub valid_not_before: DateTime<Utc>,
    pub valid_not_after: DateTime<Utc>,
    /// This certificate failed the tolerance check
    pub is_invalid: bool,
}

/// Everything learned about one probed target.
///
/// `passed` is false exactly when `error_message` is set or a certificate
/// is flagged invalid, and `exit_code` is zero exactly when `passed`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckedServer {
    /// Normalized `https://` URL
    pub target: String,
    /// `Server` and `X-Powered-By` response headers
    pub server_info: String,
    /// Negotiated server name, falling back to the leaf common name
    pub server_name: String,
    /// Peer address of the established connection
    pub ip_address: String,
    /// Negotiated application protocol, e.g. `h2`
    pub http_version: String,
    /// IANA protocol version, e.g. `0x0304` for TLS 1.3
    pub tls_version: u16,
    /// IANA cipher suite identifier
    pub tls_cipher_suite: u16,
    pub passed: bool,
    pub exit_code: i32,
    pub error_message: String,
    /// Leaf first, in the order presented by the server
    pub certificates: Vec<CheckCert>,
}

impl CheckedServer {
    /// Create a fresh result for a normalized target, passing until proven otherwise
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            passed: true,
            ..Default::default()
        }
    }

    /// The leaf certificate, if a chain was recovered
    pub fn leaf(&self) -> Option<&CheckCert> {
        self.certificates.first()
    }

    /// The certificate expiring first
    pub fn earliest_expiry(&self) -> Option<&CheckCert> {
        self.certificates.iter().min_by_key(|c| c.valid_not_after)
    }

    /// Common name of the last certificate flagged as a CA
    pub fn ca_name(&self) -> Option<&str> {
        self.certificates
            .iter()
            .rev()
            .find(|c| c.is_certificate_authority)
            .map(|c| c.common_name.as_str())
    }

    pub fn has_invalid_certificate(&self) -> bool {
        self.certificates.iter().any(|c| c.is_invalid)
    }
}
