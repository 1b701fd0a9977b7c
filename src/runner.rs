//! Check orchestration
//!
//! Drives the connection probe for one target, applies the diagnostic retry
//! policy and classifies the recovered chain. A check never fails from the
//! caller's point of view: every problem is expressed in the returned
//! [`CheckedServer`].

use crate::checks::{certificate, classify, Probe, ProbeSession};
use crate::models::{CheckCert, CheckStatus, CheckedServer};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Per-attempt timeout used when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

const MISSING_TLS: &str = "Missing TLS Connection";

/// Check one target.
///
/// `timeout_secs` bounds each phase of each attempt; zero disables it.
pub async fn check_server(
    target: &str,
    threshold: DateTime<Utc>,
    timeout_secs: u64,
    insecure: bool,
) -> CheckedServer {
    Checker::new()
        .with_threshold(threshold)
        .with_timeout(timeout_secs)
        .check(target, insecure)
        .await
}

/// Rewrite a target into an `https://` URL
pub fn normalize_target(target: &str) -> String {
    if let Some(rest) = target.strip_prefix("http://") {
        format!("https://{}", rest)
    } else if target.starts_with("https://") {
        target.to_string()
    } else {
        format!("https://{}", target)
    }
}

/// Reusable check configuration
#[derive(Debug, Clone)]
pub struct Checker {
    timeout_secs: u64,
    threshold: DateTime<Utc>,
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

impl Checker {
    /// Default timeout, threshold of "now"
    pub fn new() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            threshold: Utc::now(),
        }
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    pub fn with_threshold(mut self, threshold: DateTime<Utc>) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> DateTime<Utc> {
        self.threshold
    }

    /// Probe a target and classify its chain.
    ///
    /// A failed secure attempt is retried once with chain validation
    /// disabled, unless it timed out, so the presented chain can still be
    /// reported. The result of such a retry never passes.
    pub async fn check(&self, target: &str, insecure: bool) -> CheckedServer {
        let target = normalize_target(target);
        let mut output = CheckedServer::new(target.as_str());
        let probe = Probe::new(self.timeout_secs);
        info!("checking {}", target);

        let err = match probe.run(&target, insecure).await {
            Ok(session) => {
                apply_session(&mut output, session, self.threshold, Utc::now());
                return output;
            }
            Err(e) => e,
        };
        warn!("request to {} failed: {}", target, err);

        if !insecure && !err.is_timeout() {
            info!("secure request failed, attempting insecure request");
            match probe.run(&target, true).await {
                Ok(session) => {
                    apply_session(&mut output, session, self.threshold, Utc::now());
                    flag_untrusted_leaf(&mut output);
                }
                Err(retry_err) => {
                    debug!("insecure request to {} failed: {}", target, retry_err);
                }
            }
        }

        output.error_message = err.cause();
        output.passed = false;
        output.exit_code = CheckStatus::Error.code();
        output
    }
}

/// Fill a result from a successful probe
pub fn apply_session(
    output: &mut CheckedServer,
    session: ProbeSession,
    threshold: DateTime<Utc>,
    now: DateTime<Utc>,
) {
    output.server_info = session.response.server;
    if !output.server_info.is_empty() {
        output.server_info.push_str(" - ");
    }
    output.server_info.push_str(&session.response.powered_by);

    output.http_version = session.http_version;
    output.ip_address = session
        .peer_ip
        .map(|ip| ip.to_string())
        .unwrap_or_default();
    output.server_name = session.server_name;
    output.tls_version = session.tls_version;
    output.tls_cipher_suite = session.cipher_suite;

    if session.chain.is_empty() {
        fail_with(output, MISSING_TLS.to_string());
        return;
    }

    match certificate::parse_chain(&session.chain) {
        Ok(certs) => record_chain(output, certs, threshold, now),
        Err(e) => fail_with(output, e.to_string()),
    }
}

/// Classify each certificate, leaf first.
///
/// The last failing certificate in chain order decides the exit code.
pub fn record_chain(
    output: &mut CheckedServer,
    certs: Vec<CheckCert>,
    threshold: DateTime<Utc>,
    now: DateTime<Utc>,
) {
    for mut cert in certs {
        if output.server_name.is_empty() {
            output.server_name = cert.common_name.clone();
        }

        let status = classify(threshold, cert.valid_not_before, cert.valid_not_after, now);
        debug!("{} classified as {}", cert.common_name, status);
        if !status.is_pass() {
            cert.is_invalid = true;
            output.exit_code = status.code();
            output.passed = false;
        }
        output.certificates.push(cert);
    }
}

/// A chain only seen with validation disabled failed trust checks, so at
/// least the leaf is reported as invalid.
fn flag_untrusted_leaf(output: &mut CheckedServer) {
    if output.has_invalid_certificate() {
        return;
    }
    if let Some(leaf) = output.certificates.first_mut() {
        leaf.is_invalid = true;
    }
}

fn fail_with(output: &mut CheckedServer, message: String) {
    output.error_message = message;
    output.passed = false;
    output.exit_code = CheckStatus::Error.code();
}
