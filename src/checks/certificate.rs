//! Certificate field extraction
//!
//! Reads the handful of X.509 fields a check reports from DER-encoded
//! certificates using x509-parser.

use crate::models::{CheckCert, MISSING_COMMON_NAME};
use crate::utils::ProbeError;
use chrono::{DateTime, TimeZone, Utc};
use x509_parser::prelude::*;

/// Parse a presented chain, leaf first, into unclassified [`CheckCert`]s
pub fn parse_chain(chain: &[Vec<u8>]) -> Result<Vec<CheckCert>, ProbeError> {
    chain.iter().map(|der| parse_certificate(der)).collect()
}

/// Parse a single DER-encoded certificate
pub fn parse_certificate(der: &[u8]) -> Result<CheckCert, ProbeError> {
    let (_, cert) =
        X509Certificate::from_der(der).map_err(|e| ProbeError::UnparsableCertificate {
            message: e.to_string(),
        })?;

    let common_name = cert
        .subject()
        .iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .filter(|cn| !cn.is_empty())
        .unwrap_or(MISSING_COMMON_NAME)
        .to_string();

    let is_certificate_authority = cert
        .basic_constraints()
        .map(|bc| bc.map(|ext| ext.value.ca).unwrap_or(false))
        .unwrap_or(false);

    Ok(CheckCert {
        common_name,
        is_certificate_authority,
        valid_not_before: asn1_time_to_datetime(cert.validity().not_before),
        valid_not_after: asn1_time_to_datetime(cert.validity().not_after),
        is_invalid: false,
    })
}

/// Convert ASN.1 time to chrono, out-of-range values becoming the zero timestamp
fn asn1_time_to_datetime(time: ASN1Time) -> DateTime<Utc> {
    Utc.timestamp_opt(time.timestamp(), 0)
        .single()
        .unwrap_or_default()
}
