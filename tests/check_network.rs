//! Checks against the public badssl.com endpoints.
//!
//! These need outbound network access and are ignored by default:
//! `cargo test -- --ignored`

use checkssl::checks::dns::ipv4_addresses;
use checkssl::runner::check_server;
use chrono::{Duration, Utc};

#[tokio::test]
#[ignore]
async fn test_valid_certificate() {
    let result = check_server("badssl.com", Utc::now(), 15, false).await;
    assert!(result.passed, "{}", result.error_message);
    assert_eq!(result.exit_code, 0);
    assert!(!result.certificates.is_empty());
    assert!(!result.ip_address.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_threshold_far_in_future() {
    let threshold = Utc::now() + Duration::days(3650);
    let result = check_server("https://badssl.com", threshold, 15, false).await;
    assert!(!result.passed);
    assert_eq!(result.exit_code, 3);
}

#[tokio::test]
#[ignore]
async fn test_expired_certificate() {
    let result = check_server("expired.badssl.com", Utc::now(), 15, false).await;
    assert!(!result.passed);
    assert_eq!(result.exit_code, 5);
    assert!(!result.error_message.is_empty());
    assert!(result.has_invalid_certificate());
}

#[tokio::test]
#[ignore]
async fn test_self_signed_certificate() {
    let result = check_server("self-signed.badssl.com", Utc::now(), 15, false).await;
    assert!(!result.passed);
    assert_eq!(result.exit_code, 5);
    assert!(result.has_invalid_certificate());
}

#[tokio::test]
#[ignore]
async fn test_untrusted_root() {
    let result = check_server("untrusted-root.badssl.com", Utc::now(), 15, false).await;
    assert!(!result.passed);
    assert_eq!(result.exit_code, 5);
    assert!(result.has_invalid_certificate());
}

#[tokio::test]
#[ignore]
async fn test_unknown_host() {
    let result = check_server("nonexistent.invalid", Utc::now(), 5, false).await;
    assert!(!result.passed);
    assert_eq!(result.exit_code, 5);
    assert!(result.certificates.is_empty());
    assert!(result.error_message.starts_with("lookup nonexistent.invalid"));
}

#[tokio::test]
#[ignore]
async fn test_ipv4_lookup() {
    let addresses = ipv4_addresses("badssl.com").await;
    assert!(!addresses.is_empty());
    assert!(addresses.iter().all(|a| a.parse::<std::net::Ipv4Addr>().is_ok()));
}
