//! Human-readable text output

use super::dates::display_date;
use super::palette::{Palette, Tone};
use crate::models::CheckedServer;
use chrono::{DateTime, Utc};

pub const VERSION_SSL30: u16 = 0x0300;
pub const VERSION_TLS10: u16 = 0x0301;
pub const VERSION_TLS11: u16 = 0x0302;
pub const VERSION_TLS12: u16 = 0x0303;
pub const VERSION_TLS13: u16 = 0x0304;

pub const TLS_RSA_WITH_AES_256_CBC_SHA: u16 = 0x0035;
pub const TLS_AES_128_GCM_SHA256: u16 = 0x1301;
pub const TLS_AES_256_GCM_SHA384: u16 = 0x1302;
pub const TLS_CHACHA20_POLY1305_SHA256: u16 = 0x1303;
pub const TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256: u16 = 0xc02b;
pub const TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384: u16 = 0xc02c;
pub const TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256: u16 = 0xc02f;
pub const TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384: u16 = 0xc030;
pub const TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305: u16 = 0xcca8;
pub const TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305: u16 = 0xcca9;

/// Mozilla intermediate profile, https://ssl-config.mozilla.org/
const MOZILLA_RECOMMENDED: [u16; 6] = [
    TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256,
    TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256,
    TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384,
    TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384,
    TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305,
    TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305,
];

/// Full multi-line report
pub fn as_text(server: &CheckedServer, palette: Palette, now: DateTime<Utc>) -> String {
    let mut output = String::new();

    if !server.server_name.is_empty() && !server.ip_address.is_empty() {
        output.push_str(&format!(
            "\n{} => {}\n",
            server.server_name, server.ip_address
        ));
    }

    if !server.http_version.is_empty() && server.tls_cipher_suite > 0 {
        if server.server_info.is_empty() {
            output.push_str(" -> (no server name or versions found)\n");
        } else {
            output.push_str(&format!(" -> {}\n", expand_server_names(&server.server_info)));
        }
        output.push_str(&format!(
            " -> {} with {}\n",
            http_version_label(&server.http_version, palette),
            tls_version_label(server.tls_version, palette)
        ));
        output.push_str(&format!(
            " -> {} {}\n",
            cipher_label(server.tls_cipher_suite),
            recommended_cipher_note(server.tls_cipher_suite, palette)
        ));
    }

    for (i, cert) in server.certificates.iter().enumerate() {
        if cert.is_certificate_authority {
            output.push_str(&format!(" CA-{}) ", i + 1));
        } else {
            output.push_str(&format!(" {}) ", i + 1));
        }

        let date = display_date(cert.valid_not_after, now);
        if cert.is_invalid {
            output.push_str(&palette.paint(
                Tone::Red,
                &format!("{} expired on {}", cert.common_name, date),
            ));
        } else {
            output.push_str(&format!("{} expires on {}", cert.common_name, date));
        }
        output.push('\n');
    }

    output.push_str(&summary_line(server, palette));
    output
}

/// Only the summary line
pub fn as_short_text(server: &CheckedServer, palette: Palette) -> String {
    summary_line(server, palette)
}

/// `[PASS] <target>` or `[FAIL] <target>`
pub fn summary_line(server: &CheckedServer, palette: Palette) -> String {
    if server.passed {
        format!("{} {}\n", palette.paint(Tone::Green, "[PASS]"), server.target)
    } else {
        format!("{} {}\n", palette.paint(Tone::Red, "[FAIL]"), server.target)
    }
}

/// Protocol version with an upgrade recommendation
pub fn tls_version_label(version: u16, palette: Palette) -> String {
    let (tone, label) = match version {
        VERSION_SSL30 => (Tone::Red, "SSL v3.0 () - PLEASE UPGRADE to TLS v1.2"),
        VERSION_TLS10 => (
            Tone::Red,
            "TLS v1.0 (released 1999) - PLEASE UPGRADE to TLS v1.2 or v1.3",
        ),
        VERSION_TLS11 => (
            Tone::Red,
            "TLS v1.1 (release 2006) - PLEASE UPGRADE to TLS v1.2 or v1.3",
        ),
        VERSION_TLS12 => (
            Tone::Yellow,
            "TLS v1.2 (released 2008) - Consider upgrading to TLS v1.3",
        ),
        VERSION_TLS13 => (Tone::Green, "TLS v1.3 (released 2018) - latest version"),
        other => return format!("unknown TLS version: {}", other),
    };
    palette.paint(tone, label)
}

/// Cipher suite name with a short explanation where one is known
pub fn cipher_label(suite: u16) -> String {
    let label = match suite {
        TLS_AES_128_GCM_SHA256 => {
            "TLS_AES_128_GCM_SHA256 = TLS, message encrypted with AES128 GCM, hashes are SHA256"
        }
        TLS_AES_256_GCM_SHA384 => "TLS_AES_256_GCM_SHA384",
        TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256 => {
            "TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256 = TLS, key exchange is ECDHE, auth exchange is ECDSA, messages encrypted with AES128GCM, hashes are SHA256"
        }
        TLS_RSA_WITH_AES_256_CBC_SHA => {
            "TLS_RSA_WITH_AES_256_CBC_SHA - !!! WEAK Cipher, please upgrade !!!"
        }
        TLS_CHACHA20_POLY1305_SHA256 => "TLS_CHACHA20_POLY1305_SHA256",
        TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256 => "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256",
        other => return format!("unknown TLS algo: {:x}", other),
    };
    label.to_string()
}

/// Annotation for suites on the recommended list, empty otherwise
pub fn recommended_cipher_note(suite: u16, palette: Palette) -> String {
    if MOZILLA_RECOMMENDED.contains(&suite) {
        palette.paint(Tone::Green, " (Mozilla Recommended Cipher)")
    } else {
        String::new()
    }
}

/// Negotiated application protocol, flagging old versions
pub fn http_version_label(version: &str, palette: Palette) -> String {
    match version.to_lowercase().as_str() {
        "h3" => "HTTP/3".to_string(),
        "h2" => palette.paint(Tone::Green, "HTTP/2"),
        "http/1.1" => palette.paint(Tone::Red, "HTTP/1.1 (OLD)"),
        "http/1" | "http/1.0" => palette.paint(Tone::Red, "HTTP/1 (OLD)"),
        _ => format!("unknown HTTPS version {}", version),
    }
}

/// Expand abbreviated server software tokens to vendor names
pub fn expand_server_names(info: &str) -> String {
    info.replacen("ATS", "Apache Traffic Server (ATS)", 1)
        .replacen("gws", "Google Web Server (gws)", 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CheckCert;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn sample() -> CheckedServer {
        CheckedServer {
            target: "https://example.com".to_string(),
            server_info: "ATS - ".to_string(),
            server_name: "example.com".to_string(),
            ip_address: "93.184.216.34".to_string(),
            http_version: "h2".to_string(),
            tls_version: VERSION_TLS13,
            tls_cipher_suite: TLS_AES_128_GCM_SHA256,
            passed: true,
            exit_code: 0,
            error_message: String::new(),
            certificates: vec![
                CheckCert {
                    common_name: "example.com".to_string(),
                    is_certificate_authority: false,
                    valid_not_before: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                    valid_not_after: Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap(),
                    is_invalid: false,
                },
                CheckCert {
                    common_name: "Example CA".to_string(),
                    is_certificate_authority: true,
                    valid_not_before: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
                    valid_not_after: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
                    is_invalid: false,
                },
            ],
        }
    }

    #[test]
    fn test_full_report() {
        let expected = "\nexample.com => 93.184.216.34\n \
-> Apache Traffic Server (ATS) - \n \
-> HTTP/2 with TLS v1.3 (released 2018) - latest version\n \
-> TLS_AES_128_GCM_SHA256 = TLS, message encrypted with AES128 GCM, hashes are SHA256 \n \
1) example.com expires on 2024-07-15 12:00PM Mon (30.0 days)\n \
CA-2) Example CA expires on 2030-01-01 12:00AM Tue (2025.5 days)\n\
[PASS] https://example.com\n";
        assert_eq!(as_text(&sample(), Palette::plain(), now()), expected);
    }

    #[test]
    fn test_invalid_certificate_line() {
        let mut server = sample();
        server.passed = false;
        server.exit_code = 2;
        server.certificates[0].valid_not_after =
            Utc.with_ymd_and_hms(2024, 6, 10, 9, 30, 0).unwrap();
        server.certificates[0].is_invalid = true;

        let text = as_text(&server, Palette::plain(), now());
        assert!(text.contains(" 1) example.com expired on 2024-06-10 9:30AM Mon (-5.1 days)\n"));
        assert!(text.ends_with("[FAIL] https://example.com\n"));
    }

    #[test]
    fn test_error_only_result() {
        let server = CheckedServer {
            target: "https://nowhere.invalid".to_string(),
            error_message: "lookup nowhere.invalid: no such host".to_string(),
            exit_code: 5,
            ..Default::default()
        };
        assert_eq!(
            as_text(&server, Palette::plain(), now()),
            "[FAIL] https://nowhere.invalid\n"
        );
    }

    #[test]
    fn test_empty_result_does_not_panic() {
        let text = as_text(&CheckedServer::default(), Palette::new(true), now());
        assert!(text.contains("[FAIL]"));
    }

    #[test]
    fn test_missing_banner() {
        let mut server = sample();
        server.server_info = String::new();
        let text = as_text(&server, Palette::plain(), now());
        assert!(text.contains(" -> (no server name or versions found)\n"));
    }

    #[test]
    fn test_short_text() {
        assert_eq!(
            as_short_text(&sample(), Palette::plain()),
            "[PASS] https://example.com\n"
        );
        let colored = as_short_text(&sample(), Palette::new(true));
        assert!(colored.starts_with("\u{1b}[32m[PASS]"));
    }

    #[test]
    fn test_tls_version_labels() {
        let plain = Palette::plain();
        assert!(tls_version_label(VERSION_TLS10, plain).contains("PLEASE UPGRADE"));
        assert!(tls_version_label(VERSION_TLS12, plain).contains("Consider upgrading"));
        assert_eq!(tls_version_label(0, plain), "unknown TLS version: 0");
        assert!(tls_version_label(VERSION_SSL30, Palette::new(true)).starts_with("\u{1b}[31m"));
    }

    #[test]
    fn test_cipher_labels() {
        assert_eq!(cipher_label(TLS_AES_256_GCM_SHA384), "TLS_AES_256_GCM_SHA384");
        assert!(cipher_label(TLS_RSA_WITH_AES_256_CBC_SHA).contains("WEAK"));
        assert_eq!(cipher_label(0xc013), "unknown TLS algo: c013");
    }

    #[test]
    fn test_recommended_ciphers() {
        let plain = Palette::plain();
        assert_eq!(
            recommended_cipher_note(TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256, plain),
            " (Mozilla Recommended Cipher)"
        );
        assert_eq!(recommended_cipher_note(TLS_AES_128_GCM_SHA256, plain), "");
        assert_eq!(recommended_cipher_note(TLS_RSA_WITH_AES_256_CBC_SHA, plain), "");
    }

    #[test]
    fn test_http_version_labels() {
        let plain = Palette::plain();
        assert_eq!(http_version_label("h2", plain), "HTTP/2");
        assert_eq!(http_version_label("HTTP/1.1", plain), "HTTP/1.1 (OLD)");
        assert_eq!(http_version_label("h3", plain), "HTTP/3");
        assert_eq!(http_version_label("spdy/3", plain), "unknown HTTPS version spdy/3");
    }

    #[test]
    fn test_expand_server_names() {
        assert_eq!(
            expand_server_names("ATS/9.1 - "),
            "Apache Traffic Server (ATS)/9.1 - "
        );
        assert_eq!(expand_server_names("gws"), "Google Web Server (gws)");
        assert_eq!(expand_server_names("nginx"), "nginx");
    }
}
