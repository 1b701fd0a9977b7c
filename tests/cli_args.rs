use checkssl::cli::{normalize_legacy_flags, Cli, OutputFormat};
use checkssl::config::Settings;
use chrono::{Duration, TimeZone, Utc};
use clap::Parser;

fn parse(args: &[&str]) -> Cli {
    Cli::parse_from(normalize_legacy_flags(args.iter().copied()))
}

#[test]
fn test_cli_overrides_settings() {
    let settings = Settings::from_toml(
        "[check]\ndays = 30\ntimeout_secs = 20\n[output]\nformat = \"json\"\ncsv_header = true",
    )
    .unwrap();
    let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();

    let cli = parse(&["checkssl", "-days=7", "-timeout=3", "-csv", "example.com"]);
    assert_eq!(cli.threshold(now, settings.check.days), now + Duration::days(7));
    assert_eq!(cli.timeout_secs(settings.check.timeout_secs), 3);
    assert_eq!(cli.output_format(settings.output.format), OutputFormat::Csv);
    assert!(cli.csv_header_enabled(settings.output.csv_header));
}

#[test]
fn test_settings_used_without_flags() {
    let settings = Settings::from_toml("[check]\ndays = 30\n[output]\nformat = \"short\"").unwrap();
    let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();

    let cli = parse(&["checkssl", "example.com"]);
    assert_eq!(cli.threshold(now, settings.check.days), now + Duration::days(30));
    assert_eq!(cli.timeout_secs(settings.check.timeout_secs), 15);
    assert_eq!(cli.output_format(settings.output.format), OutputFormat::Short);
}

#[test]
fn test_no_targets() {
    let cli = parse(&["checkssl"]);
    assert!(cli.targets.is_empty());
}

#[test]
fn test_unknown_format_rejected() {
    let result = Cli::try_parse_from(["checkssl", "--format", "xml", "example.com"]);
    assert!(result.is_err());
}
