//! CLI argument definitions using clap

use chrono::{DateTime, Duration, Utc};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::PathBuf;

/// Flags accepted with a single leading dash, e.g. `-days=5`
const LEGACY_FLAGS: [&str; 8] = [
    "days",
    "timeout",
    "json",
    "csv",
    "short",
    "no-color",
    "csv-header",
    "config",
];

#[derive(Parser, Debug, Default)]
#[command(name = "checkssl")]
#[command(version)]
#[command(about = "Easy to read/parse information about SSL certificates", long_about = None)]
pub struct Cli {
    /// Hosts or URLs to check
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Fail the check if a certificate expires within this many days
    #[arg(long, value_name = "DAYS", allow_hyphen_values = true)]
    pub days: Option<String>,

    /// Timeout in seconds for each connection attempt (0 disables it)
    #[arg(long, value_name = "SECS", allow_hyphen_values = true)]
    pub timeout: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Shortcut for --format json
    #[arg(long)]
    pub json: bool,

    /// Shortcut for --format csv
    #[arg(long)]
    pub csv: bool,

    /// Shortcut for --format short
    #[arg(long)]
    pub short: bool,

    /// No output, exit code only
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Print the CSV header row before the first result
    #[arg(long)]
    pub csv_header: bool,

    /// Settings file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Threshold date: `now` plus the requested number of days
    pub fn threshold(&self, now: DateTime<Utc>, default_days: i64) -> DateTime<Utc> {
        let days = self
            .days
            .as_deref()
            .map(parse_lenient)
            .unwrap_or(default_days);
        let offset = Duration::try_days(days).unwrap_or_else(Duration::zero);
        now.checked_add_signed(offset).unwrap_or(now)
    }

    /// Per-attempt timeout; negative values count as zero
    pub fn timeout_secs(&self, default_secs: u64) -> u64 {
        self.timeout
            .as_deref()
            .map(|value| parse_lenient(value).max(0) as u64)
            .unwrap_or(default_secs)
    }

    /// Explicit shortcuts win over `--format`, which wins over the default
    pub fn output_format(&self, default: OutputFormat) -> OutputFormat {
        if self.quiet {
            OutputFormat::None
        } else if self.json {
            OutputFormat::Json
        } else if self.csv {
            OutputFormat::Csv
        } else if self.short {
            OutputFormat::Short
        } else {
            self.format.unwrap_or(default)
        }
    }

    pub fn color_enabled(&self, default: bool) -> bool {
        default && !self.no_color
    }

    pub fn csv_header_enabled(&self, default: bool) -> bool {
        self.csv_header || default
    }
}

/// Parse an integer flag value, treating anything unparsable as zero
pub fn parse_lenient(value: &str) -> i64 {
    value.parse::<i32>().map(i64::from).unwrap_or(0)
}

/// Rewrite single-dash long flags (`-days=5`, `-json`) to clap's `--` form.
///
/// Arguments that are not valid UTF-8 pass through untouched.
pub fn normalize_legacy_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            let rewritten = arg
                .to_str()
                .filter(|text| is_legacy_flag(text))
                .map(|text| format!("-{}", text));
            match rewritten {
                Some(text) => OsString::from(text),
                None => arg,
            }
        })
        .collect()
}

fn is_legacy_flag(arg: &str) -> bool {
    arg.strip_prefix('-')
        .filter(|rest| !rest.starts_with('-'))
        .map(|rest| rest.split('=').next().unwrap_or(rest))
        .map(|name| LEGACY_FLAGS.contains(&name))
        .unwrap_or(false)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Full JSON document per target
    Json,
    /// One CSV row per target
    Csv,
    /// Human-readable report (default)
    #[default]
    Text,
    /// No output, exit code only
    None,
    /// Only the PASS/FAIL summary line
    Short,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Text => write!(f, "TEXT"),
            OutputFormat::None => write!(f, "NONE"),
            OutputFormat::Short => write!(f, "SHORT"),
        }
    }
}
