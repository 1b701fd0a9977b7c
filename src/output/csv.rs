//! CSV output formatter
//!
//! One fixed-width row per checked server. The header constant and the row
//! must always have the same number of columns.

use super::dates::{duration_days, number_of_days};
use crate::models::{CheckStatus, CheckedServer};
use chrono::{DateTime, Utc};

pub const CSV_HEADER: &str = "Target,Result,Days to Expire,Duration,Common Name,CA Name,Error";

/// Render one row:
/// target, result token, days until the earliest expiry, leaf validity
/// length, leaf common name, CA common name, error message
pub fn as_csv(server: &CheckedServer, now: DateTime<Utc>) -> String {
    let days = number_of_days(
        server
            .earliest_expiry()
            .map(|c| c.valid_not_after)
            .unwrap_or_default(),
        now,
    );
    let (duration, common_name) = server
        .leaf()
        .map(|c| {
            (
                duration_days(c.valid_not_before, c.valid_not_after),
                c.common_name.clone(),
            )
        })
        .unwrap_or_default();

    write_record(&[
        server.target.as_str(),
        CheckStatus::csv_token(server.exit_code),
        days.as_str(),
        duration.as_str(),
        common_name.as_str(),
        server.ca_name().unwrap_or_default(),
        server.error_message.as_str(),
    ])
}

fn write_record(fields: &[&str]) -> String {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    if writer.write_record(fields).is_err() {
        return fields.join(",");
    }
    match writer.into_inner() {
        Ok(bytes) => String::from_utf8_lossy(&bytes)
            .trim_end_matches('\n')
            .to_string(),
        Err(_) => fields.join(","),
    }
}
