//! Expiry tolerance classification
//!
//! Decides whether a certificate validity window satisfies a threshold date.
//! The threshold defaults to "now" but callers may move it forward to fail
//! certificates that expire within a lead time.

use crate::models::CheckStatus;
use chrono::{DateTime, Utc};

/// Classify a validity window against a threshold.
///
/// Rules are evaluated in order and the first match wins:
///
/// 1. the threshold lies strictly inside the window: [`CheckStatus::Pass`]
/// 2. `now` lies strictly inside the window: [`CheckStatus::ThresholdFail`]
/// 3. the threshold precedes both bounds: [`CheckStatus::NotValidYet`]
/// 4. otherwise: [`CheckStatus::Expired`]
///
/// Rule 2 deliberately compares against `now` rather than the threshold.
pub fn classify(
    threshold: DateTime<Utc>,
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
    now: DateTime<Utc>,
) -> CheckStatus {
    if threshold > not_before && threshold < not_after {
        return CheckStatus::Pass;
    }

    if now > not_before && now < not_after {
        return CheckStatus::ThresholdFail;
    }

    if threshold < not_before && threshold < not_after {
        return CheckStatus::NotValidYet;
    }

    CheckStatus::Expired
}
