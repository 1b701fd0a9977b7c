//! Check outcome taxonomy

use serde::Serialize;
use std::fmt;

/// Outcome of a check, each variant carrying a distinct process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    /// Every certificate satisfies the threshold
    Pass,
    /// The validity window has already elapsed relative to the threshold
    Expired,
    /// Valid right now but expires before the threshold
    ThresholdFail,
    /// The validity window starts after the threshold
    NotValidYet,
    /// No certificate chain could be obtained or trusted
    Error,
}

impl CheckStatus {
    /// Exit code contributed by this outcome
    pub fn code(&self) -> i32 {
        match self {
            CheckStatus::Pass => 0,
            CheckStatus::Expired => 2,
            CheckStatus::ThresholdFail => 3,
            CheckStatus::NotValidYet => 4,
            CheckStatus::Error => 5,
        }
    }

    /// Map an exit code back to its outcome, if it is one of ours
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(CheckStatus::Pass),
            2 => Some(CheckStatus::Expired),
            3 => Some(CheckStatus::ThresholdFail),
            4 => Some(CheckStatus::NotValidYet),
            5 => Some(CheckStatus::Error),
            _ => None,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, CheckStatus::Pass)
    }

    /// Coarse token used in CSV output
    pub fn csv_token(code: i32) -> &'static str {
        match Self::from_code(code) {
            Some(CheckStatus::Pass) => "PASS",
            Some(CheckStatus::Expired) => "EXPIRED",
            _ => "FAIL",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Pass => write!(f, "PASS"),
            CheckStatus::Expired => write!(f, "EXPIRED"),
            CheckStatus::ThresholdFail => write!(f, "THRESHOLD_FAIL"),
            CheckStatus::NotValidYet => write!(f, "NOT_VALID_YET"),
            CheckStatus::Error => write!(f, "ERROR"),
        }
    }
}
