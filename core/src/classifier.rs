//! Classifies a probe result against the warning threshold.
//!
//! Pure: the same result, instant and threshold always give the same verdict.

use chrono::{DateTime, Utc};

use certwatch_common::cert::probe::ProbeResult;
use certwatch_common::cert::verdict::Verdict;

const SECONDS_PER_DAY: i64 = 86_400;

pub fn classify(result: &ProbeResult, now: DateTime<Utc>, warning_days: u32) -> Verdict {
    let expiry = match &result.outcome {
        Ok(expiry) => *expiry,
        Err(reason) => {
            return Verdict::ProbeFailed {
                reason: reason.clone(),
            };
        }
    };

    let days_left = days_until(now, expiry);

    if days_left < 0 {
        Verdict::Expired {
            days_overdue: -days_left,
        }
    } else if days_left <= i64::from(warning_days) {
        Verdict::ExpiringSoon {
            days_remaining: days_left,
        }
    } else {
        Verdict::Healthy { days_left }
    }
}

/// Whole days from `now` until `expiry`, floored.
///
/// The sub-day remainder is dropped towards negative infinity, so anything
/// already past `expiry` is at least one day overdue.
pub fn days_until(now: DateTime<Utc>, expiry: DateTime<Utc>) -> i64 {
    (expiry - now).num_seconds().div_euclid(SECONDS_PER_DAY)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
