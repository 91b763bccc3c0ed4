use std::fmt;

use crate::error::ProbeError;

/// Classified health of a target's certificate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// More than the warning threshold is left.
    Healthy { days_left: i64 },
    /// Expires within the warning threshold (inclusive).
    ExpiringSoon { days_remaining: i64 },
    /// Already past `notAfter`. `days_overdue` is always at least 1.
    Expired { days_overdue: i64 },
    /// The certificate could not be retrieved or read.
    ProbeFailed { reason: ProbeError },
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Healthy { .. } => "healthy",
            Verdict::ExpiringSoon { .. } => "expiring soon",
            Verdict::Expired { .. } => "expired",
            Verdict::ProbeFailed { .. } => "probe failed",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Healthy { days_left } => write!(f, "valid for {}", days(*days_left)),
            Verdict::ExpiringSoon { days_remaining: 0 } => write!(f, "expires today"),
            Verdict::ExpiringSoon { days_remaining } => {
                write!(f, "expires in {}", days(*days_remaining))
            }
            Verdict::Expired { days_overdue } => write!(f, "expired {} ago", days(*days_overdue)),
            Verdict::ProbeFailed { reason } => write!(f, "{reason}"),
        }
    }
}

/// Formats a day count with the right plural.
pub fn days(count: i64) -> String {
    match count {
        1 => "1 day".to_string(),
        n => format!("{n} days"),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
