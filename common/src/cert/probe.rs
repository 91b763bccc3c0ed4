use chrono::{DateTime, Utc};

use crate::error::ProbeError;
use crate::network::target::Target;

/// What a single probe learned about a target.
///
/// Exactly one of expiry or error is present, encoded as a `Result`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeResult {
    pub target: Target,
    pub outcome: Result<DateTime<Utc>, ProbeError>,
}

impl ProbeResult {
    pub fn expires_at(target: Target, expiry: DateTime<Utc>) -> Self {
        Self {
            target,
            outcome: Ok(expiry),
        }
    }

    pub fn failed(target: Target, error: ProbeError) -> Self {
        Self {
            target,
            outcome: Err(error),
        }
    }

    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.outcome.as_ref().ok().copied()
    }

    pub fn error(&self) -> Option<&ProbeError> {
        self.outcome.as_ref().err()
    }
}
