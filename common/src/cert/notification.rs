use std::fmt;

/// Result of handing a verdict to the push notifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotifyOutcome {
    Sent,
    Skipped(SkipReason),
    Failed(String),
}

/// Why no push request was made.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// No device key is configured.
    NoCredential,
    /// The verdict does not warrant an alert.
    NotActionable,
}

impl fmt::Display for NotifyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyOutcome::Sent => write!(f, "pushed"),
            NotifyOutcome::Skipped(SkipReason::NoCredential) => write!(f, "push skipped, no key"),
            NotifyOutcome::Skipped(SkipReason::NotActionable) => write!(f, "nothing to push"),
            NotifyOutcome::Failed(reason) => write!(f, "push failed: {reason}"),
        }
    }
}
