use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;

use crate::cert::verdict::Verdict;
use crate::error::UnknownFailurePolicy;
use crate::network::target::Target;

pub mod loader;

pub const DEFAULT_BASE_URL: &str = "https://api.day.app";
pub const DEFAULT_ICON: &str = "https://raw.githubusercontent.com/google/material-design-icons/master/png/action/https/materialicons/48dp/1x/baseline_https_black_48dp.png";
pub const DEFAULT_WARNING_DAYS: u32 = 30;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_WORKERS: usize = 8;

/// Everything a scan pass needs, built once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub push: PushConfig,
    pub targets: Vec<Target>,
    /// Certificates with this many days left or fewer are flagged.
    pub warning_days: u32,
    /// Bound for the TCP connect and, separately, for the TLS handshake.
    pub timeout: Duration,
    pub failure_policy: FailurePolicy,
    pub strategy: ScanStrategy,
}

/// Settings of the push webhook.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PushConfig {
    /// Device key. Notifications are skipped when absent.
    pub device_key: Option<String>,
    /// Service root, without trailing slash.
    pub base_url: String,
    /// Icon URL sent as the `icon` query parameter.
    pub icon: Option<String>,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            device_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            icon: Some(DEFAULT_ICON.to_string()),
        }
    }
}

/// How probe failures are treated.
///
/// | policy   | counted as attention | pushed |
/// |----------|----------------------|--------|
/// | `ignore` | no                   | no     |
/// | `count`  | yes                  | no     |
/// | `notify` | yes                  | yes    |
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    Ignore,
    #[default]
    Count,
    Notify,
}

impl FailurePolicy {
    /// Whether `verdict` counts towards the attention tally.
    pub fn needs_attention(self, verdict: &Verdict) -> bool {
        match verdict {
            Verdict::Healthy { .. } => false,
            Verdict::ExpiringSoon { .. } | Verdict::Expired { .. } => true,
            Verdict::ProbeFailed { .. } => self != FailurePolicy::Ignore,
        }
    }

    /// Whether `verdict` is handed to the notifier.
    pub fn should_push(self, verdict: &Verdict) -> bool {
        match verdict {
            Verdict::Healthy { .. } => false,
            Verdict::ExpiringSoon { .. } | Verdict::Expired { .. } => true,
            Verdict::ProbeFailed { .. } => self == FailurePolicy::Notify,
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = UnknownFailurePolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(FailurePolicy::Ignore),
            "count" => Ok(FailurePolicy::Count),
            "notify" => Ok(FailurePolicy::Notify),
            _ => Err(UnknownFailurePolicy(s.to_string())),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailurePolicy::Ignore => "ignore",
            FailurePolicy::Count => "count",
            FailurePolicy::Notify => "notify",
        };
        f.write_str(name)
    }
}

/// How the orchestrator walks the target list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanStrategy {
    /// One target after the other, in list order.
    Sequential,
    /// Up to `workers` targets in flight at once.
    Parallel { workers: NonZeroUsize },
}

impl Default for ScanStrategy {
    fn default() -> Self {
        match NonZeroUsize::new(DEFAULT_WORKERS) {
            Some(workers) => ScanStrategy::Parallel { workers },
            None => ScanStrategy::Sequential,
        }
    }
}

impl fmt::Display for ScanStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanStrategy::Sequential => write!(f, "sequential"),
            ScanStrategy::Parallel { workers } => write!(f, "parallel ({workers} workers)"),
        }
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
