use crate::cert::notification::NotifyOutcome;
use crate::cert::verdict::Verdict;

/// Aggregate over every verdict of one scan pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub total: usize,
    /// Verdicts the operator has to act on, as decided by the failure policy.
    pub attention_count: usize,
    pub healthy: usize,
    pub expiring: usize,
    pub expired: usize,
    pub probe_failed: usize,
    pub notifications_sent: usize,
    pub notifications_failed: usize,
}

impl ScanSummary {
    /// Adds one checked target to the tally.
    pub fn record(
        &mut self,
        verdict: &Verdict,
        needs_attention: bool,
        notification: Option<&NotifyOutcome>,
    ) {
        self.total += 1;

        match verdict {
            Verdict::Healthy { .. } => self.healthy += 1,
            Verdict::ExpiringSoon { .. } => self.expiring += 1,
            Verdict::Expired { .. } => self.expired += 1,
            Verdict::ProbeFailed { .. } => self.probe_failed += 1,
        }

        if needs_attention {
            self.attention_count += 1;
        }

        match notification {
            Some(NotifyOutcome::Sent) => self.notifications_sent += 1,
            Some(NotifyOutcome::Failed(_)) => self.notifications_failed += 1,
            Some(NotifyOutcome::Skipped(_)) | None => {}
        }
    }

    pub fn all_clear(&self) -> bool {
        self.attention_count == 0
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
