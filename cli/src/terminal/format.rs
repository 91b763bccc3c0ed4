use certwatch_common::cert::notification::{NotifyOutcome, SkipReason};
use certwatch_common::cert::verdict::Verdict;
use certwatch_common::network::target::Target;
use certwatch_core::scanner::TargetReport;
use colored::*;
use unicode_width::UnicodeWidthStr;

use crate::terminal::colors;

pub fn marker(verdict: &Verdict) -> ColoredString {
    match verdict {
        Verdict::Healthy { .. } => "[+]".color(colors::HEALTHY).bold(),
        Verdict::ExpiringSoon { .. } => "[*]".color(colors::EXPIRING).bold(),
        Verdict::Expired { .. } => "[-]".color(colors::EXPIRED).bold(),
        Verdict::ProbeFailed { .. } => "[!]".color(colors::FAILED).bold(),
    }
}

fn verdict_color(verdict: &Verdict) -> Color {
    match verdict {
        Verdict::Healthy { .. } => colors::TEXT_DEFAULT,
        Verdict::ExpiringSoon { .. } => colors::EXPIRING,
        Verdict::Expired { .. } => colors::EXPIRED,
        Verdict::ProbeFailed { .. } => colors::FAILED,
    }
}

/// Display width of the longest target, for aligning status lines.
pub fn key_width(targets: &[Target]) -> usize {
    targets
        .iter()
        .map(|target| target.to_string().width())
        .max()
        .unwrap_or(0)
}

/// One complete status line for a checked target.
pub fn status_line(report: &TargetReport, key_width: usize) -> String {
    let target: String = report.target.to_string();
    let dots: String = ".".repeat((key_width + 1).saturating_sub(target.width()));

    let mut line: String = format!(
        "{} {}{}{} {}",
        marker(&report.verdict),
        target.color(colors::PRIMARY),
        dots.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR),
        report.verdict.to_string().color(verdict_color(&report.verdict))
    );

    if let Some(expiry) = report.expiry {
        let date = format!("({})", expiry.format("%Y-%m-%d"));
        line.push_str(&format!(" {}", date.color(colors::SEPARATOR)));
    }

    match &report.notification {
        None | Some(NotifyOutcome::Skipped(SkipReason::NotActionable)) => {}
        Some(outcome @ NotifyOutcome::Failed(_)) => {
            line.push_str(&format!(" {}", format!("· {outcome}").red()));
        }
        Some(outcome) => {
            line.push_str(&format!(" {}", format!("· {outcome}").color(colors::ACCENT)));
        }
    }

    line
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
