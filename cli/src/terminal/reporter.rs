use certwatch_core::scanner::{ScanReporter, TargetReport};
use tracing::Span;

use crate::terminal::{format, print, progress};

/// Prints one status line per checked target and advances the progress bar.
pub struct TerminalReporter {
    span: Span,
    key_width: usize,
}

impl TerminalReporter {
    pub fn new(span: Span, key_width: usize) -> Self {
        Self { span, key_width }
    }
}

impl ScanReporter for TerminalReporter {
    fn target_checked(&self, report: &TargetReport) {
        print::print(&format::status_line(report, self.key_width));
        progress::target_done(&self.span);
    }
}
