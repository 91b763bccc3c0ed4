use indicatif::ProgressStyle;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Span whose progress bar counts checked targets.
///
/// The bar is shown while the span is entered and removed once every
/// clone of it has been dropped.
pub fn scan_span(total: usize) -> Span {
    let span = info_span!("scan", indicatif.pb_show = true);

    span.pb_set_style(&style());
    span.pb_set_length(total as u64);
    span.pb_set_message("checking certificates");

    span
}

fn style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg} {pos}/{len}")
        .map(|style| style.tick_strings(TICKS))
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

pub fn target_done(span: &Span) {
    span.pb_inc(1);
}
