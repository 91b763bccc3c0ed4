use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use tracing::{Instrument, warn};

use crate::mprint;
use crate::terminal::{colors, format, print, progress, reporter::TerminalReporter};
use certwatch_common::cert::summary::ScanSummary;
use certwatch_common::config::AppConfig;
use certwatch_common::success;
use certwatch_core::notifier::BarkNotifier;
use certwatch_core::notifier::transport::ReqwestTransport;
use certwatch_core::prober::Prober;
use certwatch_core::scanner::ScanOrchestrator;

const PUSH_TIMEOUT: Duration = Duration::from_secs(10);

type Detail = (String, ColoredString);

/// One pass over every configured target.
pub async fn scan(cfg: &AppConfig, quiet: u8) -> anyhow::Result<ScanSummary> {
    let prober = Prober::tls().context("cannot set up the TLS client")?;
    let transport = ReqwestTransport::new(PUSH_TIMEOUT)?;
    let notifier = BarkNotifier::new(&cfg.push, transport);

    print_settings(cfg, quiet);
    print::header("checking certificates", quiet);

    let span = progress::scan_span(cfg.targets.len());
    let started: Instant = Instant::now();

    let summary = {
        let reporter = TerminalReporter::new(span.clone(), format::key_width(&cfg.targets));
        let orchestrator =
            ScanOrchestrator::new(Arc::new(prober), Arc::new(notifier), Arc::new(reporter))
                .with_policy(cfg.failure_policy)
                .with_strategy(cfg.strategy);

        orchestrator
            .run(&cfg.targets, cfg.warning_days, cfg.timeout)
            .instrument(span)
            .await
    };

    print_summary(&summary, started.elapsed(), quiet);
    Ok(summary)
}

fn print_settings(cfg: &AppConfig, quiet: u8) {
    if quiet > 0 {
        return;
    }

    let push: ColoredString = match &cfg.push.device_key {
        Some(_) => cfg.push.base_url.as_str().normal(),
        None => "disabled".yellow(),
    };

    let settings: Vec<(&str, ColoredString)> = vec![
        ("Targets", cfg.targets.len().to_string().normal()),
        ("Warning", format!("{} days", cfg.warning_days).normal()),
        ("Timeout", format!("{}s", cfg.timeout.as_secs()).normal()),
        ("Strategy", cfg.strategy.to_string().normal()),
        ("Failures", cfg.failure_policy.to_string().normal()),
        ("Push", push),
    ];
    let key_width: usize = settings.iter().map(|(key, _)| key.len()).max().unwrap_or(0);

    print::header("settings", quiet);
    for (key, value) in settings {
        print::aligned_line(key, value, key_width);
    }
}

fn summary_details(summary: &ScanSummary) -> Vec<Detail> {
    let count = |n: usize, color: Color| -> ColoredString {
        match n {
            0 => n.to_string().normal(),
            _ => n.to_string().color(color).bold(),
        }
    };

    let mut details: Vec<Detail> = vec![
        ("Healthy".to_string(), count(summary.healthy, colors::HEALTHY)),
        ("Expiring".to_string(), count(summary.expiring, colors::EXPIRING)),
        ("Expired".to_string(), count(summary.expired, colors::EXPIRED)),
        ("Failed".to_string(), count(summary.probe_failed, colors::FAILED)),
        ("Pushed".to_string(), count(summary.notifications_sent, colors::ACCENT)),
    ];

    if summary.notifications_failed > 0 {
        details.push((
            "Push errors".to_string(),
            count(summary.notifications_failed, colors::EXPIRED),
        ));
    }

    details
}

fn print_summary(summary: &ScanSummary, total_time: Duration, quiet: u8) {
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();

    if quiet == 0 {
        print::header("summary", quiet);
        print::as_tree_one_level(summary_details(summary));
        print::fat_separator();
    } else {
        mprint!();
    }

    if summary.all_clear() {
        success!(
            "All {} certificates are fine, checked in {total_time}",
            summary.total
        );
    } else {
        warn!(
            "{} of {} targets need attention, checked in {total_time}",
            summary.attention_count, summary.total
        );
    }

    if quiet == 0 {
        print::end_of_program();
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
