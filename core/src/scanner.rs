//! The scan **orchestrator**.
//!
//! Drives probe → classify → notify for every target and reduces the
//! per-target reports into a [`ScanSummary`]. Each target is handled by one
//! [`Pipeline::check`] call, which is the unit of work for both strategies:
//!
//! * [`ScanStrategy::Sequential`] awaits the targets one after the other.
//! * [`ScanStrategy::Parallel`] spawns one tokio task per target and lets at
//!   most `workers` of them run at once.
//!
//! A failing target never stops the pass. A parallel check whose task panics
//! is reported as a probe failure, so the summary always counts every target.
//! The summary is built from the returned reports only, after every target
//! has been processed.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;
use tracing::{Instrument, debug, debug_span, warn};

use certwatch_common::cert::notification::NotifyOutcome;
use certwatch_common::cert::probe::ProbeResult;
use certwatch_common::cert::summary::ScanSummary;
use certwatch_common::cert::verdict::Verdict;
use certwatch_common::config::{FailurePolicy, ScanStrategy};
use certwatch_common::error::ProbeError;
use certwatch_common::network::target::Target;

use crate::classifier::classify;
use crate::clock::{Clock, SystemClock};
use crate::notifier::Notifier;
use crate::prober::CertificateProbe;

/// Everything known about one target after it has been checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetReport {
    pub target: Target,
    pub expiry: Option<DateTime<Utc>>,
    pub verdict: Verdict,
    /// Counted towards [`ScanSummary::attention_count`].
    pub needs_attention: bool,
    /// `None` when the verdict was not handed to the notifier.
    pub notification: Option<NotifyOutcome>,
}

/// Receives each report as soon as its target is done.
///
/// Called once per target, from whichever task finished it.
pub trait ScanReporter: Send + Sync {
    fn target_checked(&self, report: &TargetReport);
}

pub struct ScanOrchestrator {
    probe: Arc<dyn CertificateProbe>,
    notifier: Arc<dyn Notifier>,
    reporter: Arc<dyn ScanReporter>,
    clock: Arc<dyn Clock>,
    policy: FailurePolicy,
    strategy: ScanStrategy,
}

impl ScanOrchestrator {
    /// Sequential orchestrator on the system clock with the default failure policy.
    pub fn new(
        probe: Arc<dyn CertificateProbe>,
        notifier: Arc<dyn Notifier>,
        reporter: Arc<dyn ScanReporter>,
    ) -> Self {
        Self {
            probe,
            notifier,
            reporter,
            clock: Arc::new(SystemClock),
            policy: FailurePolicy::default(),
            strategy: ScanStrategy::Sequential,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_strategy(mut self, strategy: ScanStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Checks every target once and returns the tally.
    pub async fn run(&self, targets: &[Target], warning_days: u32, limit: Duration) -> ScanSummary {
        let pipeline = Pipeline {
            probe: Arc::clone(&self.probe),
            notifier: Arc::clone(&self.notifier),
            reporter: Arc::clone(&self.reporter),
            clock: Arc::clone(&self.clock),
            policy: self.policy,
            warning_days,
            limit,
        };

        debug!(
            "Checking {} targets, {}, failure policy {}",
            targets.len(),
            self.strategy,
            self.policy
        );

        let reports = match self.strategy {
            ScanStrategy::Sequential => run_sequential(&pipeline, targets).await,
            ScanStrategy::Parallel { workers } => {
                run_parallel(&pipeline, targets, workers.get()).await
            }
        };

        summarize(&reports)
    }
}

/// Folds reports into a summary.
pub fn summarize(reports: &[TargetReport]) -> ScanSummary {
    reports.iter().fold(ScanSummary::default(), |mut summary, report| {
        summary.record(
            &report.verdict,
            report.needs_attention,
            report.notification.as_ref(),
        );
        summary
    })
}

async fn run_sequential(pipeline: &Pipeline, targets: &[Target]) -> Vec<TargetReport> {
    let mut reports = Vec::with_capacity(targets.len());

    for target in targets {
        reports.push(pipeline.check(target.clone()).await);
    }

    reports
}

async fn run_parallel(pipeline: &Pipeline, targets: &[Target], workers: usize) -> Vec<TargetReport> {
    let semaphore = Arc::new(Semaphore::new(workers));

    let handles: Vec<_> = targets
        .iter()
        .cloned()
        .map(|target| {
            let pipeline = pipeline.clone();
            let semaphore = Arc::clone(&semaphore);

            tokio::spawn(async move {
                // The semaphore is never closed, so this always holds a permit.
                let _permit = semaphore.acquire_owned().await;
                pipeline.check(target).await
            })
        })
        .collect();

    // Awaiting in spawn order keeps the reports in list order.
    let mut reports = Vec::with_capacity(handles.len());
    for (handle, target) in handles.into_iter().zip(targets) {
        let report = match handle.await {
            Ok(report) => report,
            Err(e) => {
                warn!("Check of {target} aborted: {e}");
                let aborted = ProbeError::Aborted(e.to_string());
                let result = ProbeResult::failed(target.clone(), aborted);
                pipeline.conclude(target.clone(), result).await
            }
        };
        reports.push(report);
    }

    reports
}

/// One target's probe → classify → notify → report sequence.
#[derive(Clone)]
struct Pipeline {
    probe: Arc<dyn CertificateProbe>,
    notifier: Arc<dyn Notifier>,
    reporter: Arc<dyn ScanReporter>,
    clock: Arc<dyn Clock>,
    policy: FailurePolicy,
    warning_days: u32,
    limit: Duration,
}

impl Pipeline {
    async fn check(&self, target: Target) -> TargetReport {
        let span = debug_span!("check", %target);

        async move {
            let result = self.probe.probe(&target, self.limit).await;
            self.conclude(target, result).await
        }
        .instrument(span)
        .await
    }

    /// Classifies a probe result, notifies if the policy asks for it and reports.
    async fn conclude(&self, target: Target, result: ProbeResult) -> TargetReport {
        let verdict = classify(&result, self.clock.now(), self.warning_days);
        let expiry = result.expiry();

        let needs_attention = self.policy.needs_attention(&verdict);
        let notification = if self.policy.should_push(&verdict) {
            Some(self.notifier.notify(&verdict, &target, expiry).await)
        } else {
            None
        };

        debug!(
            "{} ({}), attention: {needs_attention}",
            verdict.label(),
            verdict
        );

        let report = TargetReport {
            target,
            expiry,
            verdict,
            needs_attention,
            notification,
        };
        self.reporter.target_checked(&report);
        report
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::num::NonZeroUsize;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
    }

    const CRASH_HOST: &str = "crash";

    /// Answers from a table of days-until-expiry; unknown hosts are refused.
    /// Panics on [`CRASH_HOST`].
    struct TableProbe {
        days: HashMap<String, i64>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl TableProbe {
        fn new(entries: &[(&str, i64)]) -> Self {
            Self {
                days: entries
                    .iter()
                    .map(|(host, days)| (host.to_string(), *days))
                    .collect(),
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CertificateProbe for TableProbe {
        async fn probe(&self, target: &Target, _limit: Duration) -> ProbeResult {
            if target.host() == CRASH_HOST {
                panic!("check of {target} crashed");
            }

            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(running, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.days.get(target.host()) {
                Some(days) => {
                    ProbeResult::expires_at(target.clone(), now() + chrono::Duration::days(*days))
                }
                None => ProbeResult::failed(
                    target.clone(),
                    ProbeError::ConnectionFailed("connection refused".into()),
                ),
            }
        }
    }

    #[derive(Default)]
    struct CountingNotifier {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        async fn notify(
            &self,
            _verdict: &Verdict,
            target: &Target,
            _expiry: Option<DateTime<Utc>>,
        ) -> NotifyOutcome {
            self.calls.lock().unwrap().push(target.host().to_string());
            NotifyOutcome::Sent
        }
    }

    #[derive(Default)]
    struct CollectingReporter {
        reports: Mutex<Vec<TargetReport>>,
    }

    impl ScanReporter for CollectingReporter {
        fn target_checked(&self, report: &TargetReport) {
            self.reports.lock().unwrap().push(report.clone());
        }
    }

    fn targets(hosts: &[&str]) -> Vec<Target> {
        hosts.iter().map(|h| Target::new(*h, 443).unwrap()).collect()
    }

    struct Harness {
        probe: Arc<TableProbe>,
        notifier: Arc<CountingNotifier>,
        reporter: Arc<CollectingReporter>,
    }

    impl Harness {
        fn new(entries: &[(&str, i64)]) -> Self {
            Self {
                probe: Arc::new(TableProbe::new(entries)),
                notifier: Arc::new(CountingNotifier::default()),
                reporter: Arc::new(CollectingReporter::default()),
            }
        }

        fn orchestrator(&self) -> ScanOrchestrator {
            ScanOrchestrator::new(
                self.probe.clone(),
                self.notifier.clone(),
                self.reporter.clone(),
            )
            .with_clock(Arc::new(FixedClock(now())))
        }

        fn pushed(&self) -> Vec<String> {
            self.notifier.calls.lock().unwrap().clone()
        }
    }

    const LIMIT: Duration = Duration::from_secs(10);

    #[tokio::test]
    async fn test_every_target_reported_once() {
        let harness = Harness::new(&[("a", 400), ("b", 5), ("c", -10), ("d", 31), ("e", 30)]);
        let list = targets(&["a", "b", "c", "d", "e", "down"]);

        let summary = harness.orchestrator().run(&list, 30, LIMIT).await;

        assert_eq!(summary.total, list.len());
        let reported: Vec<_> = harness
            .reporter
            .reports
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.target.clone())
            .collect();
        assert_eq!(reported, list);
        // b, c, e expiring or expired; down counted under the default policy
        assert_eq!(summary.attention_count, 4);
        assert_eq!(harness.pushed(), vec!["b", "c", "e"]);
    }

    #[tokio::test]
    async fn test_failure_policies() {
        let entries = [("ok", 100), ("soon", 3)];
        let list = targets(&["ok", "soon", "down-1", "down-2"]);

        let expectations = [
            (FailurePolicy::Ignore, 1, 1),
            (FailurePolicy::Count, 3, 1),
            (FailurePolicy::Notify, 3, 3),
        ];

        for (policy, attention, pushes) in expectations {
            let harness = Harness::new(&entries);
            let summary = harness
                .orchestrator()
                .with_policy(policy)
                .run(&list, 30, LIMIT)
                .await;

            assert_eq!(summary.total, 4, "{policy}");
            assert_eq!(summary.attention_count, attention, "{policy}");
            assert_eq!(summary.probe_failed, 2, "{policy}");
            assert_eq!(harness.pushed().len(), pushes, "{policy}");
            assert_eq!(summary.notifications_sent, pushes, "{policy}");
        }
    }

    #[tokio::test]
    async fn test_healthy_targets_never_notify() {
        let harness = Harness::new(&[("a", 100), ("b", 200)]);

        let summary = harness
            .orchestrator()
            .with_policy(FailurePolicy::Notify)
            .run(&targets(&["a", "b"]), 30, LIMIT)
            .await;

        assert!(summary.all_clear());
        assert!(harness.pushed().is_empty());
        assert!(
            harness
                .reporter
                .reports
                .lock()
                .unwrap()
                .iter()
                .all(|r| r.notification.is_none())
        );
    }

    #[tokio::test]
    async fn test_empty_target_list() {
        let harness = Harness::new(&[]);
        let summary = harness.orchestrator().run(&[], 30, LIMIT).await;

        assert_eq!(summary, ScanSummary::default());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_matches_sequential() {
        let entries: Vec<(String, i64)> = (0..40).map(|i| (format!("h{i}"), i * 3 - 20)).collect();
        let entries: Vec<(&str, i64)> = entries.iter().map(|(h, d)| (h.as_str(), *d)).collect();
        let mut hosts: Vec<&str> = entries.iter().map(|(h, _)| *h).collect();
        hosts.extend(["down-1", "down-2"]);
        let list = targets(&hosts);

        let sequential = Harness::new(&entries);
        let expected = sequential.orchestrator().run(&list, 30, LIMIT).await;

        for workers in [1, 3, 8, 64] {
            let parallel = Harness::new(&entries);
            let summary = parallel
                .orchestrator()
                .with_strategy(ScanStrategy::Parallel {
                    workers: NonZeroUsize::new(workers).unwrap(),
                })
                .run(&list, 30, LIMIT)
                .await;

            assert_eq!(summary, expected, "workers = {workers}");
            assert!(parallel.probe.peak.load(Ordering::SeqCst) <= workers);

            let mut pushed = parallel.pushed();
            let mut expected_pushed = sequential.pushed();
            pushed.sort();
            expected_pushed.sort();
            assert_eq!(pushed, expected_pushed, "workers = {workers}");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_parallel_keeps_crashed_checks_in_totals() {
        let harness = Harness::new(&[("a", 400), ("b", 5)]);
        let list = targets(&["a", CRASH_HOST, "b"]);

        let summary = harness
            .orchestrator()
            .with_policy(FailurePolicy::Notify)
            .with_strategy(ScanStrategy::Parallel {
                workers: NonZeroUsize::new(2).unwrap(),
            })
            .run(&list, 30, LIMIT)
            .await;

        assert_eq!(summary.total, 3);
        assert_eq!(summary.healthy, 1);
        assert_eq!(summary.expiring, 1);
        assert_eq!(summary.probe_failed, 1);
        assert_eq!(summary.attention_count, 2);

        let reports = harness.reporter.reports.lock().unwrap().clone();
        assert_eq!(reports.len(), 3);
        let crashed = reports
            .iter()
            .find(|r| r.target.host() == CRASH_HOST)
            .expect("crashed target is reported");
        assert!(matches!(
            &crashed.verdict,
            Verdict::ProbeFailed { reason: ProbeError::Aborted(_) }
        ));

        let mut pushed = harness.pushed();
        pushed.sort();
        assert_eq!(pushed, vec!["b", CRASH_HOST]);
    }

    #[test]
    fn test_summarize_reports() {
        let report = |verdict: Verdict, needs_attention: bool| TargetReport {
            target: Target::new("x", 443).unwrap(),
            expiry: None,
            verdict,
            needs_attention,
            notification: None,
        };

        let summary = summarize(&[
            report(Verdict::Healthy { days_left: 90 }, false),
            report(Verdict::Expired { days_overdue: 2 }, true),
        ]);

        assert_eq!(summary.total, 2);
        assert_eq!(summary.attention_count, 1);
        assert_eq!(summary.expired, 1);
    }
}
