#![cfg(test)]
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use certwatch_common::cert::notification::{NotifyOutcome, SkipReason};
use certwatch_common::cert::verdict::Verdict;
use certwatch_common::config::loader::{ConfigLoader, Overrides};
use certwatch_common::config::{FailurePolicy, PushConfig, ScanStrategy};
use certwatch_common::error::ProbeError;
use certwatch_common::network::target::Target;
use certwatch_core::clock::FixedClock;
use certwatch_core::notifier::BarkNotifier;
use certwatch_core::prober::Prober;
use certwatch_core::scanner::ScanOrchestrator;
use chrono::{TimeZone, Utc};

use crate::fakes::{FakeDialer, FakeHandshaker, RecordingReporter, RecordingTransport};

const LIMIT: Duration = Duration::from_secs(10);
const WARNING_DAYS: u32 = 30;

struct World {
    transport: RecordingTransport,
    reporter: Arc<RecordingReporter>,
    orchestrator: ScanOrchestrator,
}

fn world(device_key: Option<&str>, push_status: u16) -> World {
    let transport = RecordingTransport::answering(push_status);
    let reporter = Arc::new(RecordingReporter::default());

    let push = PushConfig {
        device_key: device_key.map(str::to_string),
        base_url: "https://push.example.org".to_string(),
        icon: None,
    };

    let orchestrator = ScanOrchestrator::new(
        Arc::new(Prober::new(FakeDialer, FakeHandshaker)),
        Arc::new(BarkNotifier::new(&push, transport.clone())),
        reporter.clone(),
    )
    .with_clock(Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
    )));

    World {
        transport,
        reporter,
        orchestrator,
    }
}

fn targets(hosts: &[&str]) -> Vec<Target> {
    hosts
        .iter()
        .map(|host| host.parse().expect("valid target"))
        .collect()
}

fn standard_targets() -> Vec<Target> {
    targets(&["good.example", "soon.example", "dead.example", "down.example"])
}

/// One healthy, one expiring, one expired and one unreachable target.
#[tokio::test]
async fn scan_mixed_targets_end_to_end() {
    let world = world(Some("k3y"), 200);

    let summary = world
        .orchestrator
        .run(&standard_targets(), WARNING_DAYS, LIMIT)
        .await;

    assert_eq!(summary.total, 4);
    assert_eq!(summary.attention_count, 3);
    assert_eq!(summary.healthy, 1);
    assert_eq!(summary.expiring, 1);
    assert_eq!(summary.expired, 1);
    assert_eq!(summary.probe_failed, 1);
    assert_eq!(summary.notifications_sent, 2);

    let requests = world.transport.requests();
    assert_eq!(requests.len(), 2, "exactly one push per expiring or expired target");
    assert!(requests[0]
        .path()
        .starts_with("/k3y/Certificate%20expiring%20soon/soon.example:443"));
    assert!(requests[1]
        .path()
        .starts_with("/k3y/Certificate%20expired/dead.example:443"));

    let verdicts: Vec<Verdict> = world
        .reporter
        .reports()
        .into_iter()
        .map(|report| report.verdict)
        .collect();
    assert_eq!(
        verdicts,
        vec![
            Verdict::Healthy { days_left: 400 },
            Verdict::ExpiringSoon { days_remaining: 5 },
            Verdict::Expired { days_overdue: 10 },
            Verdict::ProbeFailed {
                reason: ProbeError::ConnectionFailed("connection refused".to_string()),
            },
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn scan_parallel_matches_sequential() {
    let sequential = world(Some("k3y"), 200);
    let expected = sequential
        .orchestrator
        .run(&standard_targets(), WARNING_DAYS, LIMIT)
        .await;

    let parallel = world(Some("k3y"), 200);
    let orchestrator = parallel.orchestrator.with_strategy(ScanStrategy::Parallel {
        workers: NonZeroUsize::new(3).unwrap(),
    });
    let summary = orchestrator
        .run(&standard_targets(), WARNING_DAYS, LIMIT)
        .await;

    assert_eq!(summary, expected);
    assert_eq!(parallel.transport.requests().len(), 2);
    assert_eq!(parallel.reporter.reports().len(), 4);
}

#[tokio::test]
async fn scan_failure_policies() {
    let expectations = [
        (FailurePolicy::Ignore, 2, 2),
        (FailurePolicy::Count, 3, 2),
        (FailurePolicy::Notify, 3, 3),
    ];

    for (policy, attention, pushes) in expectations {
        let world = world(Some("k3y"), 200);
        let orchestrator = world.orchestrator.with_policy(policy);

        let summary = orchestrator
            .run(&standard_targets(), WARNING_DAYS, LIMIT)
            .await;

        assert_eq!(summary.attention_count, attention, "policy {policy}");
        assert_eq!(world.transport.requests().len(), pushes, "policy {policy}");
    }
}

#[tokio::test]
async fn scan_without_key_pushes_nothing() {
    let world = world(None, 200);

    let summary = world
        .orchestrator
        .run(&standard_targets(), WARNING_DAYS, LIMIT)
        .await;

    assert_eq!(summary.attention_count, 3);
    assert_eq!(summary.notifications_sent, 0);
    assert!(world.transport.requests().is_empty());
    assert!(world
        .reporter
        .reports()
        .iter()
        .filter_map(|report| report.notification.clone())
        .all(|outcome| outcome == NotifyOutcome::Skipped(SkipReason::NoCredential)));
}

#[tokio::test]
async fn scan_survives_push_service_errors() {
    let world = world(Some("k3y"), 500);

    let summary = world
        .orchestrator
        .run(&standard_targets(), WARNING_DAYS, LIMIT)
        .await;

    assert_eq!(summary.total, 4);
    assert_eq!(summary.notifications_sent, 0);
    assert_eq!(summary.notifications_failed, 2);
}

#[tokio::test(start_paused = true)]
async fn scan_times_out_unresponsive_target_only() {
    let world = world(Some("k3y"), 200);
    let list = targets(&["slow.example", "soon.example"]);

    let summary = world.orchestrator.run(&list, WARNING_DAYS, LIMIT).await;

    assert_eq!(summary.total, 2);
    assert_eq!(summary.probe_failed, 1);
    assert_eq!(summary.expiring, 1);

    let reports = world.reporter.reports();
    assert!(matches!(
        &reports[0].verdict,
        Verdict::ProbeFailed { reason: ProbeError::ConnectionFailed(msg) } if msg.contains("timed out")
    ));
}

/// Settings from the environment drive a full pass.
#[tokio::test]
async fn scan_from_loaded_configuration() {
    let cfg = ConfigLoader::new()
        .without_file()
        .with_env(|name| {
            match name {
                "BARK_KEY" => Some("k3y"),
                "BARK_URL" => Some("https://push.example.org/"),
                "DOMAINS" => Some(
                    "good.example\nsoon.example, dead.example:443\n# staging\ndown.example\nsoon.example",
                ),
                "DAYS_THRESHOLD" => Some("30"),
                _ => None,
            }
            .map(str::to_string)
        })
        .load(&Overrides::default())
        .expect("configuration loads");

    assert_eq!(cfg.targets, standard_targets());
    assert_eq!(cfg.push.base_url, "https://push.example.org");

    let transport = RecordingTransport::answering(200);
    let reporter = Arc::new(RecordingReporter::default());
    let orchestrator = ScanOrchestrator::new(
        Arc::new(Prober::new(FakeDialer, FakeHandshaker)),
        Arc::new(BarkNotifier::new(&cfg.push, transport.clone())),
        reporter.clone(),
    )
    .with_clock(Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
    )))
    .with_policy(cfg.failure_policy)
    .with_strategy(cfg.strategy);

    let summary = orchestrator
        .run(&cfg.targets, cfg.warning_days, cfg.timeout)
        .await;

    assert_eq!(summary.total, 4);
    assert_eq!(summary.attention_count, 3);
    assert_eq!(transport.requests().len(), 2);
    assert!(transport
        .requests()
        .iter()
        .all(|url| url.query_pairs().any(|(key, _)| key == "icon")));
}
