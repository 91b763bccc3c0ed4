//! In-memory stand-ins for the network, the push service and the terminal.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use certwatch_common::error::{NotifyError, ProbeError};
use certwatch_common::network::target::Target;
use certwatch_core::notifier::transport::{HttpResponse, HttpTransport};
use certwatch_core::prober::{Dialer, Handshaker};
use certwatch_core::scanner::{ScanReporter, TargetReport};
use url::Url;

pub const GOOD_CERT: &[u8] = include_bytes!("../../core/fixtures/good.der");
pub const SOON_CERT: &[u8] = include_bytes!("../../core/fixtures/soon.der");
pub const DEAD_CERT: &[u8] = include_bytes!("../../core/fixtures/dead.der");

pub const DOWN_HOST: &str = "down.example";
pub const SLOW_HOST: &str = "slow.example";

pub struct FakeStream;

/// Refuses `down.example`, never answers `slow.example`, connects everything else.
pub struct FakeDialer;

#[async_trait]
impl Dialer for FakeDialer {
    type Stream = FakeStream;

    async fn dial(&self, target: &Target) -> Result<FakeStream, ProbeError> {
        match target.host() {
            DOWN_HOST => Err(ProbeError::ConnectionFailed(
                "connection refused".to_string(),
            )),
            SLOW_HOST => std::future::pending().await,
            _ => Ok(FakeStream),
        }
    }
}

/// Serves the fixture certificate named after the host's first label.
pub struct FakeHandshaker;

#[async_trait]
impl Handshaker<FakeStream> for FakeHandshaker {
    async fn handshake(&self, _stream: FakeStream, target: &Target) -> Result<Vec<u8>, ProbeError> {
        let label = target.host().split('.').next().unwrap_or_default();

        match label {
            "good" => Ok(GOOD_CERT.to_vec()),
            "soon" => Ok(SOON_CERT.to_vec()),
            "dead" => Ok(DEAD_CERT.to_vec()),
            _ => Err(ProbeError::TlsHandshakeFailed(
                "received fatal alert: HandshakeFailure".to_string(),
            )),
        }
    }
}

/// Push service that records every request and answers with `status`.
#[derive(Clone)]
pub struct RecordingTransport {
    status: u16,
    requests: Arc<Mutex<Vec<Url>>>,
}

impl RecordingTransport {
    pub fn answering(status: u16) -> Self {
        Self {
            status,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<Url> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn get(&self, url: Url) -> Result<HttpResponse, NotifyError> {
        self.requests.lock().unwrap().push(url);
        Ok(HttpResponse {
            status: self.status,
            body: format!(r#"{{"code":{}}}"#, self.status),
        })
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<TargetReport>>,
}

impl RecordingReporter {
    pub fn reports(&self) -> Vec<TargetReport> {
        self.reports.lock().unwrap().clone()
    }
}

impl ScanReporter for RecordingReporter {
    fn target_checked(&self, report: &TargetReport) {
        self.reports.lock().unwrap().push(report.clone());
    }
}
