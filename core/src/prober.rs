//! The certificate **prober**.
//!
//! A probe is one TLS handshake against one target. The network is reached
//! only through two ports so the logic can be exercised without sockets:
//!
//! * [`Dialer`] opens the transport stream (TCP in production).
//! * [`Handshaker`] runs the TLS handshake on that stream and hands back the
//!   leaf certificate in DER form.
//!
//! Both steps are bounded by the same timeout. Every failure is captured in
//! the returned [`ProbeResult`]; a probe never panics or returns early with an
//! error. The stream is owned by the handshake step and dropped before the
//! probe returns.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::time::timeout;
use tracing::debug;

use certwatch_common::cert::probe::ProbeResult;
use certwatch_common::error::ProbeError;
use certwatch_common::network::target::Target;

use crate::network::tcp::TcpDialer;
use crate::network::tls::{RustlsHandshaker, TlsSetupError};

mod x509;

pub use x509::not_after;

/// Opens a byte stream to a target.
#[async_trait]
pub trait Dialer: Send + Sync {
    type Stream: Send + 'static;

    async fn dial(&self, target: &Target) -> Result<Self::Stream, ProbeError>;
}

/// Runs a TLS client handshake over `S` and returns the peer's leaf certificate (DER).
#[async_trait]
pub trait Handshaker<S: Send + 'static>: Send + Sync {
    async fn handshake(&self, stream: S, target: &Target) -> Result<Vec<u8>, ProbeError>;
}

/// Anything that can tell when a target's certificate expires.
#[async_trait]
pub trait CertificateProbe: Send + Sync {
    async fn probe(&self, target: &Target, limit: Duration) -> ProbeResult;
}

pub struct Prober<D, H> {
    dialer: D,
    handshaker: H,
}

impl<D, H> Prober<D, H> {
    pub fn new(dialer: D, handshaker: H) -> Self {
        Self { dialer, handshaker }
    }
}

impl Prober<TcpDialer, RustlsHandshaker> {
    /// TCP + rustls, trusting the bundled Mozilla roots.
    pub fn tls() -> Result<Self, TlsSetupError> {
        Ok(Self::new(TcpDialer, RustlsHandshaker::new()?))
    }
}

impl<D, H> Prober<D, H>
where
    D: Dialer,
    H: Handshaker<D::Stream>,
{
    async fn fetch_expiry(
        &self,
        target: &Target,
        limit: Duration,
    ) -> Result<DateTime<Utc>, ProbeError> {
        let stream = timeout(limit, self.dialer.dial(target))
            .await
            .map_err(|_| ProbeError::ConnectionFailed(format!("timed out after {limit:?}")))??;

        let der = timeout(limit, self.handshaker.handshake(stream, target))
            .await
            .map_err(|_| ProbeError::TlsHandshakeFailed(format!("timed out after {limit:?}")))??;

        not_after(&der)
    }
}

#[async_trait]
impl<D, H> CertificateProbe for Prober<D, H>
where
    D: Dialer,
    H: Handshaker<D::Stream>,
{
    async fn probe(&self, target: &Target, limit: Duration) -> ProbeResult {
        let outcome = self.fetch_expiry(target, limit).await;

        match &outcome {
            Ok(expiry) => debug!("{target} certificate expires {expiry}"),
            Err(e) => debug!("{target} probe failed: {e}"),
        }

        ProbeResult {
            target: target.clone(),
            outcome,
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
