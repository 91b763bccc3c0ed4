//! rustls-backed [`Handshaker`].
//!
//! Trust anchors come from the bundled Mozilla root store. Chain and name
//! checks are those of the standard WebPKI verifier, with one exception: an
//! expired certificate is accepted so its expiry can still be read and
//! reported as `Expired` instead of as a handshake failure. It must still
//! name the target host.

use std::sync::Arc;

use async_trait::async_trait;
use rustls::client::WebPkiServerVerifier;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::client::{VerifierBuilderError, verify_server_name};
use rustls::crypto::{CryptoProvider, ring};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::server::ParsedCertificate;
use rustls::{CertificateError, ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

use certwatch_common::error::ProbeError;
use certwatch_common::network::target::Target;

use crate::prober::Handshaker;

/// The TLS client could not be configured.
#[derive(Debug, Error)]
pub enum TlsSetupError {
    #[error("cannot build certificate verifier: {0}")]
    Verifier(#[from] VerifierBuilderError),

    #[error("cannot configure TLS client: {0}")]
    Client(#[from] rustls::Error),
}

pub struct RustlsHandshaker {
    connector: TlsConnector,
}

impl RustlsHandshaker {
    pub fn new() -> Result<Self, TlsSetupError> {
        let provider: Arc<CryptoProvider> = Arc::new(ring::default_provider());

        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let inner =
            WebPkiServerVerifier::builder_with_provider(Arc::new(roots), Arc::clone(&provider))
                .build()?;

        let config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()?
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(ExpiryTolerantVerifier { inner }))
            .with_no_client_auth();

        Ok(Self {
            connector: TlsConnector::from(Arc::new(config)),
        })
    }
}

#[async_trait]
impl Handshaker<TcpStream> for RustlsHandshaker {
    async fn handshake(&self, stream: TcpStream, target: &Target) -> Result<Vec<u8>, ProbeError> {
        let server_name = ServerName::try_from(target.host().to_string())
            .map_err(|e| ProbeError::TlsHandshakeFailed(format!("invalid server name: {e}")))?;

        let mut tls = self
            .connector
            .connect(server_name, stream)
            .await
            .map_err(|e| ProbeError::TlsHandshakeFailed(e.to_string()))?;

        let leaf: Option<Vec<u8>> = tls
            .get_ref()
            .1
            .peer_certificates()
            .and_then(|chain| chain.first())
            .map(|cert| cert.as_ref().to_vec());

        // close_notify is best effort; the socket is dropped either way.
        let _ = tls.shutdown().await;

        leaf.ok_or_else(|| {
            ProbeError::CertificateUnparsable("server presented no certificate".to_string())
        })
    }
}

/// WebPKI verification that lets expired certificates through.
#[derive(Debug)]
struct ExpiryTolerantVerifier {
    inner: Arc<WebPkiServerVerifier>,
}

impl ServerCertVerifier for ExpiryTolerantVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        match self.inner.verify_server_cert(
            end_entity,
            intermediates,
            server_name,
            ocsp_response,
            now,
        ) {
            Err(rustls::Error::InvalidCertificate(
                CertificateError::Expired | CertificateError::ExpiredContext { .. },
            )) => accept_expired(end_entity, server_name),
            other => other,
        }
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        self.inner.verify_tls12_signature(message, cert, dss)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        self.inner.verify_tls13_signature(message, cert, dss)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.inner.supported_verify_schemes()
    }
}

/// WebPKI reports expiry before it looks at the subject names, so the name
/// check is redone here.
fn accept_expired(
    end_entity: &CertificateDer<'_>,
    server_name: &ServerName<'_>,
) -> Result<ServerCertVerified, rustls::Error> {
    let cert = ParsedCertificate::try_from(end_entity)?;
    verify_server_name(&cert, server_name)?;
    Ok(ServerCertVerified::assertion())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
