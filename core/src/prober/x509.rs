use chrono::{DateTime, Utc};
use x509_parser::prelude::{FromDer, X509Certificate};

use certwatch_common::error::ProbeError;

/// Reads the `notAfter` field of a DER encoded certificate as a UTC instant.
///
/// Both UTCTime and GeneralizedTime encodings are accepted.
pub fn not_after(der: &[u8]) -> Result<DateTime<Utc>, ProbeError> {
    let (_, cert) = X509Certificate::from_der(der)
        .map_err(|e| ProbeError::CertificateUnparsable(e.to_string()))?;

    let timestamp = cert.validity().not_after.timestamp();
    DateTime::from_timestamp(timestamp, 0).ok_or_else(|| {
        ProbeError::CertificateUnparsable(format!("notAfter {timestamp} is out of range"))
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
