// Error types for certwatch
//
// Configuration errors are fatal and abort before any probing. Target, probe
// and notification errors are scoped to a single entry or target.

use thiserror::Error;

/// Fatal configuration problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting is absent (push credential, target list).
    #[error("missing configuration: {0}")]
    Missing(String),

    /// A setting is present but cannot be used.
    #[error("invalid value '{value}' for '{key}': {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },

    /// The configuration file exists but cannot be read, or a required one is absent.
    #[error("could not read configuration file {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration source itself could not be parsed.
    #[error("could not read configuration: {0}")]
    Source(#[from] ::config::ConfigError),
}

/// A single entry of the target list that could not be parsed.
///
/// The entry is skipped; the rest of the list is still scanned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetParseError {
    #[error("'{entry}' has no host")]
    EmptyHost { entry: String },

    #[error("'{entry}' has an invalid port '{port}'")]
    InvalidPort { entry: String, port: String },

    #[error("'{entry}' is not a valid host or host:port")]
    Malformed { entry: String },
}

/// Why a probe could not produce an expiry date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// TCP connect failed: refused, unresolvable or timed out.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The TLS handshake was rejected or did not complete in time.
    #[error("TLS handshake failed: {0}")]
    TlsHandshakeFailed(String),

    /// No certificate was presented or its validity could not be read.
    #[error("certificate unparsable: {0}")]
    CertificateUnparsable(String),

    /// The check stopped before it produced a result, e.g. its task panicked.
    #[error("check aborted: {0}")]
    Aborted(String),
}

/// Delivery failures of the push notifier. Never fatal to a scan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("invalid push endpoint: {0}")]
    InvalidUrl(String),

    #[error("push request failed: {0}")]
    Transport(String),

    #[error("push service answered with status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Returned when a failure policy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown failure policy '{0}' (expected ignore, count or notify)")]
pub struct UnknownFailurePolicy(pub String);
