//! # certwatch core
//!
//! The certificate-expiry engine.
//!
//! * **[`prober`]**: one TLS handshake per target, returning the leaf certificate's `notAfter`.
//!     * Network access goes through the [`prober::Dialer`] and [`prober::Handshaker`] ports,
//!       implemented for real sockets in [`network`].
//! * **[`classifier`]**: turns a probe result into a [`Verdict`](certwatch_common::cert::verdict::Verdict).
//! * **[`notifier`]**: pushes alerts to a Bark-style webhook.
//! * **[`scanner`]**: drives probe → classify → notify for every target and builds the summary.

pub mod classifier;
pub mod clock;
pub mod network;
pub mod notifier;
pub mod prober;
pub mod scanner;
