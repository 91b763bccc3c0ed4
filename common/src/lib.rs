//! Shared building blocks for `certwatch`.
//!
//! * [`network`]: scan targets and target-list parsing.
//! * [`cert`]: probe results, verdicts, notification outcomes and the scan summary.
//! * [`config`]: the application configuration and its loader.
//! * [`error`]: the error taxonomy used across the workspace.
//! * [`log`]: logging macros shared by the binaries.

pub mod cert;
pub mod config;
pub mod error;
pub mod log;
pub mod network;
