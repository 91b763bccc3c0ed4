//! Socket-backed implementations of the prober ports.

pub mod tcp;
pub mod tls;
