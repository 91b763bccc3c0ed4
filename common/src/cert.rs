//! # Certificate check models
//!
//! Values produced while checking one target, from the raw probe outcome to
//! the aggregated summary of a whole pass.

pub mod notification;
pub mod probe;
pub mod summary;
pub mod verdict;
