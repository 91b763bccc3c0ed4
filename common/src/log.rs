#[doc(hidden)]
pub use tracing as __tracing;

/// Target used for events that report a successful outcome.
pub const SUCCESS_TARGET: &str = "certwatch::success";

/// Emits an `INFO` event that the terminal formatter renders as a success line.
#[macro_export]
macro_rules! success {
    ($($arg:tt)+) => {
        $crate::log::__tracing::info!(target: "certwatch::success", $($arg)+)
    };
}
