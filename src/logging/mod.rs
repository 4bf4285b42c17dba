//! Logging and observability
//!
//! Structured logging through `tracing`, with a console layer and an
//! optional rotating JSON file layer.
//!
//! # Example
//!
//! ```no_run
//! use trackplan::logging::init_logging;
//! use trackplan::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(source = "amplitude", "Source ready");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a retry attempt against the taxonomy API
///
/// # Example
///
/// ```no_run
/// use trackplan::log_retry_attempt;
/// use std::time::Duration;
///
/// log_retry_attempt!(2, 3, Duration::from_secs(2), "status 503");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_retries:expr, $delay:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_retries = $max_retries,
            delay_ms = $delay.as_millis() as u64,
            reason = %$reason,
            "Retrying taxonomy request"
        );
    };
}

/// Log the outcome of initializing one data source
///
/// # Example
///
/// ```no_run
/// use trackplan::log_source_status;
///
/// log_source_status!("insider", true, "file");
/// ```
#[macro_export]
macro_rules! log_source_status {
    ($source:expr, $ready:expr, $mode:expr) => {
        if $ready {
            tracing::info!(source = %$source, mode = %$mode, "Source ready");
        } else {
            tracing::warn!(source = %$source, "Source unavailable");
        }
    };
}
