//! Error types for log dispatch.
//!
//! Configuration never fails: unresolvable options fall back to defaults so
//! that logging is never the reason a program cannot start. The only errors
//! this crate produces come from delivering a record to a sink.
//!
//! # Error Types
//!
//! The main error type is [`LogError`]:
//! - Write failures on the configured output destination
//! - Serialization failures in the JSON sink
//! - Records refused by a custom sink
//!
//! # Result Type
//!
//! Use [`LogResult<T>`] as a convenient alias for `Result<T, LogError>`:
//!
//! ```rust
//! use ctxlog::LogResult;
//!
//! fn flush_all() -> LogResult<()> {
//!     Ok(())
//! }
//! ```

use crate::logging::{log_error, log_warn};
use std::io;
use thiserror::Error;

/// Convenient result type for sink operations.
pub type LogResult<T> = std::result::Result<T, LogError>;

/// Errors that can occur while dispatching a record to a sink.
///
/// Use the constructor methods, which report the failure through the crate's
/// own diagnostics as they build the value:
///
/// ```rust
/// use ctxlog::LogError;
///
/// let err = LogError::sink_rejected("audit", "queue full");
/// assert!(!err.is_transient());
/// ```
#[derive(Error, Debug)]
pub enum LogError {
    /// Writing a rendered record to the output destination failed.
    #[error("Log output write failed: {source}")]
    Write {
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A record could not be serialized.
    #[error("Log record serialization failed: {source}")]
    Serialization {
        /// The underlying serializer error.
        #[source]
        source: serde_json::Error,
    },

    /// A sink refused the record.
    #[error("Sink rejected record: {sink} - {message}")]
    SinkRejected {
        /// Name of the sink that refused the record.
        sink: String,
        /// Why the record was refused.
        message: String,
    },
}

impl LogError {
    /// Whether retrying the same write could succeed.
    ///
    /// Only interrupted, would-block and timed-out writes qualify; every
    /// other failure indicates a broken destination.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Write { source } => matches!(
                source.kind(),
                io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
            ),
            Self::Serialization { .. } | Self::SinkRejected { .. } => false,
        }
    }

    // =========================================================================
    // Constructor methods with automatic diagnostics
    // =========================================================================

    /// Create a write error (reported at ERROR level).
    pub fn write_failed(source: io::Error) -> Self {
        log_error!(
            error_type = "write_failed",
            kind = ?source.kind(),
            message = %source,
            "Log output write failed"
        );
        Self::Write { source }
    }

    pub fn serialization_failed(source: serde_json::Error) -> Self {
        log_error!(
            error_type = "serialization_failed",
            message = %source,
            "Log record serialization failed"
        );
        Self::Serialization { source }
    }

    pub fn sink_rejected(sink: impl Into<String>, message: impl Into<String>) -> Self {
        let sink = sink.into();
        let message = message.into();
        log_warn!(
            error_type = "sink_rejected",
            sink = %sink,
            message = %message,
            "Sink rejected log record"
        );
        Self::SinkRejected { sink, message }
    }
}
