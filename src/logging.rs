//! Internal diagnostics for ctxlog
//!
//! The facade reports on itself (fallbacks, swallowed sink failures, pool
//! growth) through `tracing`, never through one of its own sinks.

// tracing macros under log_* names
pub(crate) use tracing::{
    debug as log_debug, error as log_error, trace as log_trace, warn as log_warn,
};
