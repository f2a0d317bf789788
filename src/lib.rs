//! # ctxlog
//!
//! Context-scoped structured logging with immutable logger handles, pooled
//! handle storage and pluggable sinks.
//!
//! ## Key Features
//!
//! - **Immutable chaining**: `with_field`, `with_fields`, `with_error` and
//!   `with_context` return new handles and never touch the receiver
//! - **Handle pool**: handle storage is recycled through a process-wide free list
//! - **Fan-out**: several sinks (console, JSON, `tracing`, custom) behind one
//! - **Context propagation**: attach a logger to a [`Context`] and fetch it
//!   anywhere down the call chain with [`log`]
//! - **Escalation**: [`Logger::fatal`] exits the process, [`Logger::panic`]
//!   raises a panic a supervising boundary can catch
//!
//! ## Example
//!
//! ```rust,no_run
//! use ctxlog::{attrs, context_with_logger, log, with_log_level, Context, Level, Logger};
//!
//! let logger = Logger::new(Context::background(), [with_log_level(Level::Debug)]);
//! let ctx = context_with_logger(&Context::background(), logger.with_field("tenant", "acme"));
//!
//! let request = log(&ctx).with_field("request_id", "r-1");
//! request.info("request accepted", &attrs!["path" => "/orders"]);
//! request.debug("cache miss", &[]);
//! ```

// Allow missing errors documentation - errors are self-documenting via type signatures
#![allow(clippy::missing_errors_doc)]

// Internal diagnostics (re-exports tracing with log_* naming) - internal only
pub(crate) mod logging;

pub(crate) mod caller;
pub mod closer;
pub mod config;
pub mod context;
pub mod error;
pub mod level;
pub mod logger;
pub mod pool;
pub mod propagation;
pub mod record;
pub mod sink;

#[cfg(test)]
pub mod tests;

// Re-export main types
pub use closer::close_and_log_on_error;
pub use config::{
    console_sink_factory, get_env, json_sink_factory, with_log_add_source, with_log_level,
    with_log_no_color, with_log_options, with_log_output, with_log_panic_caller, with_log_sink,
    with_log_sink_exclusive, with_log_sink_factory, with_log_stack_trace, with_log_time_format,
    HandleSettings, LogOption, LogOptions, ResolvedOptions, SinkFactory, DEFAULT_TIME_FORMAT,
};
pub use context::{
    context_with_request_id, new_request_id, request_id, set_tenancy, tenancy, Context,
    ContextKey, TenancyInfo,
};
pub use error::{LogError, LogResult};
pub use level::{parse_level, Level};
pub use logger::{Logger, FATAL_EXIT_CODE};
pub use pool::{pool_stats, PoolStats};
pub use propagation::{context_with_logger, log, slog};
pub use record::{attr, Attr, Record, Value, ERROR_KEY, FILE_KEY, STACK_KEY};
pub use sink::{
    ConsoleOptions, ConsoleSink, FanOutSink, JsonSink, Output, Sink, TracingSink,
};
