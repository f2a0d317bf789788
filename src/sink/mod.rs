//! Sink capability and built-in sinks.
//!
//! A [`Sink`] is the backend a [`Logger`](crate::Logger) emits through. Any
//! type implementing the four methods below can be used on its own or as a
//! member of a [`FanOutSink`].
//!
//! ## Built-in sinks
//! - [`ConsoleSink`] - human-readable, optionally colored lines
//! - [`JsonSink`] - one JSON object per line
//! - [`TracingSink`] - forwards records into `tracing` events
//! - [`FanOutSink`] - presents several sinks as one

mod console;
mod fanout;
mod forward;
mod json;
mod output;
mod scope;

pub use console::{ConsoleOptions, ConsoleSink};
pub use fanout::FanOutSink;
pub use forward::TracingSink;
pub use json::JsonSink;
pub use output::{Output, SharedWriter};
pub use scope::{Scope, ScopeEntry};

use crate::error::LogResult;
use crate::level::Level;
use crate::record::{Attr, Record};
use std::sync::Arc;

/// Backend capability every log destination implements.
///
/// Derivation (`with_attrs`, `with_group`) must leave the receiver untouched
/// and return a new sink; loggers rely on this to stay immutable.
/// `handle` may be called concurrently from many threads.
#[cfg_attr(test, mockall::automock)]
pub trait Sink: Send + Sync {
    /// Whether a record at `level` would be handled.
    fn enabled(&self, level: Level) -> bool;

    /// Deliver one record. Records below the sink's own level are dropped
    /// here and reported as `Ok`, since a fan-out hands every record to every
    /// member.
    fn handle(&self, record: &Record) -> LogResult<()>;

    /// A sink that additionally carries `attrs` on every record.
    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Sink>;

    /// A sink that qualifies all subsequent attributes with group `name`.
    fn with_group(&self, name: &str) -> Arc<dyn Sink>;
}
