//! Fan-out composition of several sinks.

use super::Sink;
use crate::error::LogResult;
use crate::level::Level;
use crate::record::{Attr, Record};
use std::fmt;
use std::sync::Arc;

/// Presents N independently configured sinks as one.
///
/// - `enabled` is true when any member is enabled.
/// - `handle` dispatches to every member in registration order; a member whose
///   own level filter rejects the record drops it in its `handle`. Dispatch
///   stops at the first member error, which is returned. Members before the
///   failing one have already received the record.
/// - Derivation asks every member to derive itself, so each keeps its own
///   rendering of the attributes.
#[derive(Clone, Default)]
pub struct FanOutSink {
    sinks: Vec<Arc<dyn Sink>>,
}

impl FanOutSink {
    pub fn new(sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self { sinks }
    }

    /// Register another member after the existing ones.
    pub fn push(&mut self, sink: Arc<dyn Sink>) {
        self.sinks.push(sink);
    }

    pub fn sinks(&self) -> &[Arc<dyn Sink>] {
        &self.sinks
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Sink for FanOutSink {
    fn enabled(&self, level: Level) -> bool {
        self.sinks.iter().any(|s| s.enabled(level))
    }

    fn handle(&self, record: &Record) -> LogResult<()> {
        for sink in &self.sinks {
            sink.handle(record)?;
        }
        Ok(())
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Sink> {
        Arc::new(Self {
            sinks: self.sinks.iter().map(|s| s.with_attrs(attrs)).collect(),
        })
    }

    fn with_group(&self, name: &str) -> Arc<dyn Sink> {
        Arc::new(Self {
            sinks: self.sinks.iter().map(|s| s.with_group(name)).collect(),
        })
    }
}

impl fmt::Debug for FanOutSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FanOutSink")
            .field("members", &self.sinks.len())
            .finish()
    }
}
