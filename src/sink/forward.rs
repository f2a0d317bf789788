//! Sink that forwards records into `tracing`.

use super::{Scope, Sink};
use crate::error::LogResult;
use crate::level::Level;
use crate::record::{Attr, Record};
use std::sync::Arc;

/// Emits each record as a `tracing` event with target `ctxlog`.
///
/// The message goes in the event's `message` field and the attributes are
/// rendered as `key=value` pairs in a single `fields` field. Whether anything
/// is recorded is up to the host's `tracing` subscriber.
#[derive(Debug, Clone)]
pub struct TracingSink {
    level: Level,
    scope: Scope,
}

impl TracingSink {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            scope: Scope::new(),
        }
    }

    fn derive(&self, scope: Scope) -> Arc<dyn Sink> {
        Arc::new(Self {
            level: self.level,
            scope,
        })
    }
}

impl Sink for TracingSink {
    fn enabled(&self, level: Level) -> bool {
        if level < self.level {
            return false;
        }
        match level {
            Level::Debug => tracing::enabled!(target: "ctxlog", tracing::Level::DEBUG),
            Level::Info => tracing::enabled!(target: "ctxlog", tracing::Level::INFO),
            Level::Warn => tracing::enabled!(target: "ctxlog", tracing::Level::WARN),
            Level::Error => tracing::enabled!(target: "ctxlog", tracing::Level::ERROR),
        }
    }

    fn handle(&self, record: &Record) -> LogResult<()> {
        if record.level < self.level {
            return Ok(());
        }
        let fields = self
            .scope
            .flatten(&record.fields)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        let message = record.message.as_str();

        match record.level {
            Level::Debug => tracing::debug!(target: "ctxlog", fields = %fields, "{message}"),
            Level::Info => tracing::info!(target: "ctxlog", fields = %fields, "{message}"),
            Level::Warn => tracing::warn!(target: "ctxlog", fields = %fields, "{message}"),
            Level::Error => tracing::error!(target: "ctxlog", fields = %fields, "{message}"),
        }
        Ok(())
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Sink> {
        self.derive(self.scope.with_attrs(attrs))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Sink> {
        self.derive(self.scope.with_group(name))
    }
}
