//! JSON-lines sink.

use super::{Output, Scope, Sink};
use crate::error::{LogError, LogResult};
use crate::level::Level;
use crate::record::{Attr, Record, Value};
use chrono::SecondsFormat;
use serde_json::Map;
use std::sync::Arc;

/// Writes one JSON object per record: `time`, `level`, `msg`, then the
/// attributes, with each group as a nested object.
#[derive(Debug, Clone)]
pub struct JsonSink {
    output: Output,
    level: Level,
    scope: Scope,
}

impl JsonSink {
    pub fn new(output: Output, level: Level) -> Self {
        Self {
            output,
            level,
            scope: Scope::new(),
        }
    }

    fn derive(&self, scope: Scope) -> Arc<dyn Sink> {
        Arc::new(Self {
            output: self.output.clone(),
            level: self.level,
            scope,
        })
    }

    /// Render one record as a JSON object.
    pub fn render(&self, record: &Record) -> Value {
        let mut root = Map::new();
        root.insert(
            "time".to_string(),
            Value::String(record.time.to_rfc3339_opts(SecondsFormat::Millis, false)),
        );
        root.insert(
            "level".to_string(),
            Value::String(record.level.as_str().to_string()),
        );
        root.insert("msg".to_string(), Value::String(record.message.clone()));
        self.scope.nest_into(&mut root, &record.fields);
        Value::Object(root)
    }
}

impl Sink for JsonSink {
    fn enabled(&self, level: Level) -> bool {
        level >= self.level
    }

    fn handle(&self, record: &Record) -> LogResult<()> {
        if record.level < self.level {
            return Ok(());
        }
        let mut line =
            serde_json::to_vec(&self.render(record)).map_err(LogError::serialization_failed)?;
        line.push(b'\n');
        self.output.write_line(&line)
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Sink> {
        self.derive(self.scope.with_attrs(attrs))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Sink> {
        self.derive(self.scope.with_group(name))
    }
}
