//! Test helper utilities for ctxlog unit tests
//!
//! Reusable sinks and writers that let tests observe exactly what a logger
//! emitted without going through stdout.
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

// Allow dead code in test utilities - helpers are used across different test files
#![allow(dead_code)]

use crate::error::{LogError, LogResult};
use crate::level::Level;
use crate::record::{Attr, Record, Value};
use crate::sink::{Output, Scope, Sink};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// In-memory writer whose contents can be read back after logging.
#[derive(Clone, Default)]
pub struct CaptureBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> Output {
        Output::writer(self.clone())
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// One record as seen by a [`RecordingSink`], with scope attributes resolved.
#[derive(Debug, Clone)]
pub struct Captured {
    pub level: Level,
    pub message: String,
    pub attrs: Vec<Attr>,
}

impl Captured {
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.attrs.iter().find(|a| a.key == key).map(|a| &a.value)
    }

    pub fn has(&self, key: &str) -> bool {
        self.value(key).is_some()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.attrs.iter().map(|a| a.key.as_str()).collect()
    }
}

/// Sink that stores every record it handles; derived sinks share storage.
#[derive(Clone)]
pub struct RecordingSink {
    name: &'static str,
    level: Level,
    fail: bool,
    entries: Arc<Mutex<Vec<Captured>>>,
    journal: Option<Arc<Mutex<Vec<&'static str>>>>,
    scope: Scope,
}

impl RecordingSink {
    pub fn new(level: Level) -> Self {
        Self {
            name: "recording",
            level,
            fail: false,
            entries: Arc::new(Mutex::new(Vec::new())),
            journal: None,
            scope: Scope::new(),
        }
    }

    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Reject every record at or above the sink's level after noting it in
    /// the journal.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Append the sink's name to `journal` on every `handle` call.
    pub fn with_journal(mut self, journal: Arc<Mutex<Vec<&'static str>>>) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn entries(&self) -> Vec<Captured> {
        self.entries.lock().clone()
    }

    pub fn last(&self) -> Option<Captured> {
        self.entries.lock().last().cloned()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries.lock().iter().map(|c| c.message.clone()).collect()
    }

    fn derive(&self, scope: Scope) -> Arc<dyn Sink> {
        Arc::new(Self {
            scope,
            ..self.clone()
        })
    }
}

impl Sink for RecordingSink {
    fn enabled(&self, level: Level) -> bool {
        level >= self.level
    }

    fn handle(&self, record: &Record) -> LogResult<()> {
        if let Some(journal) = &self.journal {
            journal.lock().push(self.name);
        }
        if record.level < self.level {
            return Ok(());
        }
        if self.fail {
            return Err(LogError::sink_rejected(self.name, "configured to fail"));
        }
        self.entries.lock().push(Captured {
            level: record.level,
            message: record.message.clone(),
            attrs: self.scope.flatten(&record.fields),
        });
        Ok(())
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Sink> {
        self.derive(self.scope.with_attrs(attrs))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Sink> {
        self.derive(self.scope.with_group(name))
    }
}

/// Shared journal for ordering assertions.
pub fn journal() -> Arc<Mutex<Vec<&'static str>>> {
    Arc::new(Mutex::new(Vec::new()))
}
