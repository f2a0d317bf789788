//! Test helper utilities for ctxlog integration tests
//!
//! This module provides reusable fixtures that are shared across the
//! integration test binaries.
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

// Allow dead code in test utilities - functions are used across different test files
#![allow(dead_code)]

use ctxlog::{
    with_log_no_color, with_log_output, with_log_time_format, Attr, Level, LogOption, LogResult,
    Output, Record, Sink,
};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// Writer that keeps everything written to it.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
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

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Options for a colorless, timestamp-free console logger writing to `buffer`.
pub fn plain_console(buffer: &SharedBuffer) -> Vec<LogOption> {
    vec![
        with_log_output(buffer.output()),
        with_log_no_color(),
        with_log_time_format(""),
    ]
}

/// Custom sink storing `(level, message, attribute keys)` per record.
///
/// Attributes attached through derivation are kept in `scope` so each derived
/// sink reports its own keys; storage is shared by all of them.
#[derive(Clone)]
pub struct CollectingSink {
    level: Level,
    scope: Vec<Attr>,
    records: Arc<Mutex<Vec<(Level, String, Vec<String>)>>>,
}

impl CollectingSink {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            scope: Vec::new(),
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn records(&self) -> Vec<(Level, String, Vec<String>)> {
        self.records.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records.lock().iter().map(|r| r.1.clone()).collect()
    }
}

impl Sink for CollectingSink {
    fn enabled(&self, level: Level) -> bool {
        level >= self.level
    }

    fn handle(&self, record: &Record) -> LogResult<()> {
        if record.level < self.level {
            return Ok(());
        }
        let keys = self
            .scope
            .iter()
            .chain(record.fields.iter())
            .map(|a| a.key.clone())
            .collect();
        self.records
            .lock()
            .push((record.level, record.message.clone(), keys));
        Ok(())
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Sink> {
        let mut derived = self.clone();
        derived.scope.extend_from_slice(attrs);
        Arc::new(derived)
    }

    fn with_group(&self, _name: &str) -> Arc<dyn Sink> {
        Arc::new(self.clone())
    }
}
