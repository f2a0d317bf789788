//! Human-readable console sink with optional ANSI colors.

use super::{Output, Scope, Sink};
use crate::config::DEFAULT_TIME_FORMAT;
use crate::error::LogResult;
use crate::level::Level;
use crate::logging::log_warn;
use crate::record::{Attr, Record, Value, ERROR_KEY};
use chrono::format::{Item, StrftimeItems};
use std::fmt::Write as _;
use std::sync::Arc;

const ANSI_RESET: &str = "\x1b[0m";
const ANSI_FAINT: &str = "\x1b[2m";
const ANSI_BRIGHT_RED: &str = "\x1b[91m";
const ANSI_BRIGHT_GREEN: &str = "\x1b[92m";
const ANSI_BRIGHT_YELLOW: &str = "\x1b[93m";

/// Rendering settings for a [`ConsoleSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleOptions {
    /// Minimum level written.
    pub level: Level,
    /// `chrono` strftime format for the leading timestamp; empty omits it.
    pub time_format: String,
    pub no_color: bool,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self {
            level: Level::Info,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            no_color: false,
        }
    }
}

/// Writes `time LVL message key=value ...` lines.
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    output: Output,
    options: Arc<ConsoleOptions>,
    scope: Scope,
}

impl ConsoleSink {
    /// An invalid time format falls back to the default one.
    pub fn new(output: Output, mut options: ConsoleOptions) -> Self {
        if !is_valid_time_format(&options.time_format) {
            log_warn!(
                time_format = %options.time_format,
                "Invalid log time format, falling back to default"
            );
            options.time_format = DEFAULT_TIME_FORMAT.to_string();
        }
        Self {
            output,
            options: Arc::new(options),
            scope: Scope::new(),
        }
    }

    pub fn options(&self) -> &ConsoleOptions {
        &self.options
    }

    fn derive(&self, scope: Scope) -> Arc<dyn Sink> {
        Arc::new(Self {
            output: self.output.clone(),
            options: Arc::clone(&self.options),
            scope,
        })
    }

    /// Render one record as a newline-terminated line.
    pub fn render(&self, record: &Record) -> String {
        let color = !self.options.no_color;
        let mut line = String::with_capacity(128);

        if !self.options.time_format.is_empty() {
            if color {
                line.push_str(ANSI_FAINT);
            }
            let _ = write!(line, "{}", record.time.format(&self.options.time_format));
            if color {
                line.push_str(ANSI_RESET);
            }
            line.push(' ');
        }

        match level_color(record.level).filter(|_| color) {
            Some(code) => {
                let _ = write!(line, "{code}{}{ANSI_RESET}", record.level.tag());
            }
            None => line.push_str(record.level.tag()),
        }
        line.push(' ');
        line.push_str(&record.message);

        for attr in self.scope.flatten(&record.fields) {
            line.push(' ');
            write_attr(&mut line, &attr, color);
        }
        line.push('\n');
        line
    }
}

impl Sink for ConsoleSink {
    fn enabled(&self, level: Level) -> bool {
        level >= self.options.level
    }

    fn handle(&self, record: &Record) -> LogResult<()> {
        if record.level < self.options.level {
            return Ok(());
        }
        self.output.write_line(self.render(record).as_bytes())
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Sink> {
        self.derive(self.scope.with_attrs(attrs))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Sink> {
        self.derive(self.scope.with_group(name))
    }
}

pub(crate) fn is_valid_time_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

fn level_color(level: Level) -> Option<&'static str> {
    match level {
        Level::Debug => None,
        Level::Info => Some(ANSI_BRIGHT_GREEN),
        Level::Warn => Some(ANSI_BRIGHT_YELLOW),
        Level::Error => Some(ANSI_BRIGHT_RED),
    }
}

fn write_attr(line: &mut String, attr: &Attr, color: bool) {
    if color {
        let _ = write!(line, "{ANSI_FAINT}{}={ANSI_RESET}", attr.key);
    } else {
        let _ = write!(line, "{}=", attr.key);
    }

    let is_error = color && attr.key.rsplit('.').next() == Some(ERROR_KEY);
    if is_error {
        line.push_str(ANSI_BRIGHT_RED);
    }
    write_value(line, &attr.value);
    if is_error {
        line.push_str(ANSI_RESET);
    }
}

fn write_value(line: &mut String, value: &Value) {
    match value {
        Value::String(s) if needs_quoting(s) => {
            let _ = write!(line, "{s:?}");
        }
        Value::String(s) => line.push_str(s),
        other => {
            let _ = write!(line, "{other}");
        }
    }
}

fn needs_quoting(s: &str) -> bool {
    s.is_empty()
        || s.chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '"' || c == '=')
}
