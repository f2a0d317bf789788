//! Logger configuration.
//!
//! [`LogOptions`] starts from fixed defaults and is transformed by an ordered
//! list of [`LogOption`] functions; the last writer for a field wins. Every
//! transformation consumes and returns a value, so two loggers built from the
//! same base options with different overrides never interfere.
//!
//! ```rust
//! use ctxlog::{with_log_level, with_log_stack_trace, Context, Level, Logger};
//!
//! let logger = Logger::new(
//!     Context::background(),
//!     [with_log_level(Level::Debug), with_log_stack_trace()],
//! );
//! logger.debug("configured", &[]);
//! ```
//!
//! Nothing here can fail: unknown level names, malformed flags and invalid
//! time formats all fall back to the defaults.

use crate::level::{parse_level, Level};
use crate::logging::log_debug;
use crate::sink::{ConsoleOptions, ConsoleSink, FanOutSink, JsonSink, Output, Sink};
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;

/// Default timestamp format (`2006-01-02 15:04:05` style).
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Builds the primary sink from the resolved output and options.
pub type SinkFactory = Arc<dyn Fn(Output, &LogOptions) -> Arc<dyn Sink> + Send + Sync>;

static DEFAULT_SINK_FACTORY: Lazy<SinkFactory> =
    Lazy::new(|| Arc::new(console_sink_factory) as SinkFactory);

/// The default factory: a [`ConsoleSink`] honoring level, time format and
/// color settings.
pub fn console_sink_factory(output: Output, options: &LogOptions) -> Arc<dyn Sink> {
    Arc::new(ConsoleSink::new(
        output,
        ConsoleOptions {
            level: options.level,
            time_format: options.time_format.clone(),
            no_color: options.no_color,
        },
    ))
}

/// A factory producing a [`JsonSink`] at the configured level.
pub fn json_sink_factory(output: Output, options: &LogOptions) -> Arc<dyn Sink> {
    Arc::new(JsonSink::new(output, options.level))
}

/// Per-handle behavior flags carried by every logger block.
///
/// The default matches the settings resolved from [`LogOptions::default`]:
/// caller location on panic, no stack traces, no caller on info/warn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleSettings {
    /// Attach a `stack` attribute on error paths.
    pub stack_traces: bool,
    /// Attach the caller location on every level, not only debug/error.
    pub add_source: bool,
    /// Attach the caller location when panicking.
    pub panic_caller: bool,
}

impl HandleSettings {
    pub const DEFAULT: Self = Self {
        stack_traces: false,
        add_source: false,
        panic_caller: true,
    };
}

impl Default for HandleSettings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Logging configuration.
#[derive(Clone)]
pub struct LogOptions {
    /// Minimum level the default sink writes.
    pub level: Level,
    /// Capture caller location on info/warn as well.
    pub add_source: bool,
    /// `chrono` strftime format for console timestamps.
    pub time_format: String,
    pub no_color: bool,
    /// Capture stack traces on error, fatal and panic.
    pub show_stack_trace: bool,
    /// Capture caller location on panic.
    pub panic_caller: bool,
    /// Destination; `None` routes by level (stderr for error, else stdout).
    pub output: Option<Output>,
    /// Caller-supplied sink, fanned out alongside the primary one.
    pub sink: Option<Arc<dyn Sink>>,
    /// Use the caller-supplied sink alone.
    pub sink_exclusive: bool,
    /// Builds the primary sink.
    pub sink_factory: SinkFactory,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: Level::Info,
            add_source: false,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            no_color: false,
            show_stack_trace: false,
            panic_caller: true,
            output: None,
            sink: None,
            sink_exclusive: false,
            sink_factory: Arc::clone(&DEFAULT_SINK_FACTORY),
        }
    }
}

impl fmt::Debug for LogOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogOptions")
            .field("level", &self.level)
            .field("add_source", &self.add_source)
            .field("time_format", &self.time_format)
            .field("no_color", &self.no_color)
            .field("show_stack_trace", &self.show_stack_trace)
            .field("panic_caller", &self.panic_caller)
            .field("output", &self.output)
            .field("sink", &self.sink.as_ref().map(|_| ".."))
            .field("sink_exclusive", &self.sink_exclusive)
            .finish_non_exhaustive()
    }
}

/// Resolved configuration: the sink to emit through and the handle flags.
#[derive(Clone)]
pub struct ResolvedOptions {
    pub sink: Arc<dyn Sink>,
    pub settings: HandleSettings,
}

impl LogOptions {
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_add_source(mut self, add_source: bool) -> Self {
        self.add_source = add_source;
        self
    }

    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    pub fn with_stack_trace(mut self, show_stack_trace: bool) -> Self {
        self.show_stack_trace = show_stack_trace;
        self
    }

    pub fn with_panic_caller(mut self, panic_caller: bool) -> Self {
        self.panic_caller = panic_caller;
        self
    }

    pub fn with_output(mut self, output: Output) -> Self {
        self.output = Some(output);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_sink_exclusive(mut self, exclusive: bool) -> Self {
        self.sink_exclusive = exclusive;
        self
    }

    pub fn with_sink_factory(
        mut self,
        factory: impl Fn(Output, &LogOptions) -> Arc<dyn Sink> + Send + Sync + 'static,
    ) -> Self {
        self.sink_factory = Arc::new(factory);
        self
    }

    /// Apply option functions in order.
    pub fn apply(self, options: impl IntoIterator<Item = LogOption>) -> Self {
        options.into_iter().fold(self, |acc, opt| opt.apply(acc))
    }

    /// Defaults overlaid with `LOG_LEVEL`, `LOG_TIME_FORMAT`, `LOG_NO_COLOR`
    /// (or `NO_COLOR`), `LOG_STACK_TRACE` and `LOG_ADD_SOURCE`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let no_color = env_flag("LOG_NO_COLOR")
            .unwrap_or_else(|| !get_env("NO_COLOR", "").is_empty());

        Self {
            level: parse_level(&get_env("LOG_LEVEL", defaults.level.as_str())),
            time_format: get_env("LOG_TIME_FORMAT", &defaults.time_format),
            no_color,
            show_stack_trace: env_flag("LOG_STACK_TRACE").unwrap_or(defaults.show_stack_trace),
            add_source: env_flag("LOG_ADD_SOURCE").unwrap_or(defaults.add_source),
            ..defaults
        }
    }

    /// The destination the primary sink writes to.
    pub fn output_destination(&self) -> Output {
        match &self.output {
            Some(output) => output.clone(),
            None if self.level >= Level::Error => Output::Stderr,
            None => Output::Stdout,
        }
    }

    pub fn settings(&self) -> HandleSettings {
        HandleSettings {
            stack_traces: self.show_stack_trace,
            add_source: self.add_source,
            panic_caller: self.panic_caller,
        }
    }

    /// Build the sink: the factory's primary sink, the caller-supplied sink
    /// alone when exclusive, or both behind a [`FanOutSink`].
    pub fn resolve(&self) -> ResolvedOptions {
        let sink = match &self.sink {
            Some(custom) if self.sink_exclusive => Arc::clone(custom),
            Some(custom) => {
                let primary = (self.sink_factory)(self.output_destination(), self);
                Arc::new(FanOutSink::new(vec![primary, Arc::clone(custom)])) as Arc<dyn Sink>
            }
            None => (self.sink_factory)(self.output_destination(), self),
        };
        ResolvedOptions {
            sink,
            settings: self.settings(),
        }
    }
}

/// An option-application function.
pub struct LogOption(Box<dyn FnOnce(LogOptions) -> LogOptions + Send>);

impl LogOption {
    pub fn new(apply: impl FnOnce(LogOptions) -> LogOptions + Send + 'static) -> Self {
        Self(Box::new(apply))
    }

    pub fn apply(self, options: LogOptions) -> LogOptions {
        (self.0)(options)
    }
}

impl From<LogOptions> for LogOption {
    fn from(options: LogOptions) -> Self {
        with_log_options(options)
    }
}

impl fmt::Debug for LogOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LogOption(..)")
    }
}

pub fn with_log_level(level: Level) -> LogOption {
    LogOption::new(move |o| o.with_level(level))
}

pub fn with_log_add_source() -> LogOption {
    LogOption::new(|o| o.with_add_source(true))
}

pub fn with_log_time_format(format: impl Into<String>) -> LogOption {
    let format = format.into();
    LogOption::new(move |o| o.with_time_format(format))
}

pub fn with_log_no_color() -> LogOption {
    LogOption::new(|o| o.with_no_color(true))
}

pub fn with_log_stack_trace() -> LogOption {
    LogOption::new(|o| o.with_stack_trace(true))
}

pub fn with_log_panic_caller(enabled: bool) -> LogOption {
    LogOption::new(move |o| o.with_panic_caller(enabled))
}

pub fn with_log_output(output: Output) -> LogOption {
    LogOption::new(move |o| o.with_output(output))
}

pub fn with_log_sink(sink: Arc<dyn Sink>) -> LogOption {
    LogOption::new(move |o| o.with_sink(sink))
}

/// Use the sink given by [`with_log_sink`] alone, without the default one.
pub fn with_log_sink_exclusive() -> LogOption {
    LogOption::new(|o| o.with_sink_exclusive(true))
}

pub fn with_log_sink_factory(
    factory: impl Fn(Output, &LogOptions) -> Arc<dyn Sink> + Send + Sync + 'static,
) -> LogOption {
    LogOption::new(move |o| o.with_sink_factory(factory))
}

/// Replace the options wholesale; later options still apply on top.
pub fn with_log_options(options: LogOptions) -> LogOption {
    LogOption::new(move |_| options)
}

/// The value of environment variable `key`, or `fallback` when unset.
pub fn get_env(key: &str, fallback: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| fallback.to_string())
}

fn env_flag(key: &str) -> Option<bool> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            log_debug!(key = %key, value = %other, "Unrecognized boolean, using default");
            None
        }
    }
}
