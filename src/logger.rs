//! The logger handle.
//!
//! A [`Logger`] wraps an execution context, a sink and a few behavior flags.
//! Handles are immutable: every `with_*` call checks a fresh block out of the
//! handle pool, copies the receiver's fields into it and derives only the new
//! block's sink. The receiver stays valid and unchanged for every other
//! holder.
//!
//! ```rust
//! use ctxlog::{attrs, Context, Logger};
//!
//! let logger = Logger::new(Context::background(), []);
//! let request = logger.with_field("request_id", "r-42");
//! request.info("accepted", &attrs!["bytes" => 512]);
//! request.release();
//! ```
//!
//! Dropping a handle returns its block to the pool, exactly like
//! [`Logger::release`]. Clones share one block, which goes back to the pool
//! when the last clone is gone.

use crate::caller;
use crate::config::{HandleSettings, LogOption, LogOptions};
use crate::context::Context;
use crate::error::LogResult;
use crate::level::Level;
use crate::logging::log_warn;
use crate::pool::{self, PoolBlock, EMPTY_BLOCK};
use crate::record::{Attr, Record, Value, ERROR_KEY, STACK_KEY};
use crate::sink::{FanOutSink, Sink};
use once_cell::sync::Lazy;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Exit status used by [`Logger::fatal`].
pub const FATAL_EXIT_CODE: i32 = 1;

static BACKGROUND: Context = Context::background();

// An empty fan-out accepts nothing and discards everything.
static DISCARD: Lazy<Arc<dyn Sink>> = Lazy::new(|| Arc::new(FanOutSink::default()));

#[derive(Debug, Clone, Copy)]
struct Capture {
    caller: bool,
    stack: bool,
}

/// Context-scoped structured logger with immutable chaining.
#[derive(Clone)]
pub struct Logger {
    block: Option<Arc<PoolBlock>>,
}

impl Logger {
    /// Build a logger from option functions applied over the defaults.
    pub fn new(ctx: Context, options: impl IntoIterator<Item = LogOption>) -> Self {
        Self::from_options(ctx, &LogOptions::default().apply(options))
    }

    pub fn from_options(ctx: Context, options: &LogOptions) -> Self {
        let resolved = options.resolve();
        Self::from_sink(ctx, resolved.sink, resolved.settings)
    }

    /// Wrap an existing sink directly. `HandleSettings::default()` gives the
    /// same flags as a logger built from default options.
    pub fn from_sink(ctx: Context, sink: Arc<dyn Sink>, settings: HandleSettings) -> Self {
        Self {
            block: Some(pool::global().checkout(Some(ctx), sink, settings)),
        }
    }

    fn block(&self) -> &PoolBlock {
        self.block.as_deref().unwrap_or(&EMPTY_BLOCK)
    }

    fn sink_ref(&self) -> &Arc<dyn Sink> {
        self.block().sink.as_ref().unwrap_or(&*DISCARD)
    }

    /// Clone-on-write: a new block with the receiver's fields and `sink`.
    fn derive(&self, ctx: Option<Context>, sink: Arc<dyn Sink>) -> Self {
        Self {
            block: Some(pool::global().checkout(ctx, sink, self.block().settings)),
        }
    }

    /// Return the handle's block to the pool.
    pub fn release(self) {
        drop(self);
    }

    /// Whether two handles share the same block.
    pub fn same_handle(&self, other: &Logger) -> bool {
        match (&self.block, &other.block) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// The bound execution context (background when none was given).
    pub fn context(&self) -> &Context {
        self.block().ctx.as_ref().unwrap_or(&BACKGROUND)
    }

    /// The underlying sink, for code that wants to emit through it directly.
    pub fn sink(&self) -> Arc<dyn Sink> {
        Arc::clone(self.sink_ref())
    }

    pub fn settings(&self) -> HandleSettings {
        self.block().settings
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.sink_ref().enabled(level)
    }

    // =========================================================================
    // Enrichment
    // =========================================================================

    /// Same sink and flags, bound to `ctx`.
    pub fn with_context(&self, ctx: Context) -> Self {
        self.derive(Some(ctx), Arc::clone(self.sink_ref()))
    }

    /// Attach `err` (with its source chain) under `err`, plus a `stack`
    /// captured here when stack traces are enabled.
    pub fn with_error(&self, err: &dyn Error) -> Self {
        let mut attrs = vec![Attr::new(ERROR_KEY, error_chain(err))];
        if self.block().settings.stack_traces {
            attrs.extend(caller::stack_attr());
        }
        self.with(&attrs)
    }

    pub fn with_field(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(&[Attr::new(key, value)])
    }

    /// Attach many fields. An empty set returns the receiver itself.
    pub fn with_fields<K, V>(&self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let attrs: Vec<Attr> = fields
            .into_iter()
            .map(|(k, v)| Attr::new(k, v))
            .collect();
        self.with(&attrs)
    }

    /// Attach prepared attributes. An empty slice returns the receiver itself.
    pub fn with(&self, attrs: &[Attr]) -> Self {
        if attrs.is_empty() {
            return self.clone();
        }
        let sink = self.sink_ref().with_attrs(attrs);
        self.derive(self.block().ctx.clone(), sink)
    }

    /// Qualify all later attributes with group `name`.
    pub fn with_group(&self, name: &str) -> Self {
        if name.is_empty() {
            return self.clone();
        }
        let sink = self.sink_ref().with_group(name);
        self.derive(self.block().ctx.clone(), sink)
    }

    // =========================================================================
    // Emission
    // =========================================================================

    /// Alias of [`Logger::debug`].
    #[track_caller]
    pub fn trace(&self, msg: &str, fields: &[Attr]) {
        self.debug(msg, fields);
    }

    #[track_caller]
    pub fn debug(&self, msg: &str, fields: &[Attr]) {
        self.emit(Level::Debug, msg, fields, Capture { caller: true, stack: false });
    }

    #[track_caller]
    pub fn info(&self, msg: &str, fields: &[Attr]) {
        self.emit(Level::Info, msg, fields, self.source_capture());
    }

    #[track_caller]
    pub fn warn(&self, msg: &str, fields: &[Attr]) {
        self.emit(Level::Warn, msg, fields, self.source_capture());
    }

    #[track_caller]
    pub fn error(&self, msg: &str, fields: &[Attr]) {
        self.emit(Level::Error, msg, fields, self.error_capture());
    }

    #[track_caller]
    pub fn log(&self, level: Level, msg: &str, fields: &[Attr]) {
        self.emit(level, msg, fields, self.source_capture());
    }

    /// Format and emit only when `level` is enabled.
    ///
    /// ```rust
    /// # use ctxlog::{Context, Level, Logger};
    /// # let logger = Logger::new(Context::background(), []);
    /// logger.logf(Level::Info, format_args!("served {} requests", 12));
    /// ```
    #[track_caller]
    pub fn logf(&self, level: Level, args: fmt::Arguments<'_>) {
        if self.enabled(level) {
            self.emit(level, &args.to_string(), &[], self.source_capture());
        }
    }

    #[track_caller]
    pub fn printf(&self, args: fmt::Arguments<'_>) {
        self.logf(Level::Info, args);
    }

    /// Emit and hand back the sink's error instead of swallowing it.
    #[track_caller]
    pub fn try_log(&self, level: Level, msg: &str, fields: &[Attr]) -> LogResult<()> {
        let sink = self.sink_ref();
        if !sink.enabled(level) {
            return Ok(());
        }
        sink.handle(&self.build_record(level, msg, fields, self.source_capture()))
    }

    /// Log at error level, release the handle and exit the process with
    /// [`FATAL_EXIT_CODE`].
    #[track_caller]
    pub fn fatal(self, msg: &str, fields: &[Attr]) -> ! {
        self.emit(Level::Error, msg, fields, self.error_capture());
        self.release();
        std::process::exit(FATAL_EXIT_CODE)
    }

    /// Log at error level, then panic with the message.
    ///
    /// The panic payload is a `String` holding the message, the stack trace
    /// when enabled, and the fields as `[key=value ...]`. It can be
    /// intercepted with `std::panic::catch_unwind`.
    #[track_caller]
    pub fn panic(&self, msg: &str, fields: &[Attr]) -> ! {
        let settings = self.block().settings;
        let stack = if settings.stack_traces {
            caller::stack_trace()
        } else {
            None
        };

        let sink = self.sink_ref();
        if sink.enabled(Level::Error) {
            let mut record = Record::new(Level::Error, msg);
            if settings.panic_caller {
                record.fields.push(caller::caller_attr());
            }
            record.fields.extend_from_slice(fields);
            if let Some(stack) = &stack {
                record.fields.push(Attr::new(STACK_KEY, stack.as_str()));
            }
            report(sink.handle(&record), Level::Error);
        }

        std::panic::panic_any(panic_message(msg, stack.as_deref(), fields))
    }

    /// Terminate the process with `code`.
    pub fn exit(&self, code: i32) -> ! {
        std::process::exit(code)
    }

    fn source_capture(&self) -> Capture {
        Capture {
            caller: self.block().settings.add_source,
            stack: false,
        }
    }

    fn error_capture(&self) -> Capture {
        Capture {
            caller: true,
            stack: self.block().settings.stack_traces,
        }
    }

    #[track_caller]
    fn emit(&self, level: Level, msg: &str, fields: &[Attr], capture: Capture) {
        let sink = self.sink_ref();
        if !sink.enabled(level) {
            return;
        }
        let record = self.build_record(level, msg, fields, capture);
        report(sink.handle(&record), level);
    }

    #[track_caller]
    fn build_record(&self, level: Level, msg: &str, fields: &[Attr], capture: Capture) -> Record {
        let mut record = Record::new(level, msg);
        record.fields.reserve(fields.len() + 2);
        if capture.caller {
            record.fields.push(caller::caller_attr());
        }
        record.fields.extend_from_slice(fields);
        if capture.stack {
            record.fields.extend(caller::stack_attr());
        }
        record
    }
}

impl Default for Logger {
    /// Background context, default options.
    fn default() -> Self {
        Self::from_options(Context::background(), &LogOptions::default())
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Some(block) = self.block.take() {
            pool::global().recycle(block);
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("context", self.context())
            .field("settings", &self.block().settings)
            .finish_non_exhaustive()
    }
}

fn report(result: LogResult<()>, level: Level) {
    if let Err(err) = result {
        log_warn!(level = %level, error = %err, "Log record dispatch failed");
    }
}

fn error_chain(err: &dyn Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

fn panic_message(msg: &str, stack: Option<&str>, fields: &[Attr]) -> String {
    let mut text = msg.to_string();
    if let Some(stack) = stack {
        text.push('\n');
        text.push_str(stack);
    }
    if !fields.is_empty() {
        let rendered: Vec<String> = fields.iter().map(ToString::to_string).collect();
        text.push_str(" [");
        text.push_str(&rendered.join(" "));
        text.push(']');
    }
    text
}
