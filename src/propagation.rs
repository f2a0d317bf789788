//! Carrying a logger through a call chain inside a [`Context`].
//!
//! ```rust
//! use ctxlog::{context_with_logger, log, Context, Logger};
//!
//! let logger = Logger::new(Context::background(), []).with_field("service", "billing");
//! let ctx = context_with_logger(&Context::background(), logger);
//!
//! // deep inside the call chain
//! log(&ctx).info("charged", &[]);
//! ```

use crate::context::{Context, ContextKey};
use crate::logger::Logger;
use crate::sink::Sink;
use std::sync::Arc;

struct LoggerKey;

impl ContextKey for LoggerKey {
    type Value = Logger;
}

/// A child of `ctx` carrying `logger`.
pub fn context_with_logger(ctx: &Context, logger: Logger) -> Context {
    ctx.with_value::<LoggerKey>(logger)
}

/// The logger attached to `ctx`, or a default logger bound to `ctx`.
///
/// Never fails; logging is always safe to call unconditionally. The returned
/// handle shares its block with the attached one.
pub fn log(ctx: &Context) -> Logger {
    match ctx.value::<LoggerKey>() {
        Some(logger) => logger.clone(),
        None => Logger::new(ctx.clone(), []),
    }
}

/// The raw sink of the logger [`log`] would return.
pub fn slog(ctx: &Context) -> Arc<dyn Sink> {
    log(ctx).sink()
}
