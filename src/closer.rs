use crate::context::Context;
use crate::propagation::log;
use std::error::Error;

/// Run a fallible close operation and log its failure with `message`.
///
/// Nothing is logged when `message` is empty. The failure is never returned:
/// this is meant for cleanup paths that have nowhere to propagate it.
///
/// ```rust
/// use ctxlog::{close_and_log_on_error, Context};
/// use std::io::Write;
///
/// let mut file: Vec<u8> = Vec::new();
/// close_and_log_on_error(&Context::background(), || file.flush(), "could not flush export");
/// ```
#[track_caller]
pub fn close_and_log_on_error<F, E>(ctx: &Context, close: F, message: &str)
where
    F: FnOnce() -> Result<(), E>,
    E: Error,
{
    if let Err(err) = close() {
        if !message.is_empty() {
            log(ctx).with_error(&err).error(message, &[]);
        }
    }
}
