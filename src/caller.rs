//! Caller-location and stack-trace capture.
//!
//! Caller location is resolved at compile time through `#[track_caller]`:
//! every public emission method and the private helpers between it and
//! [`caller_attr`] carry the attribute, so the reported location is the user's
//! call site rather than a frame inside the logger.

use crate::record::{Attr, FILE_KEY, STACK_KEY};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::panic::Location;

/// `file` attribute holding the caller's `path:line`.
#[track_caller]
pub(crate) fn caller_attr() -> Attr {
    let location = Location::caller();
    Attr::new(FILE_KEY, format!("{}:{}", location.file(), location.line()))
}

/// Current stack as multi-line text; `None` where the platform cannot
/// produce one.
pub(crate) fn stack_trace() -> Option<String> {
    let trace = Backtrace::force_capture();
    match trace.status() {
        BacktraceStatus::Captured => Some(trace.to_string()),
        _ => None,
    }
}

pub(crate) fn stack_attr() -> Option<Attr> {
    stack_trace().map(|stack| Attr::new(STACK_KEY, stack))
}
