//! Output destinations for the built-in sinks.

use crate::error::{LogError, LogResult};
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

/// A writer shared between every sink derived from the same root.
pub type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Where rendered records are written.
///
/// Writes are synchronous and unbuffered by the sink; each record is written
/// with a single `write_all` followed by `flush` while holding the lock, so
/// lines from concurrent callers never interleave.
#[derive(Clone)]
pub enum Output {
    Stdout,
    Stderr,
    Writer(SharedWriter),
}

impl Output {
    /// Wrap any writer as an output destination.
    pub fn writer(writer: impl Write + Send + 'static) -> Self {
        Self::Writer(Arc::new(Mutex::new(Box::new(writer))))
    }

    pub(crate) fn write_line(&self, line: &[u8]) -> LogResult<()> {
        let result = match self {
            Self::Stdout => write_locked(&mut io::stdout().lock(), line),
            Self::Stderr => write_locked(&mut io::stderr().lock(), line),
            Self::Writer(writer) => write_locked(&mut *writer.lock(), line),
        };
        result.map_err(LogError::write_failed)
    }
}

fn write_locked<W: Write + ?Sized>(w: &mut W, line: &[u8]) -> io::Result<()> {
    w.write_all(line)?;
    w.flush()
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("Stdout"),
            Self::Stderr => f.write_str("Stderr"),
            Self::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}
