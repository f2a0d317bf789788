//! Log records and their key/value attributes.

use crate::level::Level;
use chrono::{DateTime, Local};
use std::fmt;

/// Attribute value. Anything convertible into JSON can be attached.
pub type Value = serde_json::Value;

/// Key of the attribute carrying an attached error.
pub const ERROR_KEY: &str = "err";

/// Key of the attribute carrying the caller location (`path:line`).
pub const FILE_KEY: &str = "file";

/// Key of the attribute carrying a captured stack trace.
pub const STACK_KEY: &str = "stack";

/// A single key/value pair attached to a sink or a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The value as a string slice, if it is a JSON string.
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }
}

/// Shorthand for [`Attr::new`].
pub fn attr(key: impl Into<String>, value: impl Into<Value>) -> Attr {
    Attr::new(key, value)
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Value::String(s) => write!(f, "{}={}", self.key, s),
            other => write!(f, "{}={}", self.key, other),
        }
    }
}

/// Build a `Vec<Attr>` from `key => value` pairs.
///
/// ```rust
/// use ctxlog::attrs;
///
/// let fields = attrs!["user" => "ada", "attempt" => 3];
/// assert_eq!(fields.len(), 2);
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        ::std::vec::Vec::<$crate::Attr>::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Attr::new($key, $value)),+]
    };
}

/// One emitted log event, as handed to a [`Sink`](crate::Sink).
///
/// `fields` holds only the attributes passed with the emission call (plus the
/// caller location and stack trace when captured); attributes attached through
/// `with_*` live in the sink itself.
#[derive(Debug, Clone)]
pub struct Record {
    pub time: DateTime<Local>,
    pub level: Level,
    pub message: String,
    pub fields: Vec<Attr>,
}

impl Record {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            time: Local::now(),
            level,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields(mut self, fields: impl IntoIterator<Item = Attr>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// First field with the given key.
    pub fn field(&self, key: &str) -> Option<&Attr> {
        self.fields.iter().find(|a| a.key == key)
    }
}
