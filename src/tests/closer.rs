// Unit Tests for Close Helper
//
// UNIT UNDER TEST: close_and_log_on_error
//
// BUSINESS RESPONSIBILITY:
//   - Runs cleanup operations that have nowhere to propagate failures
//   - Logs a failed close through the context's logger at error level
//
// TEST COVERAGE:
//   - Successful close logs nothing
//   - Failed close logs message, error text and call site
//   - Empty message suppresses logging

use crate::closer::close_and_log_on_error;
use crate::config::HandleSettings;
use crate::context::Context;
use crate::level::Level;
use crate::logger::Logger;
use crate::propagation::context_with_logger;
use crate::record::{Value, ERROR_KEY, FILE_KEY};
use crate::tests::helpers::RecordingSink;
use std::io;
use std::sync::Arc;

fn context_with_recorder() -> (Context, RecordingSink) {
    let sink = RecordingSink::new(Level::Debug);
    let logger = Logger::from_sink(
        Context::background(),
        Arc::new(sink.clone()),
        HandleSettings::default(),
    );
    (context_with_logger(&Context::background(), logger), sink)
}

#[cfg(test)]
mod close_and_log_tests {
    use super::*;

    #[test]
    fn test_successful_close_logs_nothing() {
        // Arrange
        let (ctx, sink) = context_with_recorder();

        // Act
        close_and_log_on_error(&ctx, || Ok::<(), io::Error>(()), "close failed");

        // Assert
        assert!(sink.entries().is_empty());
    }

    #[test]
    fn test_failed_close_logs_error() {
        // Arrange
        let (ctx, sink) = context_with_recorder();

        // Act
        let line = line!() + 1;
        close_and_log_on_error(&ctx, || Err(io::Error::other("disk gone")), "close failed");

        // Assert
        let entry = sink.last().expect("failure should be logged");
        assert_eq!(entry.level, Level::Error);
        assert_eq!(entry.message, "close failed");
        assert_eq!(entry.value(ERROR_KEY), Some(&Value::from("disk gone")));
        assert_eq!(
            entry.value(FILE_KEY),
            Some(&Value::from(format!("{}:{}", file!(), line))),
            "Caller location should be the helper's call site"
        );
    }

    #[test]
    fn test_empty_message_suppresses_logging() {
        // Arrange
        let (ctx, sink) = context_with_recorder();

        // Act
        close_and_log_on_error(&ctx, || Err(io::Error::other("ignored")), "");

        // Assert
        assert!(sink.entries().is_empty());
    }
}
