// Unit Tests for Fan-Out Sink Composition
//
// UNIT UNDER TEST: FanOutSink
//
// BUSINESS RESPONSIBILITY:
//   - Presents several independently configured sinks as one
//   - Dispatches each record to members in registration order
//   - Reports the first member failure to the caller
//   - Derives every member when attributes or groups are added
//
// TEST COVERAGE:
//   - Enabled is the OR of member levels
//   - Dispatch order and short-circuit on the first error
//   - Every member receives the record and drops it by its own level
//   - Derivation reaches every member without touching the original
//   - Empty fan-out discards everything

use crate::error::LogError;
use crate::level::Level;
use crate::record::{attr, Record};
use crate::sink::{FanOutSink, MockSink, Sink};
use crate::tests::helpers::{journal, RecordingSink};
use mockall::Sequence;
use std::sync::Arc;

#[cfg(test)]
mod fanout_dispatch_tests {
    use super::*;

    #[test]
    fn test_enabled_is_any_member_enabled() {
        // Test verifies a fan-out of {Info, Error} members accepts info and
        // error but rejects debug

        // Arrange
        let fanout = FanOutSink::new(vec![
            Arc::new(RecordingSink::new(Level::Info)),
            Arc::new(RecordingSink::new(Level::Error)),
        ]);

        // Act & Assert
        assert!(fanout.enabled(Level::Info));
        assert!(fanout.enabled(Level::Error));
        assert!(!fanout.enabled(Level::Debug));
    }

    #[test]
    fn test_handle_stops_at_first_error() {
        // Test verifies A receives the record, B fails, and C is never called

        // Arrange
        let mut seq = Sequence::new();
        let mut a = MockSink::new();
        let mut b = MockSink::new();
        let mut c = MockSink::new();
        for member in [&mut a, &mut b, &mut c] {
            member.expect_enabled().return_const(true);
        }
        a.expect_handle()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        b.expect_handle()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(LogError::sink_rejected("b", "queue full")));
        c.expect_handle().never();
        let fanout = FanOutSink::new(vec![Arc::new(a), Arc::new(b), Arc::new(c)]);

        // Act
        let result = fanout.handle(&Record::new(Level::Info, "hello"));

        // Assert
        match result {
            Err(LogError::SinkRejected { sink, message }) => {
                assert_eq!(sink, "b");
                assert_eq!(message, "queue full");
            }
            other => panic!("Expected B's error, got {other:?}"),
        }
    }

    #[test]
    fn test_handle_preserves_registration_order() {
        // Arrange
        let order = journal();
        let mut fanout = FanOutSink::default();
        fanout.push(Arc::new(
            RecordingSink::new(Level::Debug)
                .named("first")
                .with_journal(order.clone()),
        ));
        fanout.push(Arc::new(
            RecordingSink::new(Level::Debug)
                .named("second")
                .with_journal(order.clone()),
        ));

        // Act
        fanout
            .handle(&Record::new(Level::Info, "ordered"))
            .expect("both members accept");

        // Assert
        assert_eq!(*order.lock(), vec!["first", "second"]);
        assert_eq!(fanout.len(), 2);
    }

    #[test]
    fn test_members_receive_record_fields() {
        // Arrange
        let mut member = MockSink::new();
        member.expect_enabled().return_const(true);
        member
            .expect_handle()
            .withf(|record: &Record| {
                record.message == "with fields" && record.field("user").is_some()
            })
            .times(1)
            .returning(|_| Ok(()));
        let fanout = FanOutSink::new(vec![Arc::new(member)]);

        // Act
        let result = fanout.handle(
            &Record::new(Level::Warn, "with fields").with_fields([attr("user", "ada")]),
        );

        // Assert
        assert!(result.is_ok());
    }

    #[test]
    fn test_handle_reaches_members_below_their_level() {
        // Test verifies an error-only member is still handed an info record
        // and the fan-out leaves the filtering to it

        // Arrange
        let mut quiet = MockSink::new();
        quiet
            .expect_enabled()
            .returning(|level| level >= Level::Error);
        quiet
            .expect_handle()
            .withf(|record: &Record| record.level == Level::Info)
            .times(1)
            .returning(|_| Ok(()));
        let verbose = RecordingSink::new(Level::Debug);
        let fanout = FanOutSink::new(vec![Arc::new(quiet), Arc::new(verbose.clone())]);

        // Act
        let result = fanout.handle(&Record::new(Level::Info, "routine"));

        // Assert
        assert!(result.is_ok());
        assert_eq!(verbose.messages(), vec!["routine"]);
    }

    #[test]
    fn test_error_from_member_below_its_level_is_returned() {
        // Arrange
        let mut strict = MockSink::new();
        strict
            .expect_enabled()
            .returning(|level| level >= Level::Error);
        strict
            .expect_handle()
            .times(1)
            .returning(|_| Err(LogError::sink_rejected("strict", "unavailable")));
        let verbose = RecordingSink::new(Level::Debug);
        let fanout = FanOutSink::new(vec![Arc::new(verbose.clone()), Arc::new(strict)]);

        // Act
        let result = fanout.handle(&Record::new(Level::Info, "routine"));

        // Assert
        assert!(
            matches!(result, Err(LogError::SinkRejected { ref sink, .. }) if sink == "strict"),
            "Expected the strict member's error, got {result:?}"
        );
        assert_eq!(verbose.messages(), vec!["routine"]);
    }

    #[test]
    fn test_empty_fanout_discards() {
        // Arrange
        let fanout = FanOutSink::default();

        // Act & Assert
        assert!(fanout.is_empty());
        assert!(!fanout.enabled(Level::Error));
        assert!(fanout.handle(&Record::new(Level::Error, "dropped")).is_ok());
    }
}

#[cfg(test)]
mod fanout_derivation_tests {
    use super::*;

    #[test]
    fn test_with_attrs_derives_every_member() {
        // Arrange
        let a = RecordingSink::new(Level::Debug);
        let b = RecordingSink::new(Level::Debug);
        let fanout = FanOutSink::new(vec![Arc::new(a.clone()), Arc::new(b.clone())]);

        // Act
        let derived = fanout.with_attrs(&[attr("tenant", "acme")]);
        derived
            .handle(&Record::new(Level::Info, "derived"))
            .expect("members accept");
        fanout
            .handle(&Record::new(Level::Info, "original"))
            .expect("members accept");

        // Assert
        for member in [&a, &b] {
            let entries = member.entries();
            assert_eq!(entries.len(), 2);
            assert!(entries[0].has("tenant"), "Derived member carries the attr");
            assert!(!entries[1].has("tenant"), "Original member is untouched");
        }
    }

    #[test]
    fn test_with_group_derives_every_member() {
        // Arrange
        let a = RecordingSink::new(Level::Debug);
        let fanout = FanOutSink::new(vec![Arc::new(a.clone())]);

        // Act
        fanout
            .with_group("http")
            .handle(&Record::new(Level::Info, "grouped").with_fields([attr("status", 200)]))
            .expect("member accepts");

        // Assert
        assert_eq!(a.last().expect("record").keys(), vec!["http.status"]);
    }
}
