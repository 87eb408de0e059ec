//! Tests for the execute_many batch execution method.
//!
//! These tests verify that batch command execution works correctly,
//! including error handling and result ordering.

use ledger_engine::LedgerConfig;

use crate::{Command, Error, Executor, Output};

/// Create a test executor over a fresh in-memory ledger.
fn create_test_executor() -> Executor {
    Executor::open(LedgerConfig::default()).unwrap()
}

#[test]
fn test_execute_many_empty() {
    let executor = create_test_executor();
    let results = executor.execute_many(vec![]);
    assert!(results.is_empty());
}

#[test]
fn test_execute_many_preserves_order() {
    let executor = create_test_executor();

    let results = executor.execute_many(vec![
        Command::InitLedger,
        Command::QueryEvent { event_num: "Event3".into() },
        Command::QueryEvent { event_num: "Event1".into() },
    ]);

    assert_eq!(results.len(), 3);
    assert_eq!(results[0], Ok(Output::Unit));
    match (&results[1], &results[2]) {
        (Ok(Output::Event(third)), Ok(Output::Event(first))) => {
            assert_eq!(third.host, "pizza-hut");
            assert_eq!(first.host, "seoul-milk");
        }
        other => panic!("Expected two Event outputs, got {:?}", other),
    }
}

#[test]
fn test_execute_many_continues_after_error() {
    let executor = create_test_executor();

    let results = executor.execute_many(vec![
        Command::ChangeEventUser {
            event_num: "Event0".into(),
            new_user: "alice".into(),
        },
        Command::InitLedger,
        Command::ChangeEventUser {
            event_num: "Event0".into(),
            new_user: "alice".into(),
        },
    ]);

    assert_eq!(results[0], Err(Error::NotFound { key: "Event0".into() }));
    assert!(results[1].is_ok());
    assert!(results[2].is_ok());
}

#[test]
fn test_execute_many_each_command_is_a_transaction() {
    let executor = create_test_executor();
    executor.execute(Command::InitLedger).unwrap();

    executor.execute_many(vec![
        Command::ChangeEventUser {
            event_num: "Event2".into(),
            new_user: "alice".into(),
        },
        Command::ChangeEventStatus {
            event_num: "Event2".into(),
            new_status: "in-progress".into(),
        },
    ]);

    match executor.execute(Command::GetHistory { key: "Event2".into() }) {
        Ok(Output::History(history)) => assert_eq!(history.len(), 3),
        other => panic!("Expected History, got {:?}", other),
    }
}
