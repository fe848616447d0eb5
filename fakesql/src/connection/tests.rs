use super::*;
use crate::{Error, ErrorCategory, Expectation};

#[test]
fn test_open_close() {
    let connection = Connection::new();
    assert_eq!(connection.state(), ConnectionState::Closed);
    connection.open();
    assert_eq!(connection.state(), ConnectionState::Open);
    connection.close();
    assert_eq!(connection.state(), ConnectionState::Closed);
}

#[test]
fn test_dispose() {
    let connection = Connection::new();
    connection.open();
    connection.dispose();
    assert!(connection.is_disposed());
    assert_eq!(connection.state(), ConnectionState::Closed);
}

#[test]
#[tracing_test::traced_test]
fn test_create_command_returns_queued_commands_first() {
    let connection = Connection::new();
    let first = Command::new();
    first.setup(Expectation::scalar("first"));
    let second = Command::new();
    connection.setup(first.clone());
    connection.setup(second.clone());

    assert!(connection.create_command().ptr_eq(&first));
    assert!(connection.create_command().ptr_eq(&second));
    assert!(logs_contain("returning queued command"));

    let third = connection.create_command();
    assert!(!third.ptr_eq(&first) && !third.ptr_eq(&second));

    let commands = connection.commands();
    assert_eq!(commands.len(), 3);
    assert!(commands[0].ptr_eq(&first));
    assert!(commands[2].ptr_eq(&third));
}

#[test]
fn test_created_commands_point_back_to_the_connection() {
    let connection = Connection::new();
    let queued = Command::new();
    connection.setup(queued.clone());

    let command = connection.create_command();
    assert!(command.connection().is_some_and(|c| c.ptr_eq(&connection)));
    assert!(queued.connection().is_some_and(|c| c.ptr_eq(&connection)));

    let command = connection.create_command();
    drop(connection);
    assert!(command.connection().is_none());
}

#[test]
fn test_transactions_are_logged() {
    let connection = Connection::new();
    let tx = connection.begin_transaction();
    assert_eq!(tx.isolation_level(), IsolationLevel::Unspecified);
    let serializable = connection.begin_transaction_with(IsolationLevel::Serializable);
    assert_eq!(serializable.isolation_level(), IsolationLevel::Serializable);

    tx.commit();
    let transactions = connection.transactions();
    assert_eq!(transactions.len(), 2);
    assert!(transactions[0].ptr_eq(&tx));
    assert!(transactions[0].is_committed());
    assert!(!transactions[1].is_committed());
    assert!(serializable.connection().is_some_and(|c| c.ptr_eq(&connection)));
}

#[test]
fn test_configuration() -> crate::Result<()> {
    let connection = Connection::from_connection_string("Database=app;Connect Timeout=5")?;
    assert_eq!(connection.database(), "app");
    assert_eq!(connection.connection_string(), "Database=app;Connect Timeout=5");
    assert_eq!(connection.connection_timeout(), Duration::from_secs(5));
    assert_eq!(connection.data_source(), "FakeProvider");
    assert_eq!(connection.server_version(), "42");

    connection.change_database("other");
    assert_eq!(connection.database(), "other");

    connection.set_option("server_version", "15")?;
    assert_eq!(connection.config().server_version(), "15");

    connection.set_connection_string("Server=db1")?;
    assert_eq!(connection.data_source(), "db1");
    assert_eq!(connection.database(), "");

    let err = connection.set_option("colour", "blue").unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert_eq!(err.category(), ErrorCategory::Configuration);
    Ok(())
}
