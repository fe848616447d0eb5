mod repository;

use expect_test::expect;
use fakesql::{
    row, Command, Connection, Error, ErrorCategory, Expectation, ExecutionKind, Parameter,
    ValidationFailure, Value,
};

const SELECT_BY_NAME: &str = "SELECT 1 FROM Y WHERE Name = @myName";

fn validation_error(err: Error) -> fakesql::ValidationError {
    match err {
        Error::Validation(err) => err,
        err => panic!("expected a validation error, got {err:?}"),
    }
}

#[test]
fn test_validation_without_command_text() {
    let command =
        Command::with_expectations([Expectation::scalar("Hello").with_command_text("SELECT 1")]);
    let err = command.execute_scalar().unwrap_err();
    assert!(matches!(err, Error::EmptyCommandText { .. }));
}

#[test]
fn test_validation_correct() -> fakesql::Result<()> {
    let command =
        Command::with_expectations([Expectation::scalar("Hello").with_command_text("SELECT 1")]);
    command.set_command_text("SELECT 1");
    assert_eq!(command.execute_scalar()?, Value::from("Hello"));
    Ok(())
}

#[test]
fn test_validation_correct_with_parameter() -> fakesql::Result<()> {
    let command = Command::with_expectations([Expectation::scalar("Hello")
        .with_command_text(SELECT_BY_NAME)
        .with_parameters([Parameter::new("myName", "World")])]);
    command.set_command_text(SELECT_BY_NAME);
    command.add_parameter_value("myName", "World");
    assert_eq!(command.execute_scalar()?, Value::from("Hello"));
    Ok(())
}

#[test]
fn test_validation_invalid_parameter_value() {
    let command = Command::with_expectations([Expectation::scalar("Hello")
        .with_command_text(SELECT_BY_NAME)
        .with_parameter("myName", "World correct")]);
    command.set_command_text(SELECT_BY_NAME);
    command.add_parameter_value("myName", "World");

    let err = command.execute_scalar().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("World correct"), "{message}");
    assert!(message.contains("`World`"), "{message}");
    assert_eq!(err.category(), ErrorCategory::Validation);
}

#[test]
fn test_validation_missing_parameter() {
    let command = Command::with_expectations([Expectation::scalar("Hello correct")
        .with_command_text(SELECT_BY_NAME)
        .with_parameter("myName", "World")]);
    command.set_command_text(SELECT_BY_NAME);
    assert!(matches!(command.execute_scalar(), Err(Error::Validation(_))));
}

#[test]
fn test_validation_extra_parameter() {
    let text = "UPDATE User SET Status = @status";
    let command = Command::with_expectations([Expectation::scalar("Hello correct")
        .with_command_text(text)
        .with_parameter("status", 1)]);
    command.set_command_text(text);
    command.add_parameter_value("status", 1);
    command.add_parameter_value("id", 22);

    let err = validation_error(command.execute_scalar().unwrap_err());
    assert_eq!(err.command().parameters().len(), 2);
    expect![[r#"
        expectation #0 was not met: parameters did not match
          #0: `status` = `1` is correct
          #1: unexpected parameter `id` = `22`"#]]
    .assert_eq(&err.to_string());
}

#[test]
fn test_validation_unmatched_parameter() {
    let command = Command::with_expectations([Expectation::scalar("Hello correct")
        .with_command_text(SELECT_BY_NAME)
        .with_parameter("some", 4)]);
    command.set_command_text(SELECT_BY_NAME);
    command.add_parameter_value("myName", "World");

    let err = validation_error(command.execute_scalar().unwrap_err());
    expect![[r#"
        expectation #0 was not met: parameters did not match
          #0: expected parameter `some` but got `myName`"#]]
    .assert_eq(&err.to_string());
}

#[test]
fn test_validation_invalid_command_text() {
    let command =
        Command::with_expectations([Expectation::scalar("Hello").with_command_text("SELECT 1")]);
    command.set_command_text("SELECT 2");

    let err = validation_error(command.execute_scalar().unwrap_err());
    assert!(matches!(
        err.failure(),
        ValidationFailure::CommandTextMismatch { expected, actual }
            if expected == "SELECT 1" && actual == "SELECT 2"
    ));
    let message = err.to_string();
    assert!(message.contains("SELECT 1") && message.contains("SELECT 2"), "{message}");
}

#[test]
fn test_execute_scalar_without_expected_text() -> fakesql::Result<()> {
    let command = Command::new();
    command.setup(Expectation::scalar("Hello"));
    command.set_command_text("SELECT 2");
    assert_eq!(command.execute_scalar()?, Value::from("Hello"));
    Ok(())
}

#[test]
fn test_execute_many() -> fakesql::Result<()> {
    let command = Command::new();
    command.setup(Expectation::scalar("Hello"));
    command.setup(Expectation::non_query(0));

    command.set_command_text("SELECT 2");
    let scalar = command.execute_scalar()?;

    command.set_command_text("UPDATE XXXX SET UserId = @userId");
    command.add_parameter_value("userId", 1);
    let rows_affected = command.execute_non_query()?;

    assert_eq!(scalar, Value::from("Hello"));
    assert_eq!(rows_affected, 0);

    let executed = command.executed_commands();
    assert_eq!(executed[1].command_text(), "UPDATE XXXX SET UserId = @userId");
    assert_eq!(executed[1].parameters()[0].value(), &Value::Int32(1));
    assert_eq!(executed[1].kind(), ExecutionKind::NonQuery);
    assert_eq!(command.expectation_cursor(), 2);

    // the expectations are used up, so the factory answers from here on
    command.set_command_text("SELECT 3");
    assert_eq!(command.execute_scalar()?, Value::Null);
    Ok(())
}

#[test]
fn test_connection_hands_out_prepared_commands() -> fakesql::Result<()> {
    let connection = Connection::new();
    let prepared = Command::with_expectations([
        Expectation::reader(fakesql::Table::from_rows([row![1, "jonas"], row![2, "arne"]])?)
            .with_command_text("SELECT Id, UserName FROM Users"),
    ]);
    connection.setup(prepared.clone());
    connection.open();

    let command = connection.create_command();
    command.set_command_text("SELECT Id, UserName FROM Users");
    let mut reader = command.execute_reader()?;
    assert!(reader.read()?);
    assert_eq!(reader.get_value(0)?, &Value::Int32(1));
    assert_eq!(reader.get_value(1)?, &Value::from("jonas"));
    assert!(reader.read()?);
    assert!(!reader.read()?);

    // the test keeps its own handle to inspect what the code under test did
    assert_eq!(prepared.executed_commands().len(), 1);
    assert!(prepared.execute_reader_invoked());

    let plain = connection.create_command();
    assert!(!plain.ptr_eq(&prepared));
    assert_eq!(connection.commands().len(), 2);
    Ok(())
}

#[test]
fn test_transaction_flags() {
    let connection = Connection::new();
    let tx = connection.begin_transaction();
    tx.commit();
    tx.rollback();
    assert!(tx.is_committed() && tx.is_rolled_back());
    tx.reset();
    assert!(!tx.is_committed() && !tx.is_rolled_back());
    tx.dispose();
    assert!(tx.is_disposed());
}
