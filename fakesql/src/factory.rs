use std::sync::Arc;

use fakesql_core::Value;
use fakesql_storage::{DataReader, Table};

use crate::{
    Command, Connection, Error, ExecutionKind, IsolationLevel, Parameter, Result, Transaction,
};

/// Builds the objects and default results the fakes hand out.
///
/// Commands fall back to the factory whenever no expectation is pending. Every hook has a
/// default, so an implementation overrides only what a test needs.
pub trait Factory: Send + Sync + 'static {
    fn create_command(&self, connection: &Connection) -> Command {
        let command = Command::with_factory(Arc::clone(connection.factory()));
        command.set_connection(Some(connection));
        command
    }

    fn create_parameter(&self, _command: &Command) -> Parameter {
        Parameter::default()
    }

    /// The reader for an `execute_reader` without a pending expectation.
    fn create_reader(&self, _command: &Command) -> Result<DataReader> {
        Err(Error::MissingResult { kind: ExecutionKind::Reader })
    }

    /// The result of an `execute_scalar` without a pending expectation.
    fn create_scalar_result(&self, _command: &Command) -> Value {
        Value::Null
    }

    /// The affected row count of an `execute_non_query` without a pending expectation.
    fn create_non_query_result(&self, _command: &Command) -> u64 {
        1
    }

    fn create_schema_table(&self, _reader: &DataReader) -> Table {
        Table::default()
    }

    fn create_transaction(
        &self,
        connection: &Connection,
        isolation_level: IsolationLevel,
    ) -> Transaction {
        Transaction::new(connection, isolation_level)
    }
}

/// The factory used unless a test injects its own.
///
/// Reader executions without a pending expectation return the default table when one is
/// set, and fail otherwise.
#[derive(Debug, Clone, Default)]
pub struct DefaultFactory {
    default_table: Option<Arc<Table>>,
}

impl DefaultFactory {
    pub fn with_default_table(table: impl Into<Arc<Table>>) -> Self {
        Self { default_table: Some(table.into()) }
    }

    #[inline]
    pub fn default_table(&self) -> Option<&Table> {
        self.default_table.as_deref()
    }
}

impl Factory for DefaultFactory {
    fn create_reader(&self, _command: &Command) -> Result<DataReader> {
        match &self.default_table {
            Some(table) => Ok(DataReader::new(Arc::clone(table))),
            None => Err(Error::MissingResult { kind: ExecutionKind::Reader }),
        }
    }
}
