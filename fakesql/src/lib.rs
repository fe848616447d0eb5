#![deny(rust_2018_idioms)]

//! A fake database driver for testing data access code.
//!
//! A test registers the executions it expects on a [`Command`] together with canned results,
//! hands the command (usually through a [`Connection`]) to the code under test, and then
//! inspects what was executed. Mismatches fail the offending execute call with a
//! [`ValidationError`].

mod command;
mod config;
mod connection;
mod error;
mod expectation;
mod factory;
mod parameter;
mod transaction;

pub use fakesql_core::{FieldSelection, LogicalType, Record, Value};
pub use fakesql_storage::{row, Column, CursorState, DataReader, DataRecord, Row, Table};

pub use self::command::{Command, CommandBehavior, CommandType, ExecutedCommand};
pub use self::config::{ConfigurationOption, ConnectionConfig};
pub use self::connection::{Connection, ConnectionState};
pub use self::error::{
    Error, ErrorCategory, ParameterCheck, ParameterDiagnostics, Result, ValidationError,
    ValidationFailure,
};
pub use self::expectation::{Expectation, ExpectationQueue, ExecutionKind, Outcome};
pub use self::factory::{DefaultFactory, Factory};
pub use self::parameter::{Parameter, ParameterCollection, ParameterDirection};
pub use self::transaction::{IsolationLevel, Transaction};
