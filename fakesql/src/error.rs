use std::fmt;

use fakesql_core::Value;
use itertools::Itertools;
use smol_str::SmolStr;
use thiserror::Error;

use crate::{ExecutedCommand, ExecutionKind};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The broad class an [`Error`] falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// An execution did not match the expectation registered for it.
    Validation,
    /// The caller used the api out of order or asked for something that does not exist.
    Precondition,
    /// The test setup is incomplete or invalid.
    Configuration,
    NotSupported,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("command text must be set before calling `{kind}`")]
    EmptyCommandText { kind: ExecutionKind },
    #[error("no expectation is pending for `{kind}` and the factory provides no default result")]
    MissingResult { kind: ExecutionKind },
    #[error("invalid configuration: {0}")]
    Config(#[from] anyhow::Error),
    #[error("not supported: {0}")]
    NotSupported(&'static str),
    #[error(transparent)]
    Storage(#[from] fakesql_storage::Error),
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Validation(_) => ErrorCategory::Validation,
            Error::EmptyCommandText { .. } => ErrorCategory::Precondition,
            Error::MissingResult { .. } | Error::Config(_) => ErrorCategory::Configuration,
            Error::NotSupported(_) => ErrorCategory::NotSupported,
            Error::Storage(fakesql_storage::Error::NotSupported(_)) => ErrorCategory::NotSupported,
            Error::Storage(_) => ErrorCategory::Precondition,
        }
    }
}

/// An execution that did not match the expectation at `index` of its command's queue.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("expectation #{index} was not met: {failure}")]
pub struct ValidationError {
    index: usize,
    command: ExecutedCommand,
    failure: ValidationFailure,
}

impl ValidationError {
    pub(crate) fn new(index: usize, command: ExecutedCommand, failure: ValidationFailure) -> Self {
        Self { index, command, failure }
    }

    /// The position of the failed expectation in the queue.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The execution that failed validation.
    #[inline]
    pub fn command(&self) -> &ExecutedCommand {
        &self.command
    }

    #[inline]
    pub fn failure(&self) -> &ValidationFailure {
        &self.failure
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationFailure {
    CommandTextMismatch { expected: String, actual: String },
    Parameters(ParameterDiagnostics),
    KindMismatch { expected: ExecutionKind, actual: ExecutionKind },
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationFailure::CommandTextMismatch { expected, actual } => {
                write!(f, "expected command text `{expected}` but got `{actual}`")
            }
            ValidationFailure::Parameters(diagnostics) => {
                write!(f, "parameters did not match\n{diagnostics}")
            }
            ValidationFailure::KindMismatch { expected, actual } => {
                write!(f, "expected a call to `{expected}` but got `{actual}`")
            }
        }
    }
}

/// The outcome of comparing one expected parameter against the actual one at the same index.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterCheck {
    Correct { name: SmolStr, value: Value },
    /// The command has a parameter the expectation does not.
    Unexpected { name: SmolStr, value: Value },
    /// The expectation has a parameter the command does not.
    Missing { name: SmolStr, value: Value },
    NameMismatch { expected: SmolStr, actual: SmolStr },
    ValueMismatch { name: SmolStr, expected: Value, actual: Value },
}

impl ParameterCheck {
    #[inline]
    pub fn is_failure(&self) -> bool {
        !matches!(self, ParameterCheck::Correct { .. })
    }
}

impl fmt::Display for ParameterCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterCheck::Correct { name, value } => write!(f, "`{name}` = `{value}` is correct"),
            ParameterCheck::Unexpected { name, value } => {
                write!(f, "unexpected parameter `{name}` = `{value}`")
            }
            ParameterCheck::Missing { name, value } => {
                write!(f, "missing parameter `{name}` = `{value}`")
            }
            ParameterCheck::NameMismatch { expected, actual } => {
                write!(f, "expected parameter `{expected}` but got `{actual}`")
            }
            ParameterCheck::ValueMismatch { name, expected, actual } => {
                write!(f, "`{name}` was expected to be `{expected}` but was `{actual}`")
            }
        }
    }
}

/// Every parameter check of one validation, in parameter order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterDiagnostics {
    checks: Vec<ParameterCheck>,
}

impl ParameterDiagnostics {
    #[inline]
    pub fn checks(&self) -> &[ParameterCheck] {
        &self.checks
    }

    #[inline]
    pub fn has_failures(&self) -> bool {
        self.checks.iter().any(ParameterCheck::is_failure)
    }

    pub(crate) fn push(&mut self, check: ParameterCheck) {
        self.checks.push(check);
    }
}

impl fmt::Display for ParameterDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.checks.iter().enumerate().format_with("\n", |(i, check), f| f(&format_args!(
                "  #{i}: {check}"
            )))
        )
    }
}
