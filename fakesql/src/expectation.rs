use std::fmt;
use std::sync::Arc;

use fakesql_core::Value;
use fakesql_storage::Table;
use smol_str::SmolStr;

use crate::error::{ParameterCheck, ParameterDiagnostics, ValidationError, ValidationFailure};
use crate::{Error, ExecutedCommand, Parameter, Result};

/// The execution method a command was invoked through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionKind {
    Scalar,
    NonQuery,
    Reader,
}

impl fmt::Display for ExecutionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionKind::Scalar => write!(f, "execute_scalar"),
            ExecutionKind::NonQuery => write!(f, "execute_non_query"),
            ExecutionKind::Reader => write!(f, "execute_reader"),
        }
    }
}

/// The canned result of an [`Expectation`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Scalar(Value),
    NonQuery(u64),
    /// One table per result set.
    Reader(Vec<Arc<Table>>),
}

impl Outcome {
    #[inline]
    pub fn kind(&self) -> ExecutionKind {
        match self {
            Outcome::Scalar(_) => ExecutionKind::Scalar,
            Outcome::NonQuery(_) => ExecutionKind::NonQuery,
            Outcome::Reader(_) => ExecutionKind::Reader,
        }
    }
}

/// An execution the test expects, together with the result to hand back for it.
///
/// Without command text any text is accepted, and without parameters the actual parameters
/// are not checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Expectation {
    command_text: Option<String>,
    parameters: Option<Vec<Parameter>>,
    outcome: Outcome,
}

impl Expectation {
    #[inline]
    pub fn new(outcome: Outcome) -> Self {
        Self { command_text: None, parameters: None, outcome }
    }

    #[inline]
    pub fn scalar(value: impl Into<Value>) -> Self {
        Self::new(Outcome::Scalar(value.into()))
    }

    #[inline]
    pub fn non_query(rows_affected: u64) -> Self {
        Self::new(Outcome::NonQuery(rows_affected))
    }

    #[inline]
    pub fn reader(table: impl Into<Arc<Table>>) -> Self {
        Self::new(Outcome::Reader(vec![table.into()]))
    }

    pub fn reader_sets<T: Into<Arc<Table>>>(tables: impl IntoIterator<Item = T>) -> Self {
        Self::new(Outcome::Reader(tables.into_iter().map(Into::into).collect()))
    }

    pub fn with_command_text(mut self, text: impl Into<String>) -> Self {
        self.command_text = Some(text.into());
        self
    }

    /// Requires the actual parameters to be exactly `parameters`, in order.
    /// An empty list requires the command to have no parameters.
    pub fn with_parameters(mut self, parameters: impl IntoIterator<Item = Parameter>) -> Self {
        self.parameters = Some(parameters.into_iter().collect());
        self
    }

    pub fn with_parameter(mut self, name: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.parameters.get_or_insert_with(Vec::new).push(Parameter::new(name, value));
        self
    }

    #[inline]
    pub fn command_text(&self) -> Option<&str> {
        self.command_text.as_deref()
    }

    #[inline]
    pub fn parameters(&self) -> Option<&[Parameter]> {
        self.parameters.as_deref()
    }

    #[inline]
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    #[inline]
    pub fn kind(&self) -> ExecutionKind {
        self.outcome.kind()
    }
}

/// The ordered expectations of one command and the index of the next one to consume.
#[derive(Debug, Clone, Default)]
pub struct ExpectationQueue {
    expected: Vec<Expectation>,
    cursor: usize,
}

impl ExpectationQueue {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, expectation: Expectation) {
        self.expected.push(expectation);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.expected.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.expected.is_empty()
    }

    /// The number of expectations consumed so far.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn pending(&self) -> &[Expectation] {
        self.expected.get(self.cursor..).unwrap_or_default()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Expectation> {
        self.expected.iter()
    }

    pub fn clear(&mut self) {
        self.expected.clear();
        self.cursor = 0;
    }

    /// Checks `command` against the next pending expectation and consumes it on success.
    ///
    /// Returns `None` without checking anything when no expectation is pending, the caller
    /// then falls back to its default result.
    pub fn validate_and_consume(&mut self, command: &ExecutedCommand) -> Result<Option<Outcome>> {
        let index = self.cursor;
        let expected = match self.expected.get(index) {
            Some(expected) => expected,
            None => return Ok(None),
        };

        let fail = |failure| Error::from(ValidationError::new(index, command.clone(), failure));

        let actual_text = command.command_text();
        if actual_text.is_empty() {
            return Err(Error::EmptyCommandText { kind: command.kind() });
        }

        if let Some(expected_text) = expected.command_text().filter(|text| !text.is_empty()) {
            if expected_text != actual_text {
                return Err(fail(ValidationFailure::CommandTextMismatch {
                    expected: expected_text.to_owned(),
                    actual: actual_text.to_owned(),
                }));
            }
        }

        if let Some(expected_parameters) = expected.parameters() {
            let diagnostics = check_parameters(expected_parameters, command.parameters());
            if diagnostics.has_failures() {
                return Err(fail(ValidationFailure::Parameters(diagnostics)));
            }
        }

        if expected.kind() != command.kind() {
            return Err(fail(ValidationFailure::KindMismatch {
                expected: expected.kind(),
                actual: command.kind(),
            }));
        }

        let outcome = expected.outcome().clone();
        self.cursor += 1;
        tracing::debug!(index, kind = %command.kind(), "expectation matched");
        Ok(Some(outcome))
    }
}

fn check_parameters(expected: &[Parameter], actual: &[Parameter]) -> ParameterDiagnostics {
    let mut diagnostics = ParameterDiagnostics::default();
    for i in 0..expected.len().max(actual.len()) {
        let check = match (expected.get(i), actual.get(i)) {
            (None, Some(actual)) => ParameterCheck::Unexpected {
                name: SmolStr::new(actual.name()),
                value: actual.value().clone(),
            },
            (Some(expected), None) => ParameterCheck::Missing {
                name: SmolStr::new(expected.name()),
                value: expected.value().clone(),
            },
            (Some(expected), Some(actual)) if !expected.has_name(actual.name()) => {
                ParameterCheck::NameMismatch {
                    expected: SmolStr::new(expected.name()),
                    actual: SmolStr::new(actual.name()),
                }
            }
            (Some(expected), Some(actual)) if expected.value() != actual.value() => {
                ParameterCheck::ValueMismatch {
                    name: SmolStr::new(expected.name()),
                    expected: expected.value().clone(),
                    actual: actual.value().clone(),
                }
            }
            (Some(expected), Some(_)) => ParameterCheck::Correct {
                name: SmolStr::new(expected.name()),
                value: expected.value().clone(),
            },
            (None, None) => unreachable!("index is below the longer length"),
        };
        diagnostics.push(check);
    }
    diagnostics
}
