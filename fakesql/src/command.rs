use std::fmt;
use std::mem;
use std::sync::Arc;
use std::time::Duration;

use fakesql_core::Value;
use fakesql_storage::{DataReader, Table};
use parking_lot::Mutex;

use crate::connection::WeakConnection;
use crate::{
    Connection, DefaultFactory, Expectation, ExpectationQueue, ExecutionKind, Factory, Outcome,
    Parameter, ParameterCollection, Result, Transaction,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommandType {
    #[default]
    Text,
    StoredProcedure,
    TableDirect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommandBehavior {
    #[default]
    Default,
    SingleResult,
    SchemaOnly,
    KeyInfo,
    SingleRow,
    SequentialAccess,
    CloseConnection,
}

/// A snapshot of one execution: the command text and parameters at the time of the call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedCommand {
    command_text: String,
    parameters: Vec<Parameter>,
    kind: ExecutionKind,
    behavior: Option<CommandBehavior>,
}

impl ExecutedCommand {
    pub fn new(
        command_text: impl Into<String>,
        parameters: impl IntoIterator<Item = Parameter>,
        kind: ExecutionKind,
    ) -> Self {
        Self {
            command_text: command_text.into(),
            parameters: parameters.into_iter().collect(),
            kind,
            behavior: None,
        }
    }

    #[inline]
    pub fn command_text(&self) -> &str {
        &self.command_text
    }

    #[inline]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// The execution method that produced this record.
    #[inline]
    pub fn kind(&self) -> ExecutionKind {
        self.kind
    }

    /// The behavior passed to `execute_reader_with`, if any.
    #[inline]
    pub fn behavior(&self) -> Option<CommandBehavior> {
        self.behavior
    }
}

/// A fake command.
///
/// Each execution is logged, then validated against the next expectation registered with
/// [`Command::setup`], and answered with that expectation's canned result. Once the
/// expectations run out the factory provides the result instead.
///
/// Cloning the handle shares the command, so a test can keep a handle to a command it hands
/// to the code under test.
#[derive(Clone)]
pub struct Command {
    inner: Arc<Shared>,
}

struct Shared {
    factory: Arc<dyn Factory>,
    state: Mutex<State>,
}

struct State {
    command_text: String,
    command_type: CommandType,
    command_timeout: Duration,
    parameters: ParameterCollection,
    expectations: ExpectationQueue,
    executed: Vec<ExecutedCommand>,
    transaction: Option<Transaction>,
    connection: Option<WeakConnection>,
    execute_non_query_invoked: bool,
    execute_scalar_invoked: bool,
    execute_reader_invoked: bool,
    prepared: bool,
    cancelled: bool,
    disposed: bool,
}

impl Default for State {
    fn default() -> Self {
        Self {
            command_text: String::new(),
            command_type: CommandType::default(),
            command_timeout: Duration::from_secs(30),
            parameters: ParameterCollection::default(),
            expectations: ExpectationQueue::default(),
            executed: vec![],
            transaction: None,
            connection: None,
            execute_non_query_invoked: false,
            execute_scalar_invoked: false,
            execute_reader_invoked: false,
            prepared: false,
            cancelled: false,
            disposed: false,
        }
    }
}

impl Default for Command {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Command {
    /// A standalone command using the [`DefaultFactory`].
    #[inline]
    pub fn new() -> Self {
        Self::with_factory(Arc::new(DefaultFactory::default()))
    }

    pub fn with_factory(factory: Arc<dyn Factory>) -> Self {
        Self { inner: Arc::new(Shared { factory, state: Mutex::new(State::default()) }) }
    }

    pub fn with_expectations(expectations: impl IntoIterator<Item = Expectation>) -> Self {
        let command = Self::new();
        for expectation in expectations {
            command.setup(expectation);
        }
        command
    }

    /// A command whose first reader execution returns `table` whatever the text and
    /// parameters are.
    pub fn from_table(table: impl Into<Arc<Table>>) -> Self {
        Self::with_expectations([Expectation::reader(table)])
    }

    #[inline]
    pub fn factory(&self) -> &Arc<dyn Factory> {
        &self.inner.factory
    }

    /// Appends an expectation to this command's queue.
    pub fn setup(&self, expectation: Expectation) {
        self.inner.state.lock().expectations.push(expectation);
    }

    /// The number of expectations consumed so far.
    pub fn expectation_cursor(&self) -> usize {
        self.inner.state.lock().expectations.cursor()
    }

    pub fn pending_expectations(&self) -> usize {
        self.inner.state.lock().expectations.pending().len()
    }

    pub fn command_text(&self) -> String {
        self.inner.state.lock().command_text.clone()
    }

    pub fn set_command_text(&self, text: impl Into<String>) {
        self.inner.state.lock().command_text = text.into();
    }

    pub fn command_type(&self) -> CommandType {
        self.inner.state.lock().command_type
    }

    pub fn set_command_type(&self, command_type: CommandType) {
        self.inner.state.lock().command_type = command_type;
    }

    pub fn command_timeout(&self) -> Duration {
        self.inner.state.lock().command_timeout
    }

    pub fn set_command_timeout(&self, timeout: Duration) {
        self.inner.state.lock().command_timeout = timeout;
    }

    /// A snapshot of the current parameters.
    pub fn parameters(&self) -> ParameterCollection {
        self.inner.state.lock().parameters.clone()
    }

    /// Runs `f` with mutable access to the parameters.
    ///
    /// The command is not locked while `f` runs, so `f` may call back into it. The
    /// collection is taken out for the duration of the call and reads as empty meanwhile.
    pub fn update_parameters<R>(&self, f: impl FnOnce(&mut ParameterCollection) -> R) -> R {
        let mut parameters = mem::take(&mut self.inner.state.lock().parameters);
        let result = f(&mut parameters);
        self.inner.state.lock().parameters = parameters;
        result
    }

    /// Appends `parameter` and returns its index.
    pub fn add_parameter(&self, parameter: Parameter) -> usize {
        self.update_parameters(|parameters| parameters.add(parameter))
    }

    pub fn add_parameter_value(&self, name: impl AsRef<str>, value: impl Into<Value>) -> usize {
        self.add_parameter(Parameter::new(name, value))
    }

    /// A new parameter from the factory. It is not added to the command.
    pub fn create_parameter(&self) -> Parameter {
        self.inner.factory.create_parameter(self)
    }

    pub fn transaction(&self) -> Option<Transaction> {
        self.inner.state.lock().transaction.clone()
    }

    pub fn set_transaction(&self, transaction: Option<Transaction>) {
        self.inner.state.lock().transaction = transaction;
    }

    /// The connection this command belongs to, if it is still alive.
    pub fn connection(&self) -> Option<Connection> {
        self.inner.state.lock().connection.as_ref().and_then(WeakConnection::upgrade)
    }

    pub fn set_connection(&self, connection: Option<&Connection>) {
        self.inner.state.lock().connection = connection.map(Connection::downgrade);
    }

    /// Every execution of this command, including the ones that failed validation.
    pub fn executed_commands(&self) -> Vec<ExecutedCommand> {
        self.inner.state.lock().executed.clone()
    }

    pub fn last_executed(&self) -> Option<ExecutedCommand> {
        self.inner.state.lock().executed.last().cloned()
    }

    pub fn execute_scalar(&self) -> Result<Value> {
        match self.dispatch(ExecutionKind::Scalar, None)? {
            Some(Outcome::Scalar(value)) => Ok(value),
            Some(outcome) => unreachable!("validation let through a {} outcome", outcome.kind()),
            None => {
                tracing::debug!("no pending expectation, using the factory's scalar result");
                Ok(self.inner.factory.create_scalar_result(self))
            }
        }
    }

    /// Returns the number of affected rows.
    pub fn execute_non_query(&self) -> Result<u64> {
        match self.dispatch(ExecutionKind::NonQuery, None)? {
            Some(Outcome::NonQuery(rows_affected)) => Ok(rows_affected),
            Some(outcome) => unreachable!("validation let through a {} outcome", outcome.kind()),
            None => {
                tracing::debug!("no pending expectation, using the factory's non-query result");
                Ok(self.inner.factory.create_non_query_result(self))
            }
        }
    }

    /// Returns a reader positioned on the first result set.
    #[inline]
    pub fn execute_reader(&self) -> Result<DataReader> {
        self.execute_reader_inner(None)
    }

    /// Like [`Command::execute_reader`]. The behavior is only recorded.
    #[inline]
    pub fn execute_reader_with(&self, behavior: CommandBehavior) -> Result<DataReader> {
        self.execute_reader_inner(Some(behavior))
    }

    fn execute_reader_inner(&self, behavior: Option<CommandBehavior>) -> Result<DataReader> {
        let mut reader = match self.dispatch(ExecutionKind::Reader, behavior)? {
            Some(Outcome::Reader(tables)) => DataReader::open(tables),
            Some(outcome) => unreachable!("validation let through a {} outcome", outcome.kind()),
            None => {
                tracing::debug!("no pending expectation, using the factory's reader");
                self.inner.factory.create_reader(self)?
            }
        };

        reader.resolve_schema_tables(|reader| self.inner.factory.create_schema_table(reader));

        Ok(reader)
    }

    /// Logs the execution, then validates it against the next pending expectation.
    /// The lock is released before returning so factory hooks may call back into the command.
    #[tracing::instrument(skip(self))]
    fn dispatch(
        &self,
        kind: ExecutionKind,
        behavior: Option<CommandBehavior>,
    ) -> Result<Option<Outcome>> {
        let mut state = self.inner.state.lock();
        let executed = ExecutedCommand {
            command_text: state.command_text.clone(),
            parameters: state.parameters.as_slice().to_vec(),
            kind,
            behavior,
        };
        tracing::debug!(text = %executed.command_text, "executing command");
        state.executed.push(executed.clone());

        match kind {
            ExecutionKind::Scalar => state.execute_scalar_invoked = true,
            ExecutionKind::NonQuery => state.execute_non_query_invoked = true,
            ExecutionKind::Reader => state.execute_reader_invoked = true,
        }

        state.expectations.validate_and_consume(&executed)
    }

    pub fn prepare(&self) {
        self.inner.state.lock().prepared = true;
    }

    pub fn cancel(&self) {
        self.inner.state.lock().cancelled = true;
    }

    pub fn dispose(&self) {
        self.inner.state.lock().disposed = true;
    }

    pub fn is_prepared(&self) -> bool {
        self.inner.state.lock().prepared
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.state.lock().cancelled
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.state.lock().disposed
    }

    pub fn execute_scalar_invoked(&self) -> bool {
        self.inner.state.lock().execute_scalar_invoked
    }

    pub fn execute_non_query_invoked(&self) -> bool {
        self.inner.state.lock().execute_non_query_invoked
    }

    pub fn execute_reader_invoked(&self) -> bool {
        self.inner.state.lock().execute_reader_invoked
    }

    /// Clears the expectations, the execution log, the parameters and every flag.
    pub fn reset(&self) {
        let mut state = self.inner.state.lock();
        state.expectations.clear();
        state.executed.clear();
        state.parameters.clear();
        state.prepared = false;
        state.cancelled = false;
        state.execute_non_query_invoked = false;
        state.execute_scalar_invoked = false;
        state.execute_reader_invoked = false;
    }

    /// Whether both handles refer to the same command.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Command")
            .field("command_text", &state.command_text)
            .field("command_type", &state.command_type)
            .field("parameters", &state.parameters)
            .field("expectations", &state.expectations.len())
            .field("executed", &state.executed.len())
            .finish_non_exhaustive()
    }
}
