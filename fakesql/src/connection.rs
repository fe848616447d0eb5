use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use fakesql_core::Value;
use parking_lot::Mutex;

use crate::{
    Command, ConnectionConfig, DefaultFactory, Factory, IsolationLevel, Result, Transaction,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    #[default]
    Closed,
    Open,
}

/// A fake connection.
///
/// Commands registered with [`Connection::setup`] are handed out by
/// [`Connection::create_command`] in registration order, after which the factory builds
/// plain commands. Cloning the handle shares the connection.
#[derive(Clone)]
pub struct Connection {
    inner: Arc<Shared>,
}

pub(crate) struct Shared {
    factory: Arc<dyn Factory>,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    config: ConnectionConfig,
    status: ConnectionState,
    queued: VecDeque<Command>,
    commands: Vec<Command>,
    transactions: Vec<Transaction>,
    disposed: bool,
}

/// A back-reference to a connection that does not keep it alive.
#[derive(Clone, Default)]
pub(crate) struct WeakConnection(Weak<Shared>);

impl WeakConnection {
    #[inline]
    pub(crate) fn upgrade(&self) -> Option<Connection> {
        self.0.upgrade().map(|inner| Connection { inner })
    }
}

impl Default for Connection {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Connection {
    /// A connection using the [`DefaultFactory`].
    #[inline]
    pub fn new() -> Self {
        Self::with_factory(Arc::new(DefaultFactory::default()))
    }

    pub fn with_factory(factory: Arc<dyn Factory>) -> Self {
        Self::with_config(factory, ConnectionConfig::default())
    }

    pub fn with_config(factory: Arc<dyn Factory>, config: ConnectionConfig) -> Self {
        let state = State { config, ..State::default() };
        Self { inner: Arc::new(Shared { factory, state: Mutex::new(state) }) }
    }

    pub fn from_connection_string(connection_string: &str) -> Result<Self> {
        let config = ConnectionConfig::from_connection_string(connection_string)?;
        Ok(Self::with_config(Arc::new(DefaultFactory::default()), config))
    }

    #[inline]
    pub fn factory(&self) -> &Arc<dyn Factory> {
        &self.inner.factory
    }

    pub(crate) fn downgrade(&self) -> WeakConnection {
        WeakConnection(Arc::downgrade(&self.inner))
    }

    pub fn open(&self) {
        self.inner.state.lock().status = ConnectionState::Open;
    }

    pub fn close(&self) {
        self.reset();
    }

    #[inline]
    pub fn state(&self) -> ConnectionState {
        self.inner.state.lock().status
    }

    /// Queues `command` to be returned by a later [`Connection::create_command`].
    pub fn setup(&self, command: Command) {
        self.inner.state.lock().queued.push_back(command);
    }

    /// Returns the next queued command, or a new one from the factory when nothing is
    /// queued. Either way the command is attached to this connection and logged.
    #[tracing::instrument(skip(self))]
    pub fn create_command(&self) -> Command {
        let queued = self.inner.state.lock().queued.pop_front();
        let command = match queued {
            Some(command) => {
                tracing::debug!("returning queued command");
                command
            }
            None => self.inner.factory.create_command(self),
        };

        command.set_connection(Some(self));
        self.inner.state.lock().commands.push(command.clone());
        command
    }

    /// Every command returned by [`Connection::create_command`], in order.
    pub fn commands(&self) -> Vec<Command> {
        self.inner.state.lock().commands.clone()
    }

    #[inline]
    pub fn begin_transaction(&self) -> Transaction {
        self.begin_transaction_with(IsolationLevel::default())
    }

    #[tracing::instrument(skip(self))]
    pub fn begin_transaction_with(&self, isolation_level: IsolationLevel) -> Transaction {
        let transaction = self.inner.factory.create_transaction(self, isolation_level);
        self.inner.state.lock().transactions.push(transaction.clone());
        transaction
    }

    /// Every transaction begun on this connection, in order.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.inner.state.lock().transactions.clone()
    }

    pub fn change_database(&self, database: &str) {
        self.inner.state.lock().config.set_database(database);
    }

    pub fn database(&self) -> String {
        self.inner.state.lock().config.database().to_owned()
    }

    pub fn connection_string(&self) -> String {
        self.inner.state.lock().config.connection_string().to_owned()
    }

    /// Replaces the configuration with one parsed from `connection_string`.
    pub fn set_connection_string(&self, connection_string: &str) -> Result<()> {
        let config = ConnectionConfig::from_connection_string(connection_string)?;
        self.inner.state.lock().config = config;
        Ok(())
    }

    pub fn connection_timeout(&self) -> Duration {
        self.inner.state.lock().config.connect_timeout()
    }

    pub fn data_source(&self) -> String {
        self.inner.state.lock().config.data_source().to_owned()
    }

    pub fn server_version(&self) -> String {
        self.inner.state.lock().config.server_version().to_owned()
    }

    pub fn config(&self) -> ConnectionConfig {
        self.inner.state.lock().config.clone()
    }

    pub fn set_option(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        Ok(self.inner.state.lock().config.set(name, value.into())?)
    }

    /// Puts the connection back into the closed state.
    pub fn reset(&self) {
        self.inner.state.lock().status = ConnectionState::Closed;
    }

    pub fn dispose(&self) {
        self.reset();
        self.inner.state.lock().disposed = true;
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.inner.state.lock().disposed
    }

    /// Whether both handles refer to the same connection.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Connection")
            .field("state", &state.status)
            .field("config", &state.config)
            .field("commands", &state.commands.len())
            .field("transactions", &state.transactions.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
