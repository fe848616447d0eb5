use std::fmt;
use std::sync::atomic::{self, AtomicBool};
use std::sync::Arc;

use crate::connection::WeakConnection;
use crate::Connection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IsolationLevel {
    #[default]
    Unspecified,
    Chaos,
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
    Snapshot,
}

/// A transaction that only records what was done with it.
#[derive(Clone)]
pub struct Transaction {
    inner: Arc<Shared>,
}

struct Shared {
    connection: WeakConnection,
    isolation_level: IsolationLevel,
    committed: AtomicBool,
    rolled_back: AtomicBool,
    disposed: AtomicBool,
}

impl Transaction {
    pub fn new(connection: &Connection, isolation_level: IsolationLevel) -> Self {
        Self {
            inner: Arc::new(Shared {
                connection: connection.downgrade(),
                isolation_level,
                committed: AtomicBool::new(false),
                rolled_back: AtomicBool::new(false),
                disposed: AtomicBool::new(false),
            }),
        }
    }

    /// The connection that began this transaction, if it is still alive.
    #[inline]
    pub fn connection(&self) -> Option<Connection> {
        self.inner.connection.upgrade()
    }

    #[inline]
    pub fn isolation_level(&self) -> IsolationLevel {
        self.inner.isolation_level
    }

    pub fn commit(&self) {
        tracing::debug!("commit");
        self.inner.committed.store(true, atomic::Ordering::Release);
    }

    pub fn rollback(&self) {
        tracing::debug!("rollback");
        self.inner.rolled_back.store(true, atomic::Ordering::Release);
    }

    #[inline]
    pub fn dispose(&self) {
        self.inner.disposed.store(true, atomic::Ordering::Release);
    }

    #[inline]
    pub fn is_committed(&self) -> bool {
        self.inner.committed.load(atomic::Ordering::Acquire)
    }

    #[inline]
    pub fn is_rolled_back(&self) -> bool {
        self.inner.rolled_back.load(atomic::Ordering::Acquire)
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(atomic::Ordering::Acquire)
    }

    /// Clears the commit and rollback flags.
    pub fn reset(&self) {
        self.inner.committed.store(false, atomic::Ordering::Release);
        self.inner.rolled_back.store(false, atomic::Ordering::Release);
    }

    /// Whether both handles refer to the same transaction.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("isolation_level", &self.isolation_level())
            .field("committed", &self.is_committed())
            .field("rolled_back", &self.is_rolled_back())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
