//! Sessions and scoped transactions over the shared dataset.
//!
//! A `VaultStore` owns exactly one in-memory SQLite connection.  Every
//! operation borrows it through a short-lived `Session` (a lock guard),
//! and anything that writes runs inside a `QueryContext`: commit when the
//! closure returns `Ok`, roll back when it returns `Err`.  Both are
//! released when they go out of scope, on every exit path.

use std::ops::Deref;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{Connection, Transaction};

use crate::errors::Result;

/// The state guarded by the store's mutex.
struct Dataset {
    conn: Connection,
    /// Set by successful mutations, cleared by `mark_persisted`.
    dirty: bool,
}

/// Process-local shared handle to one dataset.
pub(crate) struct SharedDataset {
    inner: Mutex<Dataset>,
}

impl SharedDataset {
    pub(crate) fn new(conn: Connection) -> Self {
        Self {
            inner: Mutex::new(Dataset { conn, dirty: false }),
        }
    }

    /// Acquire a session.
    ///
    /// A panic while a session was held leaves the mutex poisoned, but the
    /// open transaction was rolled back during unwinding, so the dataset
    /// itself is consistent and the guard can be reclaimed.
    pub(crate) fn session(&self) -> Session<'_> {
        Session {
            state: self.inner.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }
}

/// A borrowed, exclusive view of the dataset.  Never held across calls.
pub(crate) struct Session<'s> {
    state: MutexGuard<'s, Dataset>,
}

impl Session<'_> {
    /// Run `f` inside a transaction.
    ///
    /// On `Ok` every statement issued through the context commits
    /// together.  On `Err` the transaction is dropped, which rolls it back
    /// and leaves the dataset exactly as it was.
    pub(crate) fn querying<T>(
        &mut self,
        f: impl FnOnce(&QueryContext<'_>) -> Result<T>,
    ) -> Result<T> {
        let ctx = QueryContext {
            tx: self.state.conn.transaction()?,
        };
        let value = f(&ctx)?;
        ctx.commit()?;
        Ok(value)
    }

    /// Direct read access for statements that need no transaction.
    pub(crate) fn conn(&self) -> &Connection {
        &self.state.conn
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.state.dirty = true;
    }

    pub(crate) fn mark_clean(&mut self) {
        self.state.dirty = false;
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.state.dirty
    }
}

/// One open transaction.  Derefs to the connection so statements can be
/// issued directly.
pub(crate) struct QueryContext<'c> {
    tx: Transaction<'c>,
}

impl QueryContext<'_> {
    fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }
}

impl Deref for QueryContext<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.tx
    }
}
