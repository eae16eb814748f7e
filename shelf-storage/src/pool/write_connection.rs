//! The single write connection, serialized behind an async mutex.

use std::sync::Arc;

use rusqlite::{Connection, InterruptHandle};
use tokio::sync::Mutex;

use shelf_core::errors::ShelfResult;

use super::interrupt::interruptible;
use crate::to_storage_err;

/// Owns the only connection allowed to write.
pub struct WriteConnection {
    conn: Arc<Mutex<Connection>>,
    interrupt: Arc<InterruptHandle>,
}

impl WriteConnection {
    /// Wrap a connection that already has its pragmas and migrations applied.
    pub fn new(conn: Connection) -> Self {
        let interrupt = Arc::new(conn.get_interrupt_handle());
        Self {
            conn: Arc::new(Mutex::new(conn)),
            interrupt,
        }
    }

    /// Run `f` with exclusive access to the writer.
    pub async fn with_conn<F, T>(&self, f: F) -> ShelfResult<T>
    where
        F: FnOnce(&Connection) -> ShelfResult<T>,
    {
        let guard = self.conn.lock().await;
        f(&guard)
    }

    /// Run a read on the writer from the blocking pool.
    ///
    /// Used by in-memory stores, which have no separate readers. Dropping the
    /// future interrupts the query if it is running.
    pub async fn read<F, T>(&self, f: F) -> ShelfResult<T>
    where
        F: FnOnce(&Connection) -> ShelfResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn).lock_owned().await;
        let (_on_drop, ticket) = interruptible(Arc::clone(&self.interrupt));

        tokio::task::spawn_blocking(move || ticket.run(&conn, f))
            .await
            .map_err(|e| to_storage_err(format!("read task failed: {e}")))?
    }
}
