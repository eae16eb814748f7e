//! Read-only connections for file-backed stores.
//!
//! Each read runs on tokio's blocking pool so the awaiting task stays
//! cancellable. Dropping the awaiting future interrupts the running query.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, InterruptHandle, OpenFlags};

use shelf_core::errors::ShelfResult;

use super::interrupt::interruptible;
use super::pragmas::apply_read_pragmas;
use crate::to_storage_err;

const MAX_READERS: usize = 8;

struct Reader {
    conn: Mutex<Connection>,
    interrupt: Arc<InterruptHandle>,
}

/// Round-robin set of `SQLITE_OPEN_READ_ONLY` connections.
pub struct ReadPool {
    readers: Vec<Arc<Reader>>,
    next: AtomicUsize,
}

impl ReadPool {
    /// Open `size` readers (clamped to `1..=8`) on `path`.
    pub fn open(path: &Path, size: usize, busy_timeout_ms: u32) -> ShelfResult<Self> {
        let readers = (0..size.clamp(1, MAX_READERS))
            .map(|_| {
                let conn = Connection::open_with_flags(
                    path,
                    OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
                )
                .map_err(|e| to_storage_err(e.to_string()))?;
                apply_read_pragmas(&conn, busy_timeout_ms)?;
                let interrupt = Arc::new(conn.get_interrupt_handle());
                Ok(Arc::new(Reader {
                    conn: Mutex::new(conn),
                    interrupt,
                }))
            })
            .collect::<ShelfResult<Vec<_>>>()?;
        Ok(Self {
            readers,
            next: AtomicUsize::new(0),
        })
    }

    /// Run `f` on the next reader, off the async worker threads.
    ///
    /// Dropping the returned future interrupts the query if it is running.
    pub async fn read<F, T>(&self, f: F) -> ShelfResult<T>
    where
        F: FnOnce(&Connection) -> ShelfResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let reader = Arc::clone(&self.readers[idx]);
        let (_on_drop, ticket) = interruptible(Arc::clone(&reader.interrupt));

        tokio::task::spawn_blocking(move || {
            let conn = reader
                .conn
                .lock()
                .map_err(|e| to_storage_err(format!("reader {idx} poisoned: {e}")))?;
            ticket.run(&conn, f)
        })
        .await
        .map_err(|e| to_storage_err(format!("read task failed: {e}")))?
    }

    pub fn size(&self) -> usize {
        self.readers.len()
    }
}
