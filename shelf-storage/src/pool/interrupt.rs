//! Abort a blocking query when the future awaiting it is dropped.
//!
//! A read runs on the blocking pool while the async caller awaits its
//! `JoinHandle`. If the caller goes away (timeout, cancellation) the
//! [`InterruptOnDrop`] half calls `sqlite3_interrupt` on the connection, but
//! only while the [`QueryTicket`] half is inside its closure, so a connection
//! already handed to the next reader is never interrupted.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, InterruptHandle};

use shelf_core::errors::ShelfResult;

use crate::to_storage_err;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Queued,
    Running,
    Finished,
    Abandoned,
}

#[derive(Debug)]
struct Shared {
    phase: Mutex<Phase>,
}

impl Shared {
    fn phase(&self) -> MutexGuard<'_, Phase> {
        self.phase.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Held by the async side.
pub(crate) struct InterruptOnDrop {
    shared: Arc<Shared>,
    handle: Arc<InterruptHandle>,
}

/// Moved into the blocking task.
pub(crate) struct QueryTicket {
    shared: Arc<Shared>,
}

pub(crate) fn interruptible(handle: Arc<InterruptHandle>) -> (InterruptOnDrop, QueryTicket) {
    let shared = Arc::new(Shared {
        phase: Mutex::new(Phase::Queued),
    });
    (
        InterruptOnDrop {
            shared: Arc::clone(&shared),
            handle,
        },
        QueryTicket { shared },
    )
}

impl Drop for InterruptOnDrop {
    fn drop(&mut self) {
        let mut phase = self.shared.phase();
        match *phase {
            Phase::Running => {
                self.handle.interrupt();
                *phase = Phase::Abandoned;
            }
            Phase::Queued => *phase = Phase::Abandoned,
            Phase::Finished | Phase::Abandoned => {}
        }
    }
}

impl QueryTicket {
    /// Run `f` on `conn` unless the caller already gave up.
    ///
    /// Must be called while holding the connection; the phase is set back to
    /// `Finished` before the connection is released.
    pub(crate) fn run<F, T>(self, conn: &Connection, f: F) -> ShelfResult<T>
    where
        F: FnOnce(&Connection) -> ShelfResult<T>,
    {
        {
            let mut phase = self.shared.phase();
            if *phase == Phase::Abandoned {
                return Err(to_storage_err("read abandoned before it started".to_string()));
            }
            *phase = Phase::Running;
        }
        let out = f(conn);
        *self.shared.phase() = Phase::Finished;
        out
    }
}
