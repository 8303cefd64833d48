//! Visit / generate counters.
//!
//! The in-memory atomics are the source of truth for the running process.
//! When persistence is configured, every increment also pokes a background
//! writer that copies the latest snapshot into the database; the increment
//! itself never waits on I/O.

pub mod handlers;
pub mod store;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Notify;

/// Point-in-time counter values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub visits: u64,
    pub generates: u64,
}

/// The counter service injected into handlers through `AppState`.
pub trait CounterService: Send + Sync {
    fn record_visit(&self);
    fn record_generate(&self);
    fn snapshot(&self) -> Snapshot;
    /// Whether increments are mirrored to a database.
    fn is_persistent(&self) -> bool;
}

#[derive(Debug, Default)]
struct Cells {
    visits: AtomicU64,
    generates: AtomicU64,
}

/// Lock-free counters with an optional change notification for the mirror task.
#[derive(Debug, Clone, Default)]
pub struct Counters {
    cells: Arc<Cells>,
    mirror: Option<Arc<Notify>>,
}

impl Counters {
    /// Counters that live only in memory.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Counters that signal `notify` after every increment.
    pub fn mirrored(notify: Arc<Notify>) -> Self {
        Self {
            cells: Arc::default(),
            mirror: Some(notify),
        }
    }

    fn bump(&self, cell: &AtomicU64) {
        cell.fetch_add(1, Ordering::Relaxed);
        if let Some(notify) = &self.mirror {
            // Stores a permit when the writer is busy, so bursts coalesce into one write.
            notify.notify_one();
        }
    }
}

impl CounterService for Counters {
    fn record_visit(&self) {
        self.bump(&self.cells.visits);
    }

    fn record_generate(&self) {
        self.bump(&self.cells.generates);
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            visits: self.cells.visits.load(Ordering::Relaxed),
            generates: self.cells.generates.load(Ordering::Relaxed),
        }
    }

    fn is_persistent(&self) -> bool {
        self.mirror.is_some()
    }
}
