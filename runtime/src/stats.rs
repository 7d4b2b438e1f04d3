//! Invocation counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Thread-safe counters shared by every caller of a runner.
#[derive(Debug, Default)]
pub struct StatsCounter {
    submitted: AtomicU64,
    committed: AtomicU64,
    rejected: AtomicU64,
    conflicts: AtomicU64,
    evaluated: AtomicU64,
}

/// Point-in-time copy of a [`StatsCounter`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Invocations handed to `submit`.
    pub submitted: u64,
    /// Successful commits.
    pub committed: u64,
    /// Invocations refused by the contract.
    pub rejected: u64,
    /// Commit attempts lost to a concurrent writer.
    pub conflicts: u64,
    /// Executions that never commit (read-only submits and `evaluate`).
    pub evaluated: u64,
}

impl StatsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn committed(&self) {
        self.committed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn conflict(&self) {
        self.conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn evaluated(&self) {
        self.evaluated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            submitted: self.submitted.load(Ordering::Relaxed),
            committed: self.committed.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            conflicts: self.conflicts.load(Ordering::Relaxed),
            evaluated: self.evaluated.load(Ordering::Relaxed),
        }
    }
}
