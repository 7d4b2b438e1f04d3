//! Per-invocation execution with optimistic commit and conflict retry.

use ballot_contract::VotingContract;
use ballot_store::{LedgerBackend, StoreError, TxContext, Version};

use crate::{Invocation, InvocationOutput, RuntimeError, StatsCounter, StatsSnapshot};

/// Runs invocations against a ledger backend.
///
/// Every attempt starts from a fresh [`TxContext`], so a retried invocation
/// re-reads committed state from scratch. Safe to share between threads;
/// concurrent submits are serialized by the backend's commit validation.
pub struct TransactionRunner<B> {
    backend: B,
    contract: VotingContract,
    max_commit_attempts: u32,
    stats: StatsCounter,
}

impl<B: LedgerBackend> TransactionRunner<B> {
    /// `max_commit_attempts` below 1 is treated as 1.
    pub fn new(backend: B, max_commit_attempts: u32) -> Self {
        Self {
            backend,
            contract: VotingContract::new(),
            max_commit_attempts: max_commit_attempts.max(1),
            stats: StatsCounter::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn height(&self) -> Result<Version, RuntimeError> {
        Ok(self.backend.height()?)
    }

    /// Execute and commit `invocation`.
    ///
    /// A contract error is returned as-is with nothing committed. A commit
    /// lost to a concurrent writer re-executes the whole invocation, up to
    /// `max_commit_attempts` times in total. Read-only invocations go through
    /// the same validation so their reads come from one ledger height, but
    /// write nothing and leave the height unchanged.
    pub fn submit(&self, invocation: &Invocation) -> Result<InvocationOutput, RuntimeError> {
        self.stats.submitted();
        let op = invocation.name();
        let read_only = invocation.is_read_only();
        let mut last_conflict = String::new();
        for attempt in 1..=self.max_commit_attempts {
            let mut ctx = TxContext::new(&self.backend);
            let output = match invocation.apply(&self.contract, &mut ctx) {
                Ok(output) => output,
                Err(e) => {
                    self.stats.rejected();
                    tracing::debug!(op, attempt, error = %e, "invocation rejected");
                    return Err(e.into());
                }
            };

            match ctx.commit() {
                Ok(height) if read_only => {
                    self.stats.evaluated();
                    tracing::debug!(op, height, attempt, "query validated");
                    return Ok(output);
                }
                Ok(height) => {
                    self.stats.committed();
                    tracing::info!(op, height, attempt, "invocation committed");
                    return Ok(output);
                }
                Err(StoreError::Conflict { key }) => {
                    self.stats.conflict();
                    tracing::debug!(op, attempt, %key, "commit conflict, re-executing");
                    last_conflict = key;
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::warn!(
            op,
            attempts = self.max_commit_attempts,
            key = %last_conflict,
            "commit retries exhausted"
        );
        Err(RuntimeError::ConflictRetriesExhausted {
            op,
            attempts: self.max_commit_attempts,
            key: last_conflict,
        })
    }

    /// Execute `invocation` against current state without committing.
    ///
    /// Reads are not validated, so an invocation that reads several keys may
    /// observe writes committed while it ran.
    pub fn evaluate(&self, invocation: &Invocation) -> Result<InvocationOutput, RuntimeError> {
        self.stats.evaluated();
        let mut ctx = TxContext::new(&self.backend);
        Ok(invocation.apply(&self.contract, &mut ctx)?)
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}
