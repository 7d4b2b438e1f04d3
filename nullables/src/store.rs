//! Nullable ledger: thread-safe in-memory backend for testing.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Mutex;

use ballot_store::{LedgerBackend, ReadWriteSet, StoreError, Version, VersionedValue};

#[derive(Default)]
struct Inner {
    state: BTreeMap<String, VersionedValue>,
    height: Version,
    /// Commits still to be rejected as conflicts, for retry tests.
    forced_conflicts: u32,
}

/// An in-memory versioned ledger.
///
/// Commit semantics match the LMDB backend: validation and write-apply
/// happen under one lock, so concurrent commits are serialized and a stale
/// read set is always rejected. Thread-safe for use from multiple runners.
pub struct NullLedger {
    inner: Mutex<Inner>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Every committed key with its raw value, in key order.
    pub fn dump(&self) -> BTreeMap<String, Vec<u8>> {
        self.inner
            .lock()
            .unwrap()
            .state
            .iter()
            .map(|(k, v)| (k.clone(), v.value.clone()))
            .collect()
    }

    /// Write raw bytes at `key` as a committed value, bypassing validation.
    /// Used to plant corrupt records.
    pub fn inject_raw(&self, key: &str, value: &[u8]) {
        let mut inner = self.inner.lock().unwrap();
        inner.height += 1;
        let version = inner.height;
        inner.state.insert(
            key.to_string(),
            VersionedValue {
                value: value.to_vec(),
                version,
            },
        );
    }

    /// Reject the next `n` commits with [`StoreError::Conflict`].
    pub fn force_conflicts(&self, n: u32) {
        self.inner.lock().unwrap().forced_conflicts = n;
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerBackend for NullLedger {
    fn get_versioned(&self, key: &str) -> Result<Option<VersionedValue>, StoreError> {
        Ok(self.inner.lock().unwrap().state.get(key).cloned())
    }

    fn scan_versioned(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<(String, VersionedValue)>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(scan(&inner.state, start, end)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn commit(&self, rwset: ReadWriteSet) -> Result<Version, StoreError> {
        let mut inner = self.inner.lock().unwrap();

        if inner.forced_conflicts > 0 {
            inner.forced_conflicts -= 1;
            let key = rwset
                .writes
                .keys()
                .next()
                .or_else(|| rwset.reads.keys().next())
                .cloned()
                .unwrap_or_default();
            return Err(StoreError::Conflict { key });
        }

        rwset.validate(
            |key| Ok(inner.state.get(key).map(|v| v.version)),
            |start, end| {
                Ok(scan(&inner.state, start, end)
                    .map(|(k, v)| (k.clone(), v.version))
                    .collect())
            },
        )?;

        if rwset.is_read_only() {
            return Ok(inner.height);
        }

        inner.height += 1;
        let version = inner.height;
        for (key, value) in rwset.writes {
            inner.state.insert(key, VersionedValue { value, version });
        }
        tracing::trace!(height = version, "null ledger commit");
        Ok(version)
    }

    fn height(&self) -> Result<Version, StoreError> {
        Ok(self.inner.lock().unwrap().height)
    }
}

fn scan<'a>(
    state: &'a BTreeMap<String, VersionedValue>,
    start: &'a str,
    end: &'a str,
) -> impl Iterator<Item = (&'a String, &'a VersionedValue)> {
    state.range::<str, _>((Bound::Included(start), Bound::Excluded(end)))
}
