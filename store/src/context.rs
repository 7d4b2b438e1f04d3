//! Transaction context: a [`StateAccess`] over a [`LedgerBackend`].

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::{
    LedgerBackend, RangeCursor, RangeRead, ReadWriteSet, StateAccess, StoreError, Version,
};

/// Executes one invocation against committed state.
///
/// Reads go to the backend and are recorded with the version observed.
/// Writes are buffered and shadow committed state for later reads in the
/// same invocation. Nothing reaches the backend until [`TxContext::commit`].
/// Dropping the context discards the invocation.
pub struct TxContext<'a, B: LedgerBackend + ?Sized> {
    backend: &'a B,
    rwset: ReadWriteSet,
}

impl<'a, B: LedgerBackend + ?Sized> TxContext<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self {
            backend,
            rwset: ReadWriteSet::default(),
        }
    }

    pub fn rwset(&self) -> &ReadWriteSet {
        &self.rwset
    }

    pub fn into_rwset(self) -> ReadWriteSet {
        self.rwset
    }

    /// Hand the recorded reads and buffered writes to the backend.
    pub fn commit(self) -> Result<Version, StoreError> {
        self.backend.commit(self.rwset)
    }
}

impl<B: LedgerBackend + ?Sized> StateAccess for TxContext<'_, B> {
    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if let Some(pending) = self.rwset.writes.get(key) {
            return Ok(Some(pending.clone()));
        }
        let current = self.backend.get_versioned(key)?;
        // First observation wins: a later read of a newer version must still
        // fail validation against what the invocation already acted on.
        self.rwset
            .reads
            .entry(key.to_string())
            .or_insert(current.as_ref().map(|v| v.version));
        Ok(current.map(|v| v.value))
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.rwset.writes.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn range_scan(&mut self, start: &str, end: &str) -> Result<RangeCursor, StoreError> {
        let committed = self.backend.scan_versioned(start, end)?;
        self.rwset.range_reads.push(RangeRead {
            start: start.to_string(),
            end: end.to_string(),
            observed: committed
                .iter()
                .map(|(k, v)| (k.clone(), v.version))
                .collect(),
        });

        let mut merged: BTreeMap<String, Vec<u8>> = committed
            .into_iter()
            .map(|(k, v)| (k, v.value))
            .collect();
        let bounds = (Bound::Included(start), Bound::Excluded(end));
        for (k, v) in self.rwset.writes.range::<str, _>(bounds) {
            merged.insert(k.clone(), v.clone());
        }
        Ok(RangeCursor::new(merged.into_iter().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VersionedValue;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapBackend {
        state: Mutex<BTreeMap<String, VersionedValue>>,
        height: Mutex<Version>,
    }

    impl MapBackend {
        fn seed(&self, key: &str, value: &[u8], version: Version) {
            self.state.lock().unwrap().insert(
                key.to_string(),
                VersionedValue {
                    value: value.to_vec(),
                    version,
                },
            );
        }
    }

    impl LedgerBackend for MapBackend {
        fn get_versioned(&self, key: &str) -> Result<Option<VersionedValue>, StoreError> {
            Ok(self.state.lock().unwrap().get(key).cloned())
        }

        fn scan_versioned(
            &self,
            start: &str,
            end: &str,
        ) -> Result<Vec<(String, VersionedValue)>, StoreError> {
            Ok(self
                .state
                .lock()
                .unwrap()
                .range::<str, _>((Bound::Included(start), Bound::Excluded(end)))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect())
        }

        fn commit(&self, rwset: ReadWriteSet) -> Result<Version, StoreError> {
            let mut height = self.height.lock().unwrap();
            *height += 1;
            let mut state = self.state.lock().unwrap();
            for (k, v) in rwset.writes {
                state.insert(
                    k,
                    VersionedValue {
                        value: v,
                        version: *height,
                    },
                );
            }
            Ok(*height)
        }

        fn height(&self) -> Result<Version, StoreError> {
            Ok(*self.height.lock().unwrap())
        }
    }

    #[test]
    fn reads_are_recorded_with_versions() {
        let backend = MapBackend::default();
        backend.seed("voter:a", b"A", 7);
        let mut ctx = TxContext::new(&backend);

        assert_eq!(ctx.get_state("voter:a").unwrap(), Some(b"A".to_vec()));
        assert_eq!(ctx.get_state("voter:b").unwrap(), None);

        let rwset = ctx.into_rwset();
        assert_eq!(rwset.reads.get("voter:a"), Some(&Some(7)));
        assert_eq!(rwset.reads.get("voter:b"), Some(&None));
        assert!(rwset.is_read_only());
    }

    #[test]
    fn pending_writes_shadow_committed_state() {
        let backend = MapBackend::default();
        backend.seed("candidate:a", b"old", 1);
        let mut ctx = TxContext::new(&backend);

        ctx.put_state("candidate:a", b"new").unwrap();
        ctx.put_state("candidate:b", b"fresh").unwrap();

        assert_eq!(ctx.get_state("candidate:a").unwrap(), Some(b"new".to_vec()));
        let scanned: Vec<_> = ctx.range_scan("candidate:", "candidate;").unwrap().collect();
        assert_eq!(
            scanned,
            vec![
                ("candidate:a".to_string(), b"new".to_vec()),
                ("candidate:b".to_string(), b"fresh".to_vec()),
            ]
        );
        // The scan records what was committed, not the overlay.
        let rwset = ctx.rwset();
        assert_eq!(rwset.range_reads[0].observed, vec![("candidate:a".to_string(), 1)]);
    }

    #[test]
    fn dropped_context_writes_nothing() {
        let backend = MapBackend::default();
        {
            let mut ctx = TxContext::new(&backend);
            ctx.put_state("voter:a", b"A").unwrap();
        }
        assert_eq!(backend.get_versioned("voter:a").unwrap(), None);
        assert_eq!(backend.height().unwrap(), 0);
    }

    #[test]
    fn commit_applies_buffered_writes() {
        let backend = MapBackend::default();
        let mut ctx = TxContext::new(&backend);
        ctx.put_state("voter:a", b"A").unwrap();
        assert_eq!(ctx.commit().unwrap(), 1);
        assert_eq!(backend.get_versioned("voter:a").unwrap().unwrap().version, 1);
    }
}
