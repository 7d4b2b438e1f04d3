//! Versioned ledger backend trait.

use serde::{Deserialize, Serialize};

use crate::{ReadWriteSet, StoreError};

/// Ledger height at which a value was written. Height 0 is the empty ledger;
/// every successful commit advances the height by one.
pub type Version = u64;

/// A committed value together with the height that wrote it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedValue {
    pub value: Vec<u8>,
    pub version: Version,
}

/// A storage engine holding committed ledger state.
///
/// `commit` must be atomic: either every write in the set becomes visible
/// at the new height, or none does. Before applying, the backend must call
/// [`ReadWriteSet::validate`] against its state inside the same exclusive
/// section that applies the writes.
pub trait LedgerBackend: Send + Sync {
    /// Committed value and version of `key`.
    fn get_versioned(&self, key: &str) -> Result<Option<VersionedValue>, StoreError>;

    /// Committed entries in `[start, end)`, sorted by key.
    fn scan_versioned(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<(String, VersionedValue)>, StoreError>;

    /// Validate and apply a read/write set. Returns the new ledger height.
    ///
    /// Fails with [`StoreError::Conflict`] if any recorded read is stale; no
    /// write is applied in that case.
    fn commit(&self, rwset: ReadWriteSet) -> Result<Version, StoreError>;

    /// Height of the last successful commit.
    fn height(&self) -> Result<Version, StoreError>;
}

impl<B: LedgerBackend + ?Sized> LedgerBackend for std::sync::Arc<B> {
    fn get_versioned(&self, key: &str) -> Result<Option<VersionedValue>, StoreError> {
        (**self).get_versioned(key)
    }

    fn scan_versioned(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<(String, VersionedValue)>, StoreError> {
        (**self).scan_versioned(start, end)
    }

    fn commit(&self, rwset: ReadWriteSet) -> Result<Version, StoreError> {
        (**self).commit(rwset)
    }

    fn height(&self) -> Result<Version, StoreError> {
        (**self).height()
    }
}
