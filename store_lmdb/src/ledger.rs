//! LMDB implementation of LedgerBackend.
//!
//! LMDB allows a single writer at a time, so validating a read/write set and
//! applying its writes inside one `RwTxn` serializes commits: whichever
//! invocation takes the write lock second sees the first one's versions.

use std::ops::Bound;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, RoTxn};

use ballot_store::{LedgerBackend, ReadWriteSet, StoreError, Version, VersionedValue};

use crate::LmdbError;

const HEIGHT_KEY: &[u8] = b"ledger_height";

pub struct LmdbLedger {
    pub(crate) env: Arc<Env>,
    pub(crate) state_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

fn read_versioned(
    db: &Database<Bytes, Bytes>,
    txn: &RoTxn,
    key: &str,
) -> Result<Option<VersionedValue>, LmdbError> {
    match db.get(txn, key.as_bytes())? {
        Some(bytes) => Ok(Some(bincode::deserialize(bytes)?)),
        None => Ok(None),
    }
}

fn scan_range(
    db: &Database<Bytes, Bytes>,
    txn: &RoTxn,
    start: &str,
    end: &str,
) -> Result<Vec<(String, VersionedValue)>, LmdbError> {
    let bounds = (
        Bound::Included(start.as_bytes()),
        Bound::Excluded(end.as_bytes()),
    );
    let mut entries = Vec::new();
    for result in db.range(txn, &bounds)? {
        let (key, val) = result?;
        let key = std::str::from_utf8(key)
            .map_err(|e| LmdbError::Serialization(format!("non-UTF-8 ledger key: {e}")))?;
        entries.push((key.to_string(), bincode::deserialize(val)?));
    }
    Ok(entries)
}

fn read_height(db: &Database<Bytes, Bytes>, txn: &RoTxn) -> Result<Version, LmdbError> {
    match db.get(txn, HEIGHT_KEY)? {
        Some(bytes) => {
            let arr: [u8; 8] = bytes
                .try_into()
                .map_err(|_| LmdbError::Serialization("invalid ledger height length".into()))?;
            Ok(u64::from_be_bytes(arr))
        }
        None => Ok(0),
    }
}

impl LedgerBackend for LmdbLedger {
    fn get_versioned(&self, key: &str) -> Result<Option<VersionedValue>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(read_versioned(&self.state_db, &rtxn, key)?)
    }

    fn scan_versioned(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<(String, VersionedValue)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(scan_range(&self.state_db, &rtxn, start, end)?)
    }

    fn commit(&self, rwset: ReadWriteSet) -> Result<Version, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        rwset.validate(
            |key| Ok(read_versioned(&self.state_db, &wtxn, key)?.map(|v| v.version)),
            |start, end| {
                Ok(scan_range(&self.state_db, &wtxn, start, end)?
                    .into_iter()
                    .map(|(k, v)| (k, v.version))
                    .collect())
            },
        )?;

        let height = read_height(&self.meta_db, &wtxn)?;
        if rwset.is_read_only() {
            // Dropping the write txn aborts it.
            return Ok(height);
        }

        let next = height + 1;
        let write_count = rwset.writes.len();
        for (key, value) in rwset.writes {
            let bytes = bincode::serialize(&VersionedValue {
                value,
                version: next,
            })
            .map_err(LmdbError::from)?;
            self.state_db
                .put(&mut wtxn, key.as_bytes(), &bytes)
                .map_err(LmdbError::from)?;
        }
        self.meta_db
            .put(&mut wtxn, HEIGHT_KEY, &next.to_be_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;

        tracing::debug!(height = next, writes = write_count, "ledger commit");
        Ok(next)
    }

    fn height(&self) -> Result<Version, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(read_height(&self.meta_db, &rtxn)?)
    }
}
