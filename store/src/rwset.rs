//! Read/write sets for optimistic concurrency control.
//!
//! An invocation runs against committed state without locks. Everything it
//! read is recorded with the version it saw; everything it wants to write is
//! buffered. At commit the backend re-checks every recorded version inside
//! its write section. If another commit touched any of them first, the whole
//! set is rejected and the invocation must be re-executed from scratch.

use std::collections::BTreeMap;

use crate::{StoreError, Version};

/// Keys observed by one range scan, with their versions, in key order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeRead {
    pub start: String,
    pub end: String,
    pub observed: Vec<(String, Version)>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadWriteSet {
    /// Point reads. `None` records that the key was absent.
    pub reads: BTreeMap<String, Option<Version>>,
    /// Range scans, re-run at commit to catch phantoms.
    pub range_reads: Vec<RangeRead>,
    /// Buffered writes, applied together at commit.
    pub writes: BTreeMap<String, Vec<u8>>,
}

impl ReadWriteSet {
    pub fn is_read_only(&self) -> bool {
        self.writes.is_empty()
    }

    /// Check every recorded read against current committed state.
    ///
    /// `version_of` returns the committed version of a key; `scan` returns the
    /// committed `(key, version)` pairs in a range. Both must observe the same
    /// state that the subsequent writes will be applied to.
    pub fn validate<V, S>(&self, mut version_of: V, mut scan: S) -> Result<(), StoreError>
    where
        V: FnMut(&str) -> Result<Option<Version>, StoreError>,
        S: FnMut(&str, &str) -> Result<Vec<(String, Version)>, StoreError>,
    {
        for (key, seen) in &self.reads {
            if version_of(key)? != *seen {
                return Err(StoreError::Conflict { key: key.clone() });
            }
        }

        for range in &self.range_reads {
            let current = scan(&range.start, &range.end)?;
            if current != range.observed {
                let key = first_divergence(&range.observed, &current)
                    .unwrap_or_else(|| range.start.clone());
                return Err(StoreError::Conflict { key });
            }
        }

        Ok(())
    }
}

fn first_divergence(a: &[(String, Version)], b: &[(String, Version)]) -> Option<String> {
    for (x, y) in a.iter().zip(b.iter()) {
        if x != y {
            return Some(x.0.clone().min(y.0.clone()));
        }
    }
    match a.len().cmp(&b.len()) {
        std::cmp::Ordering::Less => Some(b[a.len()].0.clone()),
        std::cmp::Ordering::Greater => Some(a[b.len()].0.clone()),
        std::cmp::Ordering::Equal => None,
    }
}
