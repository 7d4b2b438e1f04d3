//! Per-invocation state access handle.

use crate::StoreError;

/// The state-access handle passed into every contract operation.
///
/// One handle lives for exactly one invocation. Reads take `&mut self`
/// because an implementation may record what it read for commit-time
/// validation.
pub trait StateAccess {
    /// Read the current value of `key`, or `None` if it is absent.
    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stage a write of `value` at `key`. Nothing is visible to other
    /// invocations until the surrounding platform commits.
    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Scan `[start, end)` in byte-lexicographic key order.
    fn range_scan(&mut self, start: &str, end: &str) -> Result<RangeCursor, StoreError>;
}

/// Point-in-time cursor over `(key, value)` pairs returned by a range scan.
///
/// The contents are fixed when the scan starts. Once consumed it cannot be
/// rewound; scan again to observe later state.
#[derive(Debug)]
pub struct RangeCursor {
    entries: std::vec::IntoIter<(String, Vec<u8>)>,
}

impl RangeCursor {
    /// Build a cursor from entries already sorted by key.
    pub fn new(entries: Vec<(String, Vec<u8>)>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        Self {
            entries: entries.into_iter(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl Iterator for RangeCursor {
    type Item = (String, Vec<u8>);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl ExactSizeIterator for RangeCursor {}
