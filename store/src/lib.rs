//! Abstract ledger contract for the ballot ledger.
//!
//! The voting logic only ever sees [`StateAccess`], a per-invocation handle
//! with get/put/range-scan. Storage engines implement [`LedgerBackend`], which
//! exposes committed, versioned state and an atomic, validated commit. The
//! glue between the two is [`TxContext`]: it records every read version and
//! buffers every write so the backend can reject a commit whose reads went
//! stale in the meantime.

pub mod access;
pub mod backend;
pub mod context;
pub mod error;
pub mod meta;
pub mod rwset;

pub use access::{RangeCursor, StateAccess};
pub use backend::{LedgerBackend, Version, VersionedValue};
pub use context::TxContext;
pub use error::StoreError;
pub use meta::MetaStore;
pub use rwset::{RangeRead, ReadWriteSet};
