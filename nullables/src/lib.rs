//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern: the storage engine is
//! abstracted behind [`ballot_store::LedgerBackend`], and this crate provides
//! an implementation that:
//! - Keeps everything in memory
//! - Can be inspected and tampered with programmatically
//! - Never touches the filesystem
//!
//! Usage: swap the LMDB backend for [`NullLedger`] in tests.

pub mod store;

pub use store::NullLedger;
