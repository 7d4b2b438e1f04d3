//! LMDB storage backend for the ballot ledger.
//!
//! Implements the `ballot-store` traits using the `heed` LMDB bindings.
//! Two databases live in a single environment:
//! - `state`: ledger key → bincode `VersionedValue`
//! - `meta`: bookkeeping (ledger height, schema version)

pub mod environment;
pub mod error;
pub mod ledger;
pub mod meta;
pub mod migration;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use ledger::LmdbLedger;
pub use meta::LmdbMetaStore;
pub use migration::{Migrator, CURRENT_SCHEMA_VERSION};
