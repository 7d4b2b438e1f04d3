//! Metadata storage trait.

use crate::StoreError;

/// Bookkeeping that lives outside the ledger's key space.
///
/// Holds the record schema version. The ledger height is not kept here: a
/// backend writes it inside its own commit so it moves atomically with the
/// state it counts.
pub trait MetaStore {
    /// Get the current record schema version. 0 means none recorded yet.
    fn get_schema_version(&self) -> Result<u32, StoreError>;

    /// Set the record schema version.
    fn set_schema_version(&self, version: u32) -> Result<(), StoreError>;
}
