//! Opening the on-disk ledger.

use ballot_store_lmdb::{LmdbEnvironment, LmdbLedger, Migrator};

use crate::{RuntimeConfig, RuntimeError};

/// Open (or create) the LMDB ledger under `config.data_dir` and bring its
/// schema up to date.
///
/// Fails on a database written by a newer schema.
pub fn open_lmdb_ledger(config: &RuntimeConfig) -> Result<LmdbLedger, RuntimeError> {
    let env = LmdbEnvironment::open(&config.data_dir, config.max_dbs, config.map_size)?;
    Migrator::run(&env.meta_store())?;
    tracing::info!(data_dir = %config.data_dir.display(), "ledger opened");
    Ok(env.ledger())
}
