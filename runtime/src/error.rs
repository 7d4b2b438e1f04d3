use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Contract(#[from] ballot_contract::ContractError),

    #[error("store error: {0}")]
    Store(#[from] ballot_store::StoreError),

    #[error("LMDB error: {0}")]
    Lmdb(#[from] ballot_store_lmdb::LmdbError),

    #[error("{op} gave up after {attempts} conflicting commits (last on {key})")]
    ConflictRetriesExhausted {
        op: &'static str,
        attempts: u32,
        key: String,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("logging error: {0}")]
    Logging(String),
}

impl RuntimeError {
    /// The contract error behind this failure, if the invocation itself was
    /// rejected.
    pub fn contract_error(&self) -> Option<&ballot_contract::ContractError> {
        match self {
            Self::Contract(e) => Some(e),
            _ => None,
        }
    }
}
