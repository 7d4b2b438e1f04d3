use ballot_store::StoreError;
use ballot_types::VoterId;
use std::fmt;
use thiserror::Error;

/// Which namespace an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Voter,
    Candidate,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Voter => f.write_str("voter"),
            Self::Candidate => f.write_str("candidate"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("invalid argument {field}: {reason}")]
    InvalidArgument {
        field: &'static str,
        reason: &'static str,
    },

    #[error("{kind} already exists: {id}")]
    AlreadyExists { kind: EntityKind, id: String },

    #[error("{kind} does not exist: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("voter has already cast their vote: {voter_id}")]
    AlreadyVoted { voter_id: VoterId },

    /// Stored bytes do not decode to the expected record. Signals ledger
    /// corruption or schema drift, never a normal business condition.
    #[error("malformed {kind} record at {key}: {reason}")]
    MalformedRecord {
        kind: EntityKind,
        key: String,
        reason: String,
    },

    #[error("ledger error: {0}")]
    Store(#[from] StoreError),
}

/// Stable discriminant of a [`ContractError`], for matching without payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    AlreadyExists,
    NotFound,
    AlreadyVoted,
    MalformedRecord,
    Store,
}

impl ContractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyVoted { .. } => ErrorKind::AlreadyVoted,
            Self::MalformedRecord { .. } => ErrorKind::MalformedRecord,
            Self::Store(_) => ErrorKind::Store,
        }
    }

    pub(crate) fn blank(field: &'static str) -> Self {
        Self::InvalidArgument {
            field,
            reason: "must not be empty or whitespace",
        }
    }

    pub(crate) fn not_found(kind: EntityKind, id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn already_exists(kind: EntityKind, id: impl fmt::Display) -> Self {
        Self::AlreadyExists {
            kind,
            id: id.to_string(),
        }
    }
}
