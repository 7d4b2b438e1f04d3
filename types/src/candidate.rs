//! Candidate record.

use serde::{Deserialize, Serialize};

use crate::CandidateId;

/// A candidate as persisted at `candidate:<candidateID>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Candidate {
    #[serde(rename = "candidateID")]
    pub candidate_id: CandidateId,
    pub name: String,
    pub party: String,
    /// Number of voters whose `votedFor` is this candidate. Never decremented.
    #[serde(rename = "voteCount")]
    pub vote_count: u64,
}

impl Candidate {
    pub fn new(candidate_id: CandidateId, name: impl Into<String>, party: impl Into<String>) -> Self {
        Self {
            candidate_id,
            name: name.into(),
            party: party.into(),
            vote_count: 0,
        }
    }
}
