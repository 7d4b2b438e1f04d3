//! Derived records returned by result, seeding and audit queries.
//!
//! None of these are persisted; they are computed from the voter and
//! candidate namespaces at query time.

use serde::{Deserialize, Serialize};

use crate::{Candidate, CandidateId};

/// One candidate's line in the aggregated results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateTally {
    pub candidate_id: CandidateId,
    pub name: String,
    pub party: String,
    pub votes: u64,
}

impl From<Candidate> for CandidateTally {
    fn from(c: Candidate) -> Self {
        Self {
            candidate_id: c.candidate_id,
            name: c.name,
            party: c.party,
            votes: c.vote_count,
        }
    }
}

/// Aggregated election results, candidates in key order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionResults {
    pub total_votes: u64,
    pub candidates: Vec<CandidateTally>,
}

impl ElectionResults {
    /// The tally with the most votes. Ties resolve to the lowest key.
    pub fn leader(&self) -> Option<&CandidateTally> {
        self.candidates
            .iter()
            .fold(None, |best: Option<&CandidateTally>, c| match best {
                Some(b) if b.votes >= c.votes => Some(b),
                _ => Some(c),
            })
    }
}

/// Input for bulk candidate creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSeed {
    pub id: CandidateId,
    pub name: String,
    pub party: String,
}

/// Outcome of a bulk candidate creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub created: Vec<CandidateId>,
    /// Ids that already existed (or repeated within the same seed list).
    pub skipped: Vec<CandidateId>,
}

/// A candidate whose stored count disagrees with a recount of voter records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyDiscrepancy {
    pub candidate_id: CandidateId,
    /// `voteCount` on the candidate record; 0 if the candidate does not exist.
    pub recorded: u64,
    /// Voters with `hasVoted` and `votedFor == candidate_id`.
    pub counted: u64,
}

/// Result of recounting every voter record against candidate tallies.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyAudit {
    /// Sum of recorded `voteCount` over all candidates.
    pub total_votes: u64,
    /// Number of voter records with `hasVoted == true`.
    pub voters_voted: u64,
    pub discrepancies: Vec<TallyDiscrepancy>,
}

impl TallyAudit {
    pub fn is_consistent(&self) -> bool {
        self.discrepancies.is_empty() && self.total_votes == self.voters_voted
    }
}
