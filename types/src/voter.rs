//! Voter record.

use serde::{Deserialize, Serialize};

use crate::serde_helpers::empty_as_none;
use crate::{CandidateId, VoterId};

/// Lifecycle state of a registered voter.
///
/// `Unregistered` is not represented: a voter without a record simply has no
/// entry in the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoterStatus {
    /// Registered and still entitled to cast a vote.
    Registered,
    /// Vote cast. Terminal.
    Voted,
}

/// A registered voter as persisted at `voter:<voterID>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Voter {
    #[serde(rename = "voterID")]
    pub voter_id: VoterId,
    /// Monotonic: false until the single successful vote, then true forever.
    #[serde(rename = "hasVoted")]
    pub has_voted: bool,
    /// Candidate chosen, set together with `has_voted`. Stored as `""` when unset.
    #[serde(rename = "votedFor", with = "empty_as_none")]
    pub voted_for: Option<CandidateId>,
    /// Commitment to an encrypted ballot computed off-ledger. Stored as `""` when unset.
    #[serde(rename = "ballotHash", with = "empty_as_none")]
    pub ballot_hash: Option<String>,
}

impl Voter {
    /// A freshly registered voter: not voted, no choice, no ballot hash.
    pub fn new(voter_id: VoterId) -> Self {
        Self {
            voter_id,
            has_voted: false,
            voted_for: None,
            ballot_hash: None,
        }
    }

    pub fn status(&self) -> VoterStatus {
        if self.has_voted {
            VoterStatus::Voted
        } else {
            VoterStatus::Registered
        }
    }

    /// Record the vote on this record. Does not check `has_voted`; the caller
    /// validates before calling.
    pub fn record_vote(&mut self, candidate_id: CandidateId) {
        self.has_voted = true;
        self.voted_for = Some(candidate_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_voter_is_registered() {
        let voter = Voter::new(VoterId::new("v1"));
        assert_eq!(voter.status(), VoterStatus::Registered);
        assert!(voter.voted_for.is_none());
        assert!(voter.ballot_hash.is_none());
    }

    #[test]
    fn record_vote_keeps_ballot_hash() {
        let mut voter = Voter::new(VoterId::new("v1"));
        voter.ballot_hash = Some("abc".into());
        voter.record_vote(CandidateId::new("c1"));
        assert_eq!(voter.status(), VoterStatus::Voted);
        assert_eq!(voter.voted_for, Some(CandidateId::new("c1")));
        assert_eq!(voter.ballot_hash.as_deref(), Some("abc"));
    }

    #[test]
    fn unset_fields_persist_as_empty_strings() {
        let voter = Voter::new(VoterId::new("v1"));
        let json: serde_json::Value = serde_json::to_value(&voter).unwrap();
        assert_eq!(json["voterID"], "v1");
        assert_eq!(json["hasVoted"], false);
        assert_eq!(json["votedFor"], "");
        assert_eq!(json["ballotHash"], "");
    }
}
