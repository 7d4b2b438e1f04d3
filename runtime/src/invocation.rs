//! The invocation surface: one variant per exposed contract operation.

use serde::{Deserialize, Serialize};

use ballot_contract::{ContractError, VotingContract};
use ballot_store::StateAccess;
use ballot_types::{Candidate, CandidateSeed, ElectionResults, SeedReport, TallyAudit, Voter};

/// A single transaction submitted to the ledger.
///
/// Serialized with an `op` tag, e.g.
/// `{"op":"castVote","voterId":"v1","candidateId":"c1"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Invocation {
    RegisterVoter {
        voter_id: String,
    },
    CreateCandidate {
        candidate_id: String,
        name: String,
        party: String,
    },
    GetAllCandidates,
    CastVote {
        voter_id: String,
        candidate_id: String,
    },
    SubmitBallotHash {
        voter_id: String,
        ballot_hash: String,
    },
    GetVoter {
        voter_id: String,
    },
    QueryResults {
        candidate_id: String,
    },
    GetAllResults,
    SeedCandidates {
        seeds: Vec<CandidateSeed>,
    },
    AuditTally,
    /// `payload` is hex in serialized form.
    VerifyBallot {
        voter_id: String,
        #[serde(with = "hex::serde")]
        payload: Vec<u8>,
    },
}

/// What an invocation returns to its caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum InvocationOutput {
    None,
    Voter(Voter),
    Candidate(Candidate),
    Candidates(Vec<Candidate>),
    Results(ElectionResults),
    Seeded(SeedReport),
    Audit(TallyAudit),
    Verified(bool),
}

impl Invocation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RegisterVoter { .. } => "registerVoter",
            Self::CreateCandidate { .. } => "createCandidate",
            Self::GetAllCandidates => "getAllCandidates",
            Self::CastVote { .. } => "castVote",
            Self::SubmitBallotHash { .. } => "submitBallotHash",
            Self::GetVoter { .. } => "getVoter",
            Self::QueryResults { .. } => "queryResults",
            Self::GetAllResults => "getAllResults",
            Self::SeedCandidates { .. } => "seedCandidates",
            Self::AuditTally => "auditTally",
            Self::VerifyBallot { .. } => "verifyBallot",
        }
    }

    /// True for operations that never write.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Self::GetAllCandidates
                | Self::GetVoter { .. }
                | Self::QueryResults { .. }
                | Self::GetAllResults
                | Self::AuditTally
                | Self::VerifyBallot { .. }
        )
    }

    /// Execute against `state`. Writes are staged on `state`, not committed.
    pub fn apply<S>(
        &self,
        contract: &VotingContract,
        state: &mut S,
    ) -> Result<InvocationOutput, ContractError>
    where
        S: StateAccess + ?Sized,
    {
        use InvocationOutput as Out;

        Ok(match self {
            Self::RegisterVoter { voter_id } => {
                contract.register_voter(state, voter_id)?;
                Out::None
            }
            Self::CreateCandidate {
                candidate_id,
                name,
                party,
            } => {
                contract.create_candidate(state, candidate_id, name, party)?;
                Out::None
            }
            Self::GetAllCandidates => Out::Candidates(contract.get_all_candidates(state)?),
            Self::CastVote {
                voter_id,
                candidate_id,
            } => {
                contract.cast_vote(state, voter_id, candidate_id)?;
                Out::None
            }
            Self::SubmitBallotHash {
                voter_id,
                ballot_hash,
            } => {
                contract.submit_ballot_hash(state, voter_id, ballot_hash)?;
                Out::None
            }
            Self::GetVoter { voter_id } => Out::Voter(contract.get_voter(state, voter_id)?),
            Self::QueryResults { candidate_id } => {
                Out::Candidate(contract.query_results(state, candidate_id)?)
            }
            Self::GetAllResults => Out::Results(contract.get_all_results(state)?),
            Self::SeedCandidates { seeds } => Out::Seeded(contract.seed_candidates(state, seeds)?),
            Self::AuditTally => Out::Audit(contract.audit_tally(state)?),
            Self::VerifyBallot { voter_id, payload } => {
                Out::Verified(contract.verify_ballot(state, voter_id, payload)?)
            }
        })
    }
}
