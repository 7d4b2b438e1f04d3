//! Invocation surface of the ballot ledger.

use ballot_store::StateAccess;
use ballot_types::{Candidate, CandidateId, Voter, VoterId};

use crate::candidate::CandidateRegistry;
use crate::commitment::verify_ballot_hash;
use crate::error::ContractError;
use crate::voter::VoterRegistry;

/// The voting state machine.
///
/// Holds no state of its own. Each method is one invocation: it reads
/// through `state`, validates, and stages writes. On error the caller must
/// discard the handle; nothing it staged may be committed.
#[derive(Clone, Copy, Debug, Default)]
pub struct VotingContract;

impl VotingContract {
    pub fn new() -> Self {
        Self
    }

    pub fn register_voter<S>(&self, state: &mut S, voter_id: &str) -> Result<Voter, ContractError>
    where
        S: StateAccess + ?Sized,
    {
        VoterRegistry::register(state, &VoterId::new(voter_id))
    }

    pub fn create_candidate<S>(
        &self,
        state: &mut S,
        candidate_id: &str,
        name: &str,
        party: &str,
    ) -> Result<Candidate, ContractError>
    where
        S: StateAccess + ?Sized,
    {
        CandidateRegistry::create(state, &CandidateId::new(candidate_id), name, party)
    }

    /// Every candidate in key order. Stops at the first corrupt record.
    pub fn get_all_candidates<S>(&self, state: &mut S) -> Result<Vec<Candidate>, ContractError>
    where
        S: StateAccess + ?Sized,
    {
        CandidateRegistry::list_all(state)?.collect()
    }

    /// Cast the voter's single vote.
    ///
    /// The voter is checked before the candidate, so a voter who already
    /// voted is told so even when the candidate id is wrong. The candidate is
    /// written first, then the voter; both land in the same commit.
    pub fn cast_vote<S>(
        &self,
        state: &mut S,
        voter_id: &str,
        candidate_id: &str,
    ) -> Result<Voter, ContractError>
    where
        S: StateAccess + ?Sized,
    {
        let voter_id = VoterId::new(voter_id);
        let candidate_id = CandidateId::new(candidate_id);

        let voter = VoterRegistry::get(state, &voter_id)?;
        if voter.has_voted {
            tracing::debug!(voter = %voter_id, "rejected second vote");
            return Err(ContractError::AlreadyVoted { voter_id });
        }
        let candidate = CandidateRegistry::get(state, &candidate_id)?;

        CandidateRegistry::increment_vote(state, candidate)?;
        VoterRegistry::mark_voted(state, voter, &candidate_id)
    }

    pub fn submit_ballot_hash<S>(
        &self,
        state: &mut S,
        voter_id: &str,
        ballot_hash: &str,
    ) -> Result<Voter, ContractError>
    where
        S: StateAccess + ?Sized,
    {
        VoterRegistry::submit_ballot_hash(state, &VoterId::new(voter_id), ballot_hash)
    }

    pub fn get_voter<S>(&self, state: &mut S, voter_id: &str) -> Result<Voter, ContractError>
    where
        S: StateAccess + ?Sized,
    {
        VoterRegistry::get(state, &VoterId::new(voter_id))
    }

    /// One candidate's record, including its current vote count.
    pub fn query_results<S>(
        &self,
        state: &mut S,
        candidate_id: &str,
    ) -> Result<Candidate, ContractError>
    where
        S: StateAccess + ?Sized,
    {
        CandidateRegistry::get(state, &CandidateId::new(candidate_id))
    }

    /// Check `payload` against the ballot hash the voter submitted.
    ///
    /// False when no hash was ever submitted.
    pub fn verify_ballot<S>(
        &self,
        state: &mut S,
        voter_id: &str,
        payload: &[u8],
    ) -> Result<bool, ContractError>
    where
        S: StateAccess + ?Sized,
    {
        let voter = VoterRegistry::get(state, &VoterId::new(voter_id))?;
        Ok(voter
            .ballot_hash
            .as_deref()
            .is_some_and(|expected| verify_ballot_hash(payload, expected)))
    }
}
