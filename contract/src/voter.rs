//! Voter registry: owns the `voter:` namespace.

use ballot_store::StateAccess;
use ballot_types::{CandidateId, Voter, VoterId};

use crate::codec::{self, Records};
use crate::error::{ContractError, EntityKind};
use crate::keys::{voter_key, voter_range};

/// Lazy, key-ordered iterator over every voter record.
pub type Voters = Records<Voter>;

/// Lifecycle operations on voter records.
///
/// Stateless: every call re-reads the ledger through the handle it is given.
pub struct VoterRegistry;

impl VoterRegistry {
    /// Register a new voter with no vote and no ballot hash.
    pub fn register<S>(state: &mut S, voter_id: &VoterId) -> Result<Voter, ContractError>
    where
        S: StateAccess + ?Sized,
    {
        if voter_id.is_blank() {
            return Err(ContractError::blank("voterID"));
        }
        let key = voter_key(voter_id);
        if state.get_state(&key)?.is_some() {
            return Err(ContractError::already_exists(EntityKind::Voter, voter_id));
        }

        let voter = Voter::new(voter_id.clone());
        Self::put(state, &voter)?;
        tracing::debug!(voter = %voter_id, "voter registered");
        Ok(voter)
    }

    pub fn get<S>(state: &mut S, voter_id: &VoterId) -> Result<Voter, ContractError>
    where
        S: StateAccess + ?Sized,
    {
        let key = voter_key(voter_id);
        match state.get_state(&key)? {
            Some(bytes) => codec::decode(&key, &bytes),
            None => Err(ContractError::not_found(EntityKind::Voter, voter_id)),
        }
    }

    /// Record `candidate_id` as the voter's choice and write the record back.
    ///
    /// No eligibility check happens here; `VotingContract::cast_vote` reads
    /// and validates the voter before calling this.
    pub(crate) fn mark_voted<S>(
        state: &mut S,
        mut voter: Voter,
        candidate_id: &CandidateId,
    ) -> Result<Voter, ContractError>
    where
        S: StateAccess + ?Sized,
    {
        voter.record_vote(candidate_id.clone());
        Self::put(state, &voter)?;
        tracing::debug!(voter = %voter.voter_id, candidate = %candidate_id, "voter marked voted");
        Ok(voter)
    }

    /// Attach or overwrite the voter's ballot commitment. Independent of
    /// whether the voter has voted.
    pub fn submit_ballot_hash<S>(
        state: &mut S,
        voter_id: &VoterId,
        ballot_hash: &str,
    ) -> Result<Voter, ContractError>
    where
        S: StateAccess + ?Sized,
    {
        if voter_id.is_blank() {
            return Err(ContractError::blank("voterID"));
        }
        if ballot_hash.trim().is_empty() {
            return Err(ContractError::blank("ballotHash"));
        }

        let mut voter = Self::get(state, voter_id)?;
        voter.ballot_hash = Some(ballot_hash.to_string());
        Self::put(state, &voter)?;
        tracing::debug!(voter = %voter_id, "ballot hash stored");
        Ok(voter)
    }

    pub fn scan<S>(state: &mut S) -> Result<Voters, ContractError>
    where
        S: StateAccess + ?Sized,
    {
        let (start, end) = voter_range();
        Ok(Records::new(state.range_scan(&start, &end)?))
    }

    fn put<S>(state: &mut S, voter: &Voter) -> Result<(), ContractError>
    where
        S: StateAccess + ?Sized,
    {
        let bytes = codec::encode(voter)?;
        state.put_state(&voter_key(&voter.voter_id), &bytes)?;
        Ok(())
    }
}
