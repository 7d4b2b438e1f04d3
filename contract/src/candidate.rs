//! Candidate registry: owns the `candidate:` namespace.

use ballot_store::StateAccess;
use ballot_types::{Candidate, CandidateId};

use crate::codec::{self, Records};
use crate::error::{ContractError, EntityKind};
use crate::keys::{candidate_key, candidate_range};

/// Lazy, key-ordered iterator over every candidate record.
pub type Candidates = Records<Candidate>;

pub struct CandidateRegistry;

impl CandidateRegistry {
    /// Create a candidate with a zero vote count.
    pub fn create<S>(
        state: &mut S,
        candidate_id: &CandidateId,
        name: &str,
        party: &str,
    ) -> Result<Candidate, ContractError>
    where
        S: StateAccess + ?Sized,
    {
        if candidate_id.is_blank() {
            return Err(ContractError::blank("candidateID"));
        }
        if name.trim().is_empty() {
            return Err(ContractError::blank("name"));
        }
        if party.trim().is_empty() {
            return Err(ContractError::blank("party"));
        }
        if Self::exists(state, candidate_id)? {
            return Err(ContractError::already_exists(
                EntityKind::Candidate,
                candidate_id,
            ));
        }

        let candidate = Candidate::new(candidate_id.clone(), name, party);
        Self::put(state, &candidate)?;
        tracing::debug!(candidate = %candidate_id, "candidate created");
        Ok(candidate)
    }

    pub fn get<S>(state: &mut S, candidate_id: &CandidateId) -> Result<Candidate, ContractError>
    where
        S: StateAccess + ?Sized,
    {
        let key = candidate_key(candidate_id);
        match state.get_state(&key)? {
            Some(bytes) => codec::decode(&key, &bytes),
            None => Err(ContractError::not_found(EntityKind::Candidate, candidate_id)),
        }
    }

    pub(crate) fn exists<S>(state: &mut S, candidate_id: &CandidateId) -> Result<bool, ContractError>
    where
        S: StateAccess + ?Sized,
    {
        Ok(state.get_state(&candidate_key(candidate_id))?.is_some())
    }

    /// Add exactly one vote to a candidate already read in this invocation
    /// and write it back.
    ///
    /// Voter-side checks are the caller's job.
    pub(crate) fn increment_vote<S>(
        state: &mut S,
        mut candidate: Candidate,
    ) -> Result<Candidate, ContractError>
    where
        S: StateAccess + ?Sized,
    {
        candidate.vote_count = candidate.vote_count.checked_add(1).ok_or_else(|| {
            ContractError::MalformedRecord {
                kind: EntityKind::Candidate,
                key: candidate_key(&candidate.candidate_id),
                reason: "voteCount overflow".into(),
            }
        })?;
        Self::put(state, &candidate)?;
        tracing::debug!(
            candidate = %candidate.candidate_id,
            votes = candidate.vote_count,
            "vote counted"
        );
        Ok(candidate)
    }

    /// Every candidate in key order (not creation order).
    pub fn list_all<S>(state: &mut S) -> Result<Candidates, ContractError>
    where
        S: StateAccess + ?Sized,
    {
        let (start, end) = candidate_range();
        Ok(Records::new(state.range_scan(&start, &end)?))
    }

    fn put<S>(state: &mut S, candidate: &Candidate) -> Result<(), ContractError>
    where
        S: StateAccess + ?Sized,
    {
        let bytes = codec::encode(candidate)?;
        state.put_state(&candidate_key(&candidate.candidate_id), &bytes)?;
        Ok(())
    }
}
