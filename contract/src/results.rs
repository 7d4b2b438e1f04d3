//! Aggregate results, bulk candidate seeding and the tally audit.

use std::collections::BTreeMap;

use ballot_store::StateAccess;
use ballot_types::{
    CandidateId, CandidateSeed, CandidateTally, ElectionResults, SeedReport, TallyAudit,
    TallyDiscrepancy,
};

use crate::candidate::CandidateRegistry;
use crate::error::{ContractError, EntityKind};
use crate::keys::candidate_key;
use crate::voter::VoterRegistry;
use crate::VotingContract;

fn overflow(candidate_id: &CandidateId) -> ContractError {
    ContractError::MalformedRecord {
        kind: EntityKind::Candidate,
        key: candidate_key(candidate_id),
        reason: "vote total overflows u64".into(),
    }
}

impl VotingContract {
    /// Per-candidate tallies in key order, with the overall total.
    pub fn get_all_results<S>(&self, state: &mut S) -> Result<ElectionResults, ContractError>
    where
        S: StateAccess + ?Sized,
    {
        let mut results = ElectionResults::default();
        for candidate in CandidateRegistry::list_all(state)? {
            let tally = CandidateTally::from(candidate?);
            results.total_votes = results
                .total_votes
                .checked_add(tally.votes)
                .ok_or_else(|| overflow(&tally.candidate_id))?;
            results.candidates.push(tally);
        }
        Ok(results)
    }

    /// Create every seeded candidate that does not exist yet.
    ///
    /// Existing ids, and ids repeated within `seeds`, are reported as
    /// skipped. A blank field anywhere fails the whole batch before anything
    /// is staged.
    pub fn seed_candidates<S>(
        &self,
        state: &mut S,
        seeds: &[CandidateSeed],
    ) -> Result<SeedReport, ContractError>
    where
        S: StateAccess + ?Sized,
    {
        for seed in seeds {
            if seed.id.is_blank() {
                return Err(ContractError::blank("candidateID"));
            }
            if seed.name.trim().is_empty() {
                return Err(ContractError::blank("name"));
            }
            if seed.party.trim().is_empty() {
                return Err(ContractError::blank("party"));
            }
        }

        let mut report = SeedReport::default();
        for seed in seeds {
            // Pending writes are visible here, so an in-batch repeat is
            // skipped like a committed one.
            if CandidateRegistry::exists(state, &seed.id)? {
                report.skipped.push(seed.id.clone());
                continue;
            }
            CandidateRegistry::create(state, &seed.id, &seed.name, &seed.party)?;
            report.created.push(seed.id.clone());
        }
        tracing::info!(
            created = report.created.len(),
            skipped = report.skipped.len(),
            "candidates seeded"
        );
        Ok(report)
    }

    /// Recount votes from voter records and compare with candidate tallies.
    pub fn audit_tally<S>(&self, state: &mut S) -> Result<TallyAudit, ContractError>
    where
        S: StateAccess + ?Sized,
    {
        let mut recorded: BTreeMap<CandidateId, u64> = BTreeMap::new();
        let mut total_votes: u64 = 0;
        for candidate in CandidateRegistry::list_all(state)? {
            let candidate = candidate?;
            total_votes = total_votes
                .checked_add(candidate.vote_count)
                .ok_or_else(|| overflow(&candidate.candidate_id))?;
            recorded.insert(candidate.candidate_id, candidate.vote_count);
        }

        let mut counted: BTreeMap<CandidateId, u64> = BTreeMap::new();
        let mut voters_voted: u64 = 0;
        for voter in VoterRegistry::scan(state)? {
            if let Some(choice) = voter?.voted_for {
                voters_voted += 1;
                *counted.entry(choice).or_default() += 1;
            }
        }

        let mut ids: Vec<&CandidateId> = recorded.keys().chain(counted.keys()).collect();
        ids.sort();
        ids.dedup();
        let discrepancies: Vec<TallyDiscrepancy> = ids
            .into_iter()
            .filter_map(|id| {
                let recorded = recorded.get(id).copied().unwrap_or(0);
                let counted = counted.get(id).copied().unwrap_or(0);
                (recorded != counted).then(|| TallyDiscrepancy {
                    candidate_id: id.clone(),
                    recorded,
                    counted,
                })
            })
            .collect();

        if !discrepancies.is_empty() {
            tracing::warn!(count = discrepancies.len(), "tally audit found discrepancies");
        }
        Ok(TallyAudit {
            total_votes,
            voters_voted,
            discrepancies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use ballot_nullables::NullLedger;
    use ballot_store::TxContext;

    fn seed(id: &str, name: &str, party: &str) -> CandidateSeed {
        CandidateSeed {
            id: CandidateId::new(id),
            name: name.into(),
            party: party.into(),
        }
    }

    #[test]
    fn results_sum_in_key_order() {
        let ledger = NullLedger::new();
        let contract = VotingContract::new();
        let mut ctx = TxContext::new(&ledger);
        contract.create_candidate(&mut ctx, "c2", "Bob", "Blue").unwrap();
        contract.create_candidate(&mut ctx, "c1", "Alice", "Red").unwrap();
        for v in ["v1", "v2", "v3"] {
            contract.register_voter(&mut ctx, v).unwrap();
        }
        contract.cast_vote(&mut ctx, "v1", "c2").unwrap();
        contract.cast_vote(&mut ctx, "v2", "c2").unwrap();
        contract.cast_vote(&mut ctx, "v3", "c1").unwrap();

        let results = contract.get_all_results(&mut ctx).unwrap();
        assert_eq!(results.total_votes, 3);
        let ids: Vec<&str> = results.candidates.iter().map(|c| c.candidate_id.as_str()).collect();
        assert_eq!(ids, ["c1", "c2"]);
        assert_eq!(results.leader().unwrap().candidate_id.as_str(), "c2");
    }

    #[test]
    fn seeding_skips_existing_and_repeated_ids() {
        let ledger = NullLedger::new();
        let contract = VotingContract::new();
        let mut ctx = TxContext::new(&ledger);
        contract.create_candidate(&mut ctx, "c1", "Alice", "Red").unwrap();
        ctx.commit().unwrap();

        let mut ctx = TxContext::new(&ledger);
        let report = contract
            .seed_candidates(
                &mut ctx,
                &[
                    seed("c1", "Other", "Party"),
                    seed("c2", "Bob", "Blue"),
                    seed("c2", "Bob again", "Blue"),
                ],
            )
            .unwrap();
        assert_eq!(report.created, vec![CandidateId::new("c2")]);
        assert_eq!(report.skipped, vec![CandidateId::new("c1"), CandidateId::new("c2")]);
        assert_eq!(contract.query_results(&mut ctx, "c2").unwrap().name, "Bob");
    }

    #[test]
    fn blank_seed_stages_nothing() {
        let ledger = NullLedger::new();
        let mut ctx = TxContext::new(&ledger);
        let err = VotingContract::new()
            .seed_candidates(&mut ctx, &[seed("c1", "A", "R"), seed("c2", "B", " ")])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(ctx.rwset().writes.is_empty());
    }

    #[test]
    fn audit_flags_tampered_count_and_dangling_vote() {
        let ledger = NullLedger::new();
        ledger.inject_raw(
            "candidate:c1",
            br#"{"candidateID":"c1","name":"A","party":"R","voteCount":2}"#,
        );
        ledger.inject_raw(
            "voter:v1",
            br#"{"voterID":"v1","hasVoted":true,"votedFor":"c1","ballotHash":""}"#,
        );
        ledger.inject_raw(
            "voter:v2",
            br#"{"voterID":"v2","hasVoted":true,"votedFor":"gone","ballotHash":""}"#,
        );

        let mut ctx = TxContext::new(&ledger);
        let audit = VotingContract::new().audit_tally(&mut ctx).unwrap();
        assert!(!audit.is_consistent());
        assert_eq!(audit.total_votes, 2);
        assert_eq!(audit.voters_voted, 2);
        assert_eq!(
            audit.discrepancies,
            vec![
                TallyDiscrepancy {
                    candidate_id: CandidateId::new("c1"),
                    recorded: 2,
                    counted: 1,
                },
                TallyDiscrepancy {
                    candidate_id: CandidateId::new("gone"),
                    recorded: 0,
                    counted: 1,
                },
            ]
        );
    }

    #[test]
    fn audit_of_honest_ledger_is_consistent() {
        let ledger = NullLedger::new();
        let contract = VotingContract::new();
        let mut ctx = TxContext::new(&ledger);
        contract.create_candidate(&mut ctx, "c1", "Alice", "Red").unwrap();
        contract.register_voter(&mut ctx, "v1").unwrap();
        contract.register_voter(&mut ctx, "v2").unwrap();
        contract.cast_vote(&mut ctx, "v1", "c1").unwrap();
        let audit = contract.audit_tally(&mut ctx).unwrap();
        assert!(audit.is_consistent());
        assert_eq!(audit.voters_voted, 1);
    }
}
