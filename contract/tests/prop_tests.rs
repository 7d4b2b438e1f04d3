use proptest::prelude::*;

use ballot_contract::codec::{decode, encode};
use ballot_contract::{ContractError, VotingContract};
use ballot_nullables::NullLedger;
use ballot_store::{StateAccess, TxContext};
use ballot_types::{Candidate, CandidateId, Voter, VoterId};

fn id_strategy() -> impl Strategy<Value = String> {
    // Non-blank, arbitrary non-control characters.
    "[^\\s\\p{C}][^\\p{C}]{0,15}"
}

fn voter_strategy() -> impl Strategy<Value = Voter> {
    (
        id_strategy(),
        proptest::option::of(id_strategy()),
        proptest::option::of("[0-9a-f]{64}"),
    )
        .prop_map(|(id, choice, hash)| {
            let mut voter = Voter::new(VoterId::new(id));
            if let Some(choice) = choice {
                voter.record_vote(CandidateId::new(choice));
            }
            voter.ballot_hash = hash;
            voter
        })
}

fn candidate_strategy() -> impl Strategy<Value = Candidate> {
    (id_strategy(), "\\PC*", "\\PC*", any::<u64>()).prop_map(|(id, name, party, votes)| {
        let mut c = Candidate::new(CandidateId::new(id), name, party);
        c.vote_count = votes;
        c
    })
}

#[derive(Clone, Debug)]
enum Op {
    Register(u8),
    Create(u8),
    Cast(u8, u8),
    Hash(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..6).prop_map(Op::Register),
        (0u8..4).prop_map(Op::Create),
        (0u8..6, 0u8..5).prop_map(|(v, c)| Op::Cast(v, c)),
        (0u8..7).prop_map(Op::Hash),
    ]
}

fn run(ledger: &NullLedger, op: &Op) -> Result<(), ContractError> {
    let contract = VotingContract::new();
    let mut ctx = TxContext::new(ledger);
    let state: &mut dyn StateAccess = &mut ctx;
    match op {
        Op::Register(v) => contract.register_voter(state, &format!("v{v}")).map(drop),
        Op::Create(c) => contract
            .create_candidate(state, &format!("c{c}"), "Name", "Party")
            .map(drop),
        Op::Cast(v, c) => contract
            .cast_vote(state, &format!("v{v}"), &format!("c{c}"))
            .map(drop),
        Op::Hash(v) => contract
            .submit_ballot_hash(state, &format!("v{v}"), "00ff")
            .map(drop),
    }?;
    ctx.commit()?;
    Ok(())
}

proptest! {
    #[test]
    fn voter_codec_round_trips(voter in voter_strategy()) {
        let key = format!("voter:{}", voter.voter_id);
        let bytes = encode(&voter).unwrap();
        prop_assert_eq!(decode::<Voter>(&key, &bytes).unwrap(), voter);
    }

    #[test]
    fn candidate_codec_round_trips(candidate in candidate_strategy()) {
        let key = format!("candidate:{}", candidate.candidate_id);
        let bytes = encode(&candidate).unwrap();
        prop_assert_eq!(decode::<Candidate>(&key, &bytes).unwrap(), candidate);
    }

    /// Whatever sequence of operations runs, failed ones change nothing and
    /// every stored vote count matches a recount of voter records.
    #[test]
    fn tally_invariant_holds(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let ledger = NullLedger::new();
        let mut successful_casts = 0u64;
        for op in &ops {
            let before = ledger.dump();
            match run(&ledger, op) {
                Ok(()) => {
                    if matches!(op, Op::Cast(..)) {
                        successful_casts += 1;
                    }
                }
                Err(_) => prop_assert_eq!(ledger.dump(), before),
            }
        }

        let mut ctx = TxContext::new(&ledger);
        let audit = VotingContract::new().audit_tally(&mut ctx).unwrap();
        prop_assert!(audit.is_consistent(), "{:?}", audit);
        prop_assert_eq!(audit.total_votes, successful_casts);
    }
}
