use proptest::prelude::*;

use ballot_types::{CandidateId, Voter, VoterId, VoterStatus};

proptest! {
    /// Recording a vote always ends in `Voted` and never touches the ballot hash.
    #[test]
    fn record_vote_is_terminal(
        voter in "[a-z0-9]{1,16}",
        candidate in "[a-z0-9]{1,16}",
        hash in proptest::option::of("[0-9a-f]{64}"),
    ) {
        let mut v = Voter::new(VoterId::new(voter));
        v.ballot_hash = hash.clone();
        v.record_vote(CandidateId::new(candidate.clone()));
        prop_assert_eq!(v.status(), VoterStatus::Voted);
        prop_assert_eq!(v.voted_for, Some(CandidateId::new(candidate)));
        prop_assert_eq!(v.ballot_hash, hash);
    }

    /// Blank detection agrees with trimming.
    #[test]
    fn blank_iff_trimmed_empty(raw in "[ \\ta-z]{0,8}") {
        prop_assert_eq!(VoterId::new(raw.clone()).is_blank(), raw.trim().is_empty());
        prop_assert_eq!(CandidateId::new(raw.clone()).is_blank(), raw.trim().is_empty());
    }
}
