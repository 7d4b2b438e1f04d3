//! Record codec: voter and candidate records to ledger bytes and back.
//!
//! Records are stored as JSON with fixed field names. Decoding is strict:
//! unknown or missing fields, wrong types, a record whose own id does not
//! match the key it was read from, or a voter whose vote fields disagree are
//! all reported as [`ContractError::MalformedRecord`].

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use ballot_store::{RangeCursor, StoreError};
use ballot_types::{Candidate, Voter};

use crate::error::{ContractError, EntityKind};
use crate::keys::{candidate_key, voter_key};

/// A record type that lives in one ledger namespace.
pub trait Record: Serialize + DeserializeOwned {
    const KIND: EntityKind;

    /// The ledger key this record is stored under.
    fn key(&self) -> String;

    /// Structural checks beyond what serde enforces.
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

impl Record for Voter {
    const KIND: EntityKind = EntityKind::Voter;

    fn key(&self) -> String {
        voter_key(&self.voter_id)
    }

    fn check(&self) -> Result<(), String> {
        if self.voter_id.is_blank() {
            return Err("blank voterID".into());
        }
        match (self.has_voted, &self.voted_for) {
            (true, None) => Err("hasVoted is set but votedFor is empty".into()),
            (false, Some(c)) => Err(format!("votedFor is {c} but hasVoted is not set")),
            _ => Ok(()),
        }
    }
}

impl Record for Candidate {
    const KIND: EntityKind = EntityKind::Candidate;

    fn key(&self) -> String {
        candidate_key(&self.candidate_id)
    }

    fn check(&self) -> Result<(), String> {
        if self.candidate_id.is_blank() {
            return Err("blank candidateID".into());
        }
        Ok(())
    }
}

pub fn encode<R: Record>(record: &R) -> Result<Vec<u8>, ContractError> {
    serde_json::to_vec(record).map_err(|e| {
        ContractError::Store(StoreError::Serialization(format!(
            "{} {}: {e}",
            R::KIND,
            record.key()
        )))
    })
}

/// Decode the bytes stored at `key`.
pub fn decode<R: Record>(key: &str, bytes: &[u8]) -> Result<R, ContractError> {
    let malformed = |reason: String| ContractError::MalformedRecord {
        kind: R::KIND,
        key: key.to_string(),
        reason,
    };

    let record: R = serde_json::from_slice(bytes).map_err(|e| malformed(e.to_string()))?;
    let own_key = record.key();
    if own_key != key {
        return Err(malformed(format!("record belongs at {own_key}")));
    }
    record.check().map_err(malformed)?;
    Ok(record)
}

/// Lazily decoding iterator over one namespace scan.
///
/// Yields records in key order. The underlying cursor is a point-in-time
/// snapshot taken when the scan started and cannot be restarted.
pub struct Records<R> {
    cursor: RangeCursor,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Records<R> {
    pub(crate) fn new(cursor: RangeCursor) -> Self {
        Self {
            cursor,
            _record: PhantomData,
        }
    }
}

impl<R: Record> Iterator for Records<R> {
    type Item = Result<R, ContractError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor
            .next()
            .map(|(key, bytes)| decode::<R>(&key, &bytes))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cursor.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use ballot_types::{CandidateId, VoterId};

    fn voted(voter: &str, candidate: &str) -> Voter {
        let mut v = Voter::new(VoterId::new(voter));
        v.record_vote(CandidateId::new(candidate));
        v.ballot_hash = Some("ab".repeat(32));
        v
    }

    #[test]
    fn voter_round_trip() {
        let v = voted("v1", "c1");
        let bytes = encode(&v).unwrap();
        assert_eq!(decode::<Voter>("voter:v1", &bytes).unwrap(), v);
    }

    #[test]
    fn candidate_round_trip_at_zero() {
        let c = Candidate::new(CandidateId::new("c1"), "Alice", "Red");
        let bytes = encode(&c).unwrap();
        assert_eq!(decode::<Candidate>("candidate:c1", &bytes).unwrap(), c);
    }

    #[test]
    fn field_order_is_irrelevant() {
        let bytes = br#"{"voteCount":4,"party":"Red","name":"Alice","candidateID":"c1"}"#;
        let c = decode::<Candidate>("candidate:c1", bytes).unwrap();
        assert_eq!(c.vote_count, 4);
    }

    #[test]
    fn reads_empty_strings_as_unset() {
        let bytes = br#"{"voterID":"v1","hasVoted":true,"votedFor":"c1","ballotHash":""}"#;
        let v = decode::<Voter>("voter:v1", bytes).unwrap();
        assert_eq!(v.voted_for, Some(CandidateId::new("c1")));
        assert_eq!(v.ballot_hash, None);
    }

    #[test]
    fn garbage_is_malformed() {
        let err = decode::<Voter>("voter:v1", b"\x00\x01not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
        assert!(err.to_string().contains("voter:v1"));
    }

    #[test]
    fn unknown_and_missing_fields_are_malformed() {
        let extra = br#"{"candidateID":"c1","name":"A","party":"R","voteCount":0,"extra":1}"#;
        let missing = br#"{"candidateID":"c1","name":"A","party":"R"}"#;
        assert_eq!(
            decode::<Candidate>("candidate:c1", extra).unwrap_err().kind(),
            ErrorKind::MalformedRecord
        );
        assert_eq!(
            decode::<Candidate>("candidate:c1", missing).unwrap_err().kind(),
            ErrorKind::MalformedRecord
        );
    }

    #[test]
    fn negative_vote_count_is_malformed() {
        let bytes = br#"{"candidateID":"c1","name":"A","party":"R","voteCount":-1}"#;
        assert_eq!(
            decode::<Candidate>("candidate:c1", bytes).unwrap_err().kind(),
            ErrorKind::MalformedRecord
        );
    }

    #[test]
    fn record_under_wrong_key_is_malformed() {
        let bytes = encode(&Voter::new(VoterId::new("v2"))).unwrap();
        let err = decode::<Voter>("voter:v1", &bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
    }

    #[test]
    fn inconsistent_vote_fields_are_malformed() {
        let bytes = br#"{"voterID":"v1","hasVoted":true,"votedFor":"","ballotHash":""}"#;
        assert_eq!(
            decode::<Voter>("voter:v1", bytes).unwrap_err().kind(),
            ErrorKind::MalformedRecord
        );
        let bytes = br#"{"voterID":"v1","hasVoted":false,"votedFor":"c1","ballotHash":""}"#;
        assert_eq!(
            decode::<Voter>("voter:v1", bytes).unwrap_err().kind(),
            ErrorKind::MalformedRecord
        );
    }

    #[test]
    fn records_iterator_reports_each_failure() {
        let good = encode(&Candidate::new(CandidateId::new("a"), "A", "P")).unwrap();
        let cursor = RangeCursor::new(vec![
            ("candidate:a".into(), good),
            ("candidate:b".into(), b"{".to_vec()),
        ]);
        let items: Vec<_> = Records::<Candidate>::new(cursor).collect();
        assert!(items[0].is_ok());
        assert_eq!(items[1].as_ref().unwrap_err().kind(), ErrorKind::MalformedRecord);
    }
}
