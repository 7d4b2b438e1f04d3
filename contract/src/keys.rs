//! Ledger key scheme.
//!
//! Every record key is a namespace tag followed by the raw identifier, so the
//! voter and candidate id spaces never collide and each namespace is one
//! contiguous byte-lexicographic range.

use ballot_types::{CandidateId, VoterId};

pub const VOTER_PREFIX: &str = "voter:";
pub const CANDIDATE_PREFIX: &str = "candidate:";

pub fn voter_key(voter_id: &VoterId) -> String {
    format!("{VOTER_PREFIX}{voter_id}")
}

pub fn candidate_key(candidate_id: &CandidateId) -> String {
    format!("{CANDIDATE_PREFIX}{candidate_id}")
}

/// `[start, end)` bounds covering every key that begins with `prefix`.
///
/// `end` is `prefix` with its last character replaced by the next one
/// (`"candidate:"` → `"candidate;"`). UTF-8 preserves code point order, so
/// this is also the byte-lexicographic upper bound.
pub fn namespace_range(prefix: &str) -> (String, String) {
    // Only a prefix made entirely of char::MAX has no successor; the
    // namespaces above never hit that.
    (prefix.to_string(), upper_bound(prefix).unwrap_or_default())
}

pub fn voter_range() -> (String, String) {
    namespace_range(VOTER_PREFIX)
}

pub fn candidate_range() -> (String, String) {
    namespace_range(CANDIDATE_PREFIX)
}

fn upper_bound(prefix: &str) -> Option<String> {
    let mut chars: Vec<char> = prefix.chars().collect();
    while let Some(last) = chars.pop() {
        if let Some(next) = successor(last) {
            chars.push(next);
            return Some(chars.into_iter().collect());
        }
    }
    None
}

fn successor(c: char) -> Option<char> {
    // Skips the surrogate gap.
    (c as u32 + 1..=char::MAX as u32).find_map(char::from_u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced() {
        assert_eq!(voter_key(&VoterId::new("v1")), "voter:v1");
        assert_eq!(candidate_key(&CandidateId::new("c1")), "candidate:c1");
    }

    #[test]
    fn same_literal_id_never_collides() {
        assert_ne!(voter_key(&VoterId::new("x")), candidate_key(&CandidateId::new("x")));
    }

    #[test]
    fn namespace_upper_bounds() {
        assert_eq!(
            candidate_range(),
            ("candidate:".to_string(), "candidate;".to_string())
        );
        assert_eq!(voter_range(), ("voter:".to_string(), "voter;".to_string()));
    }

    #[test]
    fn every_key_in_namespace_falls_inside_range() {
        let (start, end) = candidate_range();
        for id in ["", "a", "zzz", "~~~", "\u{10FFFF}", "é"] {
            let key = candidate_key(&CandidateId::new(id));
            assert!(key.as_str() >= start.as_str() && key.as_str() < end.as_str(), "{key}");
        }
        let voter = voter_key(&VoterId::new("a"));
        assert!(!(voter.as_str() >= start.as_str() && voter.as_str() < end.as_str()));
    }

    #[test]
    fn successor_skips_surrogates_and_carries() {
        assert_eq!(successor('\u{D7FF}'), Some('\u{E000}'));
        assert_eq!(successor(char::MAX), None);
        assert_eq!(upper_bound("a\u{10FFFF}"), Some("b".to_string()));
        assert_eq!(upper_bound(""), None);
    }
}
