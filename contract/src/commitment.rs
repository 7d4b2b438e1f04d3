//! Ballot commitments.
//!
//! The encrypted ballot never touches the ledger. A voter stores only the
//! SHA-256 of the ciphertext and can later prove which ballot they committed
//! to by presenting the payload.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of an encrypted ballot payload.
pub fn ballot_hash(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

/// True when `expected` is the hex SHA-256 of `payload`, in either case.
pub fn verify_ballot_hash(payload: &[u8], expected: &str) -> bool {
    let Ok(expected) = hex::decode(expected.trim()) else {
        return false;
    };
    let actual = Sha256::digest(payload);
    expected.len() == actual.len()
        && expected
            .iter()
            .zip(actual.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest() {
        assert_eq!(
            ballot_hash(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn verification_ignores_case() {
        let upper = ballot_hash(b"ciphertext").to_uppercase();
        assert!(verify_ballot_hash(b"ciphertext", &upper));
    }

    #[test]
    fn rejects_other_payloads_and_non_hex() {
        let hash = ballot_hash(b"one");
        assert!(!verify_ballot_hash(b"two", &hash));
        assert!(!verify_ballot_hash(b"one", "not-hex"));
        assert!(!verify_ballot_hash(b"one", &hash[..32]));
    }
}
