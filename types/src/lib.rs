//! Fundamental types for the ballot ledger.
//!
//! This crate defines the records shared across every other crate in the
//! workspace: identifiers, voter and candidate records, and the derived
//! result and audit structures returned by queries.

pub mod candidate;
pub mod id;
pub mod results;
mod serde_helpers;
pub mod voter;

pub use candidate::Candidate;
pub use id::{CandidateId, VoterId};
pub use results::{
    CandidateSeed, CandidateTally, ElectionResults, SeedReport, TallyAudit, TallyDiscrepancy,
};
pub use voter::{Voter, VoterStatus};
