//! The ballot-casting state machine.
//!
//! Every operation takes an explicit [`ballot_store::StateAccess`] handle for
//! the current invocation and is a pure function of committed ledger state
//! and its arguments: it reads, validates, and stages writes. Atomic commit
//! and conflict detection belong to whoever supplies the handle.
//!
//! Layering, leaves first:
//! - [`keys`] maps identifiers to namespaced ledger keys and scan ranges.
//! - [`codec`] turns records into ledger bytes and back.
//! - [`VoterRegistry`] and [`CandidateRegistry`] own one namespace each.
//! - [`VotingContract`] is the invocation surface; `cast_vote` is the only
//!   operation that chains a read-validate-write across both namespaces.

pub mod candidate;
pub mod codec;
pub mod commitment;
pub mod contract;
pub mod error;
pub mod keys;
mod results;
pub mod voter;

pub use candidate::{CandidateRegistry, Candidates};
pub use codec::{Record, Records};
pub use commitment::{ballot_hash, verify_ballot_hash};
pub use contract::VotingContract;
pub use error::{ContractError, EntityKind, ErrorKind};
pub use voter::{VoterRegistry, Voters};
