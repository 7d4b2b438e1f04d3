//! Runtime for the ballot ledger.
//!
//! Provides the platform side the voting contract assumes: each
//! [`Invocation`] runs in its own transaction context, its reads are
//! validated and its writes applied atomically at commit, and a commit lost
//! to a concurrent writer re-executes the invocation.

pub mod config;
pub mod error;
pub mod invocation;
pub mod ledger;
pub mod logging;
pub mod runner;
pub mod stats;

pub use config::RuntimeConfig;
pub use error::RuntimeError;
pub use invocation::{Invocation, InvocationOutput};
pub use ledger::open_lmdb_ledger;
pub use logging::{init_logging, LogFormat};
pub use runner::TransactionRunner;
pub use stats::{StatsCounter, StatsSnapshot};
