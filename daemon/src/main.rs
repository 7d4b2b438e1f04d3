//! Ballot daemon: command-line entry point for the ballot ledger.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use ballot_contract::ballot_hash;
use ballot_runtime::{
    init_logging, open_lmdb_ledger, Invocation, InvocationOutput, RuntimeConfig,
    TransactionRunner,
};
use ballot_types::CandidateSeed;
use clap::Parser;
use serde::Deserialize;

#[derive(Parser)]
#[command(name = "ballot-daemon", about = "Ballot-casting ledger")]
struct Cli {
    /// Directory holding the ledger.
    #[arg(long, env = "BALLOT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "BALLOT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "BALLOT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "BALLOT_LOG_FORMAT")]
    log_format: Option<String>,

    /// Executions of one invocation before commit conflicts are an error.
    #[arg(long, env = "BALLOT_MAX_COMMIT_ATTEMPTS")]
    max_commit_attempts: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Register an eligible voter.
    RegisterVoter { voter_id: String },

    /// Add a candidate with a zero tally.
    CreateCandidate {
        candidate_id: String,
        name: String,
        party: String,
    },

    /// Create every candidate listed in a TOML file, skipping existing ones.
    SeedCandidates { file: PathBuf },

    /// Cast a voter's single vote.
    CastVote {
        voter_id: String,
        candidate_id: String,
    },

    /// Store the commitment to a voter's encrypted ballot.
    SubmitBallotHash {
        voter_id: String,

        /// Precomputed hex SHA-256 of the encrypted ballot.
        #[arg(long, conflicts_with = "payload_file", required_unless_present = "payload_file")]
        hash: Option<String>,

        /// Encrypted ballot to hash locally.
        #[arg(long)]
        payload_file: Option<PathBuf>,
    },

    /// Check an encrypted ballot against the voter's stored commitment.
    VerifyBallot {
        voter_id: String,
        payload_file: PathBuf,
    },

    /// Show a voter record.
    GetVoter { voter_id: String },

    /// Show one candidate and its tally.
    QueryResults { candidate_id: String },

    /// List every candidate in key order.
    Candidates,

    /// Aggregated results with the overall total.
    Results,

    /// Recount votes from voter records. Exits non-zero on any discrepancy.
    Audit,

    /// Submit a raw JSON invocation, e.g. '{"op":"getVoter","voterId":"v1"}'.
    Invoke { json: String },
}

/// Seed file layout:
///
/// ```toml
/// [[candidates]]
/// id = "c1"
/// name = "Alice"
/// party = "Red"
/// ```
#[derive(Deserialize)]
struct SeedFile {
    candidates: Vec<CandidateSeed>,
}

fn read_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

impl Command {
    fn into_invocation(self) -> anyhow::Result<Invocation> {
        Ok(match self {
            Self::RegisterVoter { voter_id } => Invocation::RegisterVoter { voter_id },
            Self::CreateCandidate {
                candidate_id,
                name,
                party,
            } => Invocation::CreateCandidate {
                candidate_id,
                name,
                party,
            },
            Self::SeedCandidates { file } => {
                let content = String::from_utf8(read_file(&file)?)
                    .with_context(|| format!("{} is not UTF-8", file.display()))?;
                let seeds: SeedFile = toml::from_str(&content)
                    .with_context(|| format!("invalid seed file {}", file.display()))?;
                Invocation::SeedCandidates {
                    seeds: seeds.candidates,
                }
            }
            Self::CastVote {
                voter_id,
                candidate_id,
            } => Invocation::CastVote {
                voter_id,
                candidate_id,
            },
            Self::SubmitBallotHash {
                voter_id,
                hash,
                payload_file,
            } => {
                let ballot_hash = match (hash, payload_file) {
                    (Some(hash), _) => hash,
                    (None, Some(path)) => ballot_hash(&read_file(&path)?),
                    (None, None) => bail!("either --hash or --payload-file is required"),
                };
                Invocation::SubmitBallotHash {
                    voter_id,
                    ballot_hash,
                }
            }
            Self::VerifyBallot {
                voter_id,
                payload_file,
            } => Invocation::VerifyBallot {
                voter_id,
                payload: read_file(&payload_file)?,
            },
            Self::GetVoter { voter_id } => Invocation::GetVoter { voter_id },
            Self::QueryResults { candidate_id } => Invocation::QueryResults { candidate_id },
            Self::Candidates => Invocation::GetAllCandidates,
            Self::Results => Invocation::GetAllResults,
            Self::Audit => Invocation::AuditTally,
            Self::Invoke { json } => {
                serde_json::from_str::<Invocation>(&json).context("invalid invocation JSON")?
            }
        })
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<RuntimeConfig> {
    let mut config = match &cli.config {
        Some(path) => RuntimeConfig::from_toml_file(path)?,
        None => RuntimeConfig::default(),
    };

    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    if let Some(attempts) = cli.max_commit_attempts {
        config.max_commit_attempts = attempts;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(config.log_format()?, &config.log_level)?;
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    let invocation = cli.command.into_invocation()?;
    let ledger = open_lmdb_ledger(&config)
        .with_context(|| format!("failed to open ledger at {}", config.data_dir.display()))?;
    let runner = TransactionRunner::new(ledger, config.max_commit_attempts);

    let output = runner.submit(&invocation)?;
    let rendered = match &output {
        InvocationOutput::None => serde_json::json!({
            "op": invocation.name(),
            "status": "committed",
            "height": runner.height()?,
        }),
        other => serde_json::to_value(other)?,
    };
    println!("{}", serde_json::to_string_pretty(&rendered)?);

    if let InvocationOutput::Audit(audit) = &output {
        if !audit.is_consistent() {
            bail!(
                "tally audit failed: {} discrepancies",
                audit.discrepancies.len()
            );
        }
    }
    Ok(())
}
