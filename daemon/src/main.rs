//! Attestation daemon: entry point for driving an attestation node.

mod script;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use attest_node::{init_logging, AppChain, NodeConfig, StoreBackend};
use attest_types::{Claim, EntityId, PublicKey};

#[derive(Parser)]
#[command(name = "attest-daemon", about = "Credential attestation node daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "ATTEST_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for ledger storage.
    #[arg(long, env = "ATTEST_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// State backend: "memory" or "lmdb".
    #[arg(long, env = "ATTEST_STORE")]
    store: Option<StoreBackend>,

    /// Blocks a ballot stays open after its creation block.
    #[arg(long, env = "ATTEST_VOTE_DURATION")]
    vote_duration: Option<u64>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "ATTEST_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "ATTEST_LOG_FORMAT")]
    log_format: Option<String>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Generate an identity and print its public key.
    Keygen {
        /// 32-byte hex seed for a deterministic key.
        #[arg(long)]
        seed: Option<String>,
    },
    /// Execute a block script and print one JSON receipt per transaction.
    Apply {
        /// Path to the TOML block script.
        script: PathBuf,
    },
    /// Read protocol state.
    Query {
        #[command(subcommand)]
        what: Query,
    },
    /// Print the identifier a credential would get.
    #[command(name = "credential-id")]
    CredentialId {
        /// Decimal or 32-byte hex claim.
        claim: Claim,
        /// Owner public key (hex).
        owner: PublicKey,
    },
}

#[derive(clap::Subcommand)]
enum Query {
    /// The current admin, if any.
    Admin,
    /// Whether an identity is an accredited judge.
    Judge { id: PublicKey },
    /// Number of accreditations so far.
    #[command(name = "judge-count")]
    JudgeCount,
    /// A ballot and its outcome at the current height.
    Vote { id: EntityId },
    /// A stored credential.
    Credential { id: EntityId },
    /// Height of the next block.
    Height,
}

impl Cli {
    /// File config (or defaults) with CLI flags and env vars layered on top.
    fn node_config(&self) -> anyhow::Result<NodeConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let path = path
                    .to_str()
                    .context("config path is not valid UTF-8")?;
                NodeConfig::from_toml_file(path)?
            }
            None => NodeConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(store) = self.store {
            config.store = store;
        }
        if let Some(duration) = self.vote_duration {
            config.vote_duration = duration;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.log_format = format.clone();
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.node_config()?;
    init_logging(config.log_format()?, &config.log_level);

    match cli.command {
        Command::Keygen { seed } => {
            let keypair = match seed {
                Some(hex_seed) => {
                    let bytes = hex::decode(hex_seed.trim_start_matches("0x"))
                        .context("seed is not valid hex")?;
                    let seed: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
                        anyhow::anyhow!("seed must be 32 bytes, got {}", bytes.len())
                    })?;
                    attest_crypto::keypair_from_seed(&seed)
                }
                None => attest_crypto::generate_keypair(),
            };
            println!("{}", keypair.public);
        }
        Command::CredentialId { claim, owner } => {
            println!("{}", attest_crypto::credential_id(&claim, &owner));
        }
        Command::Apply { script: path } => {
            let blocks = script::Script::from_file(&path)?.into_blocks()?;
            if config.store == StoreBackend::Memory {
                tracing::warn!("memory store selected; state is discarded on exit");
            }
            let mut chain = AppChain::open(&config)?;
            tracing::info!(blocks = blocks.len(), script = %path.display(), "applying script");
            script::run(&mut chain, blocks, |line| println!("{line}"));
            tracing::info!(height = %chain.height(), "script applied");
        }
        Command::Query { what } => {
            let chain = AppChain::open(&config)?;
            let out = match what {
                Query::Admin => serde_json::json!({
                    "admin": chain.admin()?.map(|a| a.to_string()),
                }),
                Query::Judge { id } => serde_json::json!({
                    "judge": id.to_string(),
                    "is_judge": chain.is_judge(&id)?,
                }),
                Query::JudgeCount => serde_json::json!({
                    "judge_count": chain.judge_count()?,
                }),
                Query::Vote { id } => match chain.vote(&id)? {
                    Some(vote) => serde_json::json!({
                        "id": id.to_string(),
                        "yay": vote.yay,
                        "nay": vote.nay,
                        "expires_at": vote.expires_at.as_u64(),
                        "outcome": vote.outcome(chain.height()),
                    }),
                    None => serde_json::Value::Null,
                },
                Query::Credential { id } => match chain.credential(&id)? {
                    Some(credential) => serde_json::json!({
                        "id": id.to_string(),
                        "claim": credential.claim.to_string(),
                        "owner": credential.owner.to_string(),
                        "status": chain.credential_status(&id)?,
                    }),
                    None => serde_json::Value::Null,
                },
                Query::Height => serde_json::json!({
                    "height": chain.height().as_u64(),
                }),
            };
            println!("{out}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "attest-daemon",
            "--store",
            "lmdb",
            "--vote-duration",
            "5",
            "--data-dir",
            "/tmp/attest",
            "query",
            "height",
        ]);
        let config = cli.node_config().unwrap();
        assert_eq!(config.store, StoreBackend::Lmdb);
        assert_eq!(config.vote_duration, 5);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/attest"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn parses_credential_id_arguments() {
        let owner = "01".repeat(32);
        let cli = Cli::parse_from(["attest-daemon", "credential-id", "7", &owner]);
        match cli.command {
            Command::CredentialId { claim, owner } => {
                assert_eq!(claim, Claim::from(7));
                assert_eq!(owner, PublicKey([1; 32]));
            }
            _ => panic!("wrong subcommand"),
        }
    }
}
