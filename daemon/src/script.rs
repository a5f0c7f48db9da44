//! Block scripts: TOML files describing transactions to order into blocks.
//!
//! ```toml
//! [[block]]
//! [[block.tx]]
//! sender = "<hex public key>"
//! call = "set_admin"
//! admin = "<hex public key>"
//!
//! [[block]]
//! [[block.tx]]
//! sender = "<hex public key>"
//! call = "add_credential"
//! claim = "0"
//! ```
//!
//! Every `[[block]]` table becomes one produced block, empty ones included.

use anyhow::{anyhow, bail, Context};
use serde::Deserialize;

use attest_node::{AppChain, Transaction};
use attest_runtime::{RuntimeCall, VoteChoice};
use attest_types::{Claim, EntityId, PublicKey};

#[derive(Debug, Default, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub block: Vec<ScriptBlock>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScriptBlock {
    #[serde(default)]
    pub tx: Vec<ScriptTx>,
}

/// One transaction as written in a script. Arguments stay strings until
/// [`ScriptTx::to_transaction`] so errors can name the offending field.
#[derive(Debug, Deserialize)]
pub struct ScriptTx {
    pub sender: String,
    pub call: String,
    pub admin: Option<String>,
    pub judge: Option<String>,
    pub claim: Option<String>,
    pub vote_id: Option<String>,
    pub choice: Option<String>,
}

impl Script {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("invalid block script")
    }

    pub fn from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&contents)
    }

    /// Resolve every transaction, failing before anything is submitted.
    pub fn into_blocks(self) -> anyhow::Result<Vec<Vec<Transaction>>> {
        self.block
            .into_iter()
            .enumerate()
            .map(|(b, block)| {
                block
                    .tx
                    .iter()
                    .enumerate()
                    .map(|(t, tx)| {
                        tx.to_transaction()
                            .with_context(|| format!("block {b}, tx {t}"))
                    })
                    .collect()
            })
            .collect()
    }
}

impl ScriptTx {
    pub fn to_transaction(&self) -> anyhow::Result<Transaction> {
        let sender: PublicKey = parse_field("sender", Some(&self.sender))?;
        let call = match self.call.as_str() {
            "set_admin" => RuntimeCall::SetAdmin {
                admin: parse_field("admin", self.admin.as_deref())?,
            },
            "add_judge" => RuntimeCall::AddJudge {
                judge: parse_field("judge", self.judge.as_deref())?,
            },
            "add_credential" => RuntimeCall::AddCredential {
                claim: parse_field::<Claim>("claim", self.claim.as_deref())?,
            },
            "cast_vote" => RuntimeCall::CastVote {
                vote_id: parse_field::<EntityId>("vote_id", self.vote_id.as_deref())?,
                choice: parse_choice(self.choice.as_deref())?,
            },
            other => bail!("unknown call '{other}'"),
        };
        Ok(Transaction::new(sender, call))
    }
}

fn parse_field<T>(name: &str, value: Option<&str>) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = value.ok_or_else(|| anyhow!("missing field '{name}'"))?;
    value
        .parse()
        .map_err(|e| anyhow!("invalid {name} '{value}': {e}"))
}

fn parse_choice(value: Option<&str>) -> anyhow::Result<VoteChoice> {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("yes") | Some("true") => Ok(VoteChoice::Yes),
        Some("no") | Some("false") => Ok(VoteChoice::No),
        Some(other) => bail!("invalid choice '{other}' (expected yes or no)"),
        None => bail!("missing field 'choice'"),
    }
}

/// Submit each scripted block and produce it, emitting one JSON line per
/// transaction receipt through `out`.
pub fn run(
    chain: &mut AppChain,
    blocks: Vec<Vec<Transaction>>,
    mut out: impl FnMut(serde_json::Value),
) {
    for txs in blocks {
        for tx in txs {
            chain.submit(tx);
        }
        let block = chain.produce_block();
        for (index, btx) in block.txs.iter().enumerate() {
            out(serde_json::json!({
                "height": block.height.as_u64(),
                "index": index,
                "sender": btx.tx.sender.to_string(),
                "call": btx.tx.call.name(),
                "status": btx.receipt.status,
                "status_message": btx.receipt.status_message,
            }));
        }
    }
}
