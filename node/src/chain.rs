//! Single-process block producer hosting the runtime.
//!
//! Transactions are queued with [`AppChain::submit`] and executed, in
//! submission order and one at a time, by [`AppChain::produce_block`]. Every
//! transaction in a block sees that block's height; the height advances
//! once the block is done and is persisted under the `chain_height` meta key.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use attest_nullables::NullStore;
use attest_runtime::{Credential, Runtime, RuntimeCall, TxReceipt, Vote, VoteOutcome};
use attest_store::{StateOverlay, StateStore};
use attest_store_lmdb::{check_data_dir, check_integrity, LmdbEnvironment};
use attest_types::{BlockHeight, EntityId, ExecutionContext, ProtocolParams, PublicKey};

use crate::tracing_spans::{block_span, tx_span};
use crate::{NodeConfig, NodeError, StoreBackend};

const HEIGHT_KEY: &str = "chain_height";
const LMDB_MAX_DBS: u32 = 4;

/// A call together with the identity the ledger authenticated for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: PublicKey,
    pub call: RuntimeCall,
}

impl Transaction {
    pub fn new(sender: PublicKey, call: RuntimeCall) -> Self {
        Self { sender, call }
    }
}

/// A transaction and the status it was recorded with.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockTx {
    pub tx: Transaction,
    pub receipt: TxReceipt,
}

/// A produced block.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    pub height: BlockHeight,
    pub txs: Vec<BlockTx>,
}

pub struct AppChain {
    store: Arc<dyn StateStore>,
    runtime: Runtime,
    height: BlockHeight,
    mempool: VecDeque<Transaction>,
}

impl AppChain {
    /// Host a runtime on `store`, resuming from its persisted height.
    pub fn new(store: Arc<dyn StateStore>, params: &ProtocolParams) -> Result<Self, NodeError> {
        let height = match store.get_meta(HEIGHT_KEY)? {
            Some(bytes) => {
                let arr: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    NodeError::Corruption(format!(
                        "{HEIGHT_KEY} has {} bytes, expected 8",
                        bytes.len()
                    ))
                })?;
                BlockHeight::new(u64::from_be_bytes(arr))
            }
            None => BlockHeight::GENESIS,
        };
        tracing::info!(height = %height, vote_duration = params.vote_duration, "chain ready");
        Ok(Self {
            store,
            runtime: Runtime::new(params),
            height,
            mempool: VecDeque::new(),
        })
    }

    /// Build the configured backend and host a runtime on it.
    pub fn open(config: &NodeConfig) -> Result<Self, NodeError> {
        let store: Arc<dyn StateStore> = match config.store {
            StoreBackend::Memory => Arc::new(NullStore::new()),
            StoreBackend::Lmdb => {
                check_data_dir(&config.data_dir).map_err(NodeError::Corruption)?;
                let env = LmdbEnvironment::open(
                    &config.data_dir,
                    LMDB_MAX_DBS,
                    config.lmdb_map_size,
                )?;
                let report = check_integrity(env.env())?;
                if !report.is_healthy() {
                    return Err(NodeError::Corruption(report.errors.join("; ")));
                }
                tracing::debug!(
                    databases = report.databases_checked,
                    entries = report.total_entries,
                    "integrity check passed"
                );
                Arc::new(env.state_store())
            }
        };
        Self::new(store, &config.protocol_params())
    }

    /// Height the next produced block will have.
    pub fn height(&self) -> BlockHeight {
        self.height
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn pending_count(&self) -> usize {
        self.mempool.len()
    }

    /// Queue a transaction for the next block.
    pub fn submit(&mut self, tx: Transaction) {
        tracing::debug!(sender = %tx.sender, call = tx.call.name(), "transaction queued");
        self.mempool.push_back(tx);
    }

    /// Execute every queued transaction at the current height, then advance.
    ///
    /// Transactions commit as they execute, so the block is returned even if
    /// persisting the new height fails. The in-memory height still advances
    /// and the next block retries the write.
    pub fn produce_block(&mut self) -> Block {
        let height = self.height;
        let span = block_span(height.as_u64(), self.mempool.len());
        let _enter = span.enter();

        let mut txs = Vec::with_capacity(self.mempool.len());
        for (index, tx) in self.mempool.drain(..).enumerate() {
            let _tx_enter = tx_span(index, &tx.sender.to_string()).entered();
            let ctx = ExecutionContext::new(tx.sender, height);
            let receipt = self.runtime.execute(self.store.as_ref(), &ctx, &tx.call);
            txs.push(BlockTx { tx, receipt });
        }

        let next = height.next();
        if let Err(e) = self.store.put_meta(HEIGHT_KEY, &next.as_u64().to_be_bytes()) {
            tracing::error!(error = %e, next = %next, "failed to persist chain height");
        }
        self.height = next;

        let failed = txs.iter().filter(|t| !t.receipt.status).count();
        tracing::info!(txs = txs.len(), failed, "block produced");
        Block { height, txs }
    }

    // ── Queries ─────────────────────────────────────────────────────────

    fn view(&self) -> StateOverlay<'_> {
        StateOverlay::new(self.store.as_ref())
    }

    pub fn admin(&self) -> Result<Option<PublicKey>, NodeError> {
        Ok(self.runtime.admin().admin(&self.view())?)
    }

    pub fn is_judge(&self, identity: &PublicKey) -> Result<bool, NodeError> {
        Ok(self.runtime.judges().is_judge(&self.view(), identity)?)
    }

    pub fn judge_count(&self) -> Result<u64, NodeError> {
        Ok(self.runtime.judges().judge_count(&self.view())?)
    }

    pub fn credential(&self, id: &EntityId) -> Result<Option<Credential>, NodeError> {
        Ok(self.runtime.credentials().credential(&self.view(), id)?)
    }

    pub fn vote(&self, id: &EntityId) -> Result<Option<Vote>, NodeError> {
        Ok(self.runtime.voting().vote(&self.view(), id)?)
    }

    pub fn has_voted(&self, voter: &PublicKey, id: &EntityId) -> Result<bool, NodeError> {
        Ok(self.runtime.voting().has_voted(&self.view(), voter, id)?)
    }

    /// Outcome of a credential's ballot as seen by the next block.
    /// `None` if no such credential was submitted.
    pub fn credential_status(&self, id: &EntityId) -> Result<Option<VoteOutcome>, NodeError> {
        Ok(self.vote(id)?.map(|vote| vote.outcome(self.height)))
    }
}
