use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::blockchain::{Block, Blockchain, DEFAULT_DIFFICULTY};
use crate::transaction::{Mempool, Transaction};

/// Shared per-node state: the chain, the pending-transaction pool, the
/// known peers and the mining cancellation flag.
///
/// The blockchain mutex is the node's single mutual-exclusion boundary:
/// appending a mined block and swapping in a peer chain both go through
/// it, so the two can never interleave. The cancel flag lets a consensus
/// replacement abort an in-flight proof search.
pub struct AppState {
    pub node_id: String,
    pub blockchain: Mutex<Blockchain>,
    pub mempool: Mutex<Mempool>,
    pub peers: Mutex<HashSet<String>>,
    pub mining_cancel: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(difficulty: u32) -> Self {
        Self {
            node_id: Uuid::new_v4().simple().to_string(),
            blockchain: Mutex::new(Blockchain::new(difficulty)),
            mempool: Mutex::new(Mempool::new()),
            peers: Mutex::new(HashSet::new()),
            mining_cancel: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_DIFFICULTY)
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub length: usize,
    pub difficulty: u32,
    pub chain: &'a [Block],
}

/// Owned mirror of `ChainResponse`, used when deserializing a peer's
/// answer during consensus. Unknown fields are ignored so nodes stay
/// compatible across minor response changes.
#[derive(Deserialize)]
pub struct PeerChainResponse {
    pub chain: Vec<Block>,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub difficulty: u32,
}

/* ---------- Mining API Models ---------- */

#[derive(Serialize)]
pub struct MineResponse {
    pub message: String,
    pub block: Block,
    pub length: usize,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: String,
    pub recipient: String,
    pub amount: u64,
}

#[derive(Serialize)]
pub struct NewTxResponse {
    pub message: String,
    pub block_index: u64,
}

#[derive(Serialize)]
pub struct MempoolResponse {
    pub size: usize,
    pub transactions: Vec<Transaction>,
}

/* ---------- Nodes API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct RegisterNodesResponse {
    pub message: String,
    pub total_nodes: usize,
}

#[derive(Serialize)]
pub struct NodesResponse {
    pub nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub message: String,
    pub replaced: bool,
    pub length: usize,
    pub chain: Vec<Block>,
}
