use log::{info, warn};
use thiserror::Error;

use super::{pow, Block, GENESIS_PREV_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// Errors that can occur when mutating the chain.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("invalid proof-of-work: {proof} does not extend {prev_proof} at difficulty {difficulty}")]
    InvalidProof {
        prev_proof: u64,
        proof: u64,
        difficulty: u32,
    },
}

/// A single node's authoritative copy of the ledger.
///
/// The chain starts at the fixed genesis block and only ever grows by
/// appending a freshly mined block, or changes wholesale when consensus
/// swaps in a longer valid chain from a peer. Blocks are never rewritten
/// in place.
#[derive(Debug)]
pub struct Blockchain {
    pub chain: Vec<Block>,
    difficulty: u32,
}

impl Blockchain {
    /// Initialize a new chain containing only the genesis block.
    pub fn new(difficulty: u32) -> Self {
        Self {
            chain: vec![Block::genesis()],
            difficulty,
        }
    }

    /// The most recently appended block. The chain is never empty.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("chain always holds at least the genesis block")
    }

    /// Construct and append the next block from drained pool transactions
    /// and a freshly found proof.
    ///
    /// The proof is re-verified against the tip: a proof that fails here is
    /// an internal-invariant violation (the search already checked it) and
    /// the block must not be appended.
    pub fn append(
        &mut self,
        transactions: Vec<Transaction>,
        proof: u64,
    ) -> Result<&Block, ChainError> {
        let last = self.last_block();
        if !pow::verify(last.proof, proof, self.difficulty) {
            return Err(ChainError::InvalidProof {
                prev_proof: last.proof,
                proof,
                difficulty: self.difficulty,
            });
        }

        let block = Block::new(last.index + 1, transactions, proof, last.hash());
        info!(
            "CHAIN - forged block #{} with {} txs (proof={})",
            block.index,
            block.transactions.len(),
            block.proof
        );
        self.chain.push(block);
        Ok(self.last_block())
    }

    /// Replace the whole chain with one that won consensus. The caller
    /// must have validated it; partial replacement is not supported.
    pub fn replace(&mut self, chain: Vec<Block>) {
        info!(
            "CHAIN - replaced local chain ({} -> {} blocks)",
            self.chain.len(),
            chain.len()
        );
        self.chain = chain;
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Validate this node's own chain.
    pub fn is_valid(&self) -> bool {
        Self::is_valid_chain(&self.chain, self.difficulty)
    }

    /// Full validation of an arbitrary block sequence, usable on candidate
    /// chains fetched from peers as well as on the local chain.
    ///
    /// Checks, stopping at the first violation:
    /// - non-empty, with the fixed genesis shape at index 0;
    /// - contiguous indices;
    /// - every block's `previous_hash` matches its predecessor's digest;
    /// - every consecutive proof pair satisfies the difficulty predicate.
    pub fn is_valid_chain(blocks: &[Block], difficulty: u32) -> bool {
        let Some(genesis) = blocks.first() else {
            return false;
        };

        if genesis.index != 0
            || genesis.proof != GENESIS_PROOF
            || genesis.previous_hash != GENESIS_PREV_HASH
            || !genesis.transactions.is_empty()
        {
            warn!("CHAIN - rejected chain: malformed genesis block");
            return false;
        }

        for i in 1..blocks.len() {
            let block = &blocks[i];
            let prev = &blocks[i - 1];

            if block.index != prev.index + 1 {
                warn!("CHAIN - rejected chain: index gap at position {}", i);
                return false;
            }
            if block.previous_hash != prev.hash() {
                warn!("CHAIN - rejected chain: broken hash link at block {}", block.index);
                return false;
            }
            if !pow::verify(prev.proof, block.proof, difficulty) {
                warn!("CHAIN - rejected chain: invalid proof at block {}", block.index);
                return false;
            }
        }

        true
    }
}
