use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::hash;
use super::{GENESIS_PREV_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// A single block in the chain holding a list of transactions.
///
/// Blocks are immutable once appended. The field order below is the
/// canonical serialization order: `Block::hash()` fingerprints the JSON
/// encoding of the struct, so reordering fields would break every stored
/// `previous_hash` link and cross-node validation with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64, // Unix timestamp (UTC, seconds)
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

impl Block {
    /// The genesis block: fixed proof, zeroed previous hash, no
    /// transactions. Its timestamp is pinned to 0 so every node starts
    /// from a byte-identical block.
    pub fn genesis() -> Self {
        Self {
            index: 0,
            timestamp: 0,
            transactions: Vec::new(),
            proof: GENESIS_PROOF,
            previous_hash: GENESIS_PREV_HASH.to_string(),
        }
    }

    /// Create a block stamped with the current wall-clock time. The caller
    /// is responsible for having verified `proof` against the predecessor.
    pub fn new(index: u64, transactions: Vec<Transaction>, proof: u64, previous_hash: String) -> Self {
        Self {
            index,
            timestamp: Utc::now().timestamp(),
            transactions,
            proof,
            previous_hash,
        }
    }

    /// Fingerprint of this block's canonical JSON serialization.
    ///
    /// This is the value stored in the successor's `previous_hash`, so it
    /// covers every field, transactions included.
    pub fn hash(&self) -> String {
        let bytes = serde_json::to_vec(self).expect("serialize block");
        hash::digest(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::Block;
    use crate::transaction::Transaction;

    #[test]
    fn genesis_is_fixed() {
        let a = Block::genesis();
        let b = Block::genesis();
        assert_eq!(a.index, 0);
        assert_eq!(a.proof, 1);
        assert_eq!(a.previous_hash, "0000000000000000");
        assert!(a.transactions.is_empty());
        // Two nodes constructing genesis independently agree on its hash.
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn hash_is_deterministic_and_fixed_width() {
        let block = Block::genesis();
        assert_eq!(block.hash(), block.hash());
        assert_eq!(block.hash().len(), 16);
    }

    #[test]
    fn hash_changes_when_any_field_changes() {
        let base = Block::genesis();

        let mut tampered = base.clone();
        tampered.proof += 1;
        assert_ne!(base.hash(), tampered.hash());

        let mut tampered = base.clone();
        tampered.timestamp += 1;
        assert_ne!(base.hash(), tampered.hash());

        let mut tampered = base.clone();
        tampered.transactions.push(Transaction {
            sender: "alice".into(),
            recipient: "bob".into(),
            amount: 1,
        });
        assert_ne!(base.hash(), tampered.hash());
    }

    #[test]
    fn hash_covers_transaction_content() {
        let mut a = Block::new(
            1,
            vec![Transaction {
                sender: "alice".into(),
                recipient: "bob".into(),
                amount: 5,
            }],
            42,
            "0000000000000000".into(),
        );
        a.timestamp = 1_700_000_000;

        let mut b = a.clone();
        b.transactions[0].amount = 6;
        assert_ne!(a.hash(), b.hash());
    }
}
