use serde::{Deserialize, Serialize};

/// An unauthenticated value transfer between two string addresses.
///
/// There is deliberately no signature, balance or nonce checking in this
/// design: any structurally complete transaction is accepted. Immutable
/// once included in a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: u64,
}

/// Pending transactions waiting for the next mined block.
///
/// Ordered, no deduplication. Callers wrap the pool in a mutex: a drain
/// and a concurrent add must never interleave, so a transaction drained
/// into a block can never reappear here.
#[derive(Debug, Default)]
pub struct Mempool {
    pending: Vec<Transaction>,
}

impl Mempool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a transaction and return the position it will occupy in the
    /// next mined block's transaction list.
    pub fn add(&mut self, tx: Transaction) -> usize {
        self.pending.push(tx);
        self.pending.len() - 1
    }

    /// Atomically take every pending transaction, leaving the pool empty.
    /// Called exactly once per successful mine, after the proof is found,
    /// so transactions submitted during the search wait for the next block.
    pub fn drain(&mut self) -> Vec<Transaction> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Mempool, Transaction};

    fn tx(amount: u64) -> Transaction {
        Transaction {
            sender: "alice".into(),
            recipient: "bob".into(),
            amount,
        }
    }

    #[test]
    fn add_returns_next_block_position() {
        let mut pool = Mempool::new();
        assert_eq!(pool.add(tx(1)), 0);
        assert_eq!(pool.add(tx(2)), 1);
        assert_eq!(pool.add(tx(3)), 2);
    }

    #[test]
    fn drain_returns_everything_in_order_and_empties() {
        let mut pool = Mempool::new();
        pool.add(tx(1));
        pool.add(tx(2));

        let drained = pool.drain();
        assert_eq!(drained, vec![tx(1), tx(2)]);
        assert!(pool.is_empty());
        // A second drain yields nothing; drained txs never reappear.
        assert!(pool.drain().is_empty());
    }

    #[test]
    fn positions_reset_after_drain() {
        let mut pool = Mempool::new();
        pool.add(tx(1));
        pool.drain();
        assert_eq!(pool.add(tx(2)), 0);
    }

    #[test]
    fn duplicates_are_allowed() {
        let mut pool = Mempool::new();
        pool.add(tx(5));
        pool.add(tx(5));
        assert_eq!(pool.len(), 2);
    }
}
