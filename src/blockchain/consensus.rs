//! Longest-valid-chain conflict resolution.
//!
//! Every node mines independently, so two nodes can forge conflicting
//! blocks at the same height. There is no leader: the rule that keeps the
//! network convergent is simply "the longest chain that passes full
//! validation wins". The resolver is a pure function over snapshots; the
//! transport layer fetches candidate chains and applies the swap.

use log::debug;

use super::{Block, Blockchain};

/// Outcome of a consensus round.
#[derive(Debug)]
pub struct Resolution {
    /// The authoritative chain after the round.
    pub chain: Vec<Block>,
    /// Whether the local chain lost to a peer's.
    pub replaced: bool,
}

/// Pick the longest valid chain among the local chain and the candidates.
///
/// A candidate is only considered if it is strictly longer than the best
/// chain seen so far AND passes full validation; invalid candidates are
/// skipped silently. Ties keep the local chain, so a round with no
/// candidates (or only invalid ones) is a no-op. Scan order cannot affect
/// the result: only length and validity matter, and `>` is transitive.
pub fn resolve(local: &[Block], candidates: &[Vec<Block>], difficulty: u32) -> Resolution {
    let mut best: Option<&Vec<Block>> = None;
    let mut best_len = local.len();

    for candidate in candidates {
        if candidate.len() <= best_len {
            debug!(
                "CONSENSUS - skipping candidate of length {} (best so far: {})",
                candidate.len(),
                best_len
            );
            continue;
        }
        if !Blockchain::is_valid_chain(candidate, difficulty) {
            debug!(
                "CONSENSUS - skipping invalid candidate of length {}",
                candidate.len()
            );
            continue;
        }
        best_len = candidate.len();
        best = Some(candidate);
    }

    match best {
        Some(chain) => Resolution {
            chain: chain.clone(),
            replaced: true,
        },
        None => Resolution {
            chain: local.to_vec(),
            replaced: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::resolve;
    use crate::blockchain::{pow, Block, Blockchain};
    use std::sync::atomic::AtomicBool;

    const TEST_DIFFICULTY: u32 = 2;

    fn mined_chain(blocks: usize) -> Vec<Block> {
        let cancel = AtomicBool::new(false);
        let mut bc = Blockchain::new(TEST_DIFFICULTY);
        for _ in 0..blocks {
            let proof = pow::search(bc.last_block().proof, TEST_DIFFICULTY, &cancel)
                .expect("not cancelled");
            bc.append(vec![], proof).expect("verified proof");
        }
        bc.chain
    }

    #[test]
    fn no_candidates_keeps_local() {
        let local = mined_chain(1);
        let res = resolve(&local, &[], TEST_DIFFICULTY);
        assert!(!res.replaced);
        assert_eq!(res.chain.len(), local.len());
    }

    #[test]
    fn shorter_and_equal_candidates_keep_local() {
        let local = mined_chain(2);
        let candidates = vec![mined_chain(1), mined_chain(2)];
        let res = resolve(&local, &candidates, TEST_DIFFICULTY);
        assert!(!res.replaced);
        assert_eq!(res.chain.len(), 3);
    }

    #[test]
    fn longer_valid_candidate_wins() {
        // Two nodes mined from the same genesis; one got further ahead.
        let local = mined_chain(1);
        let longer = mined_chain(2);
        let res = resolve(&local, &[longer.clone()], TEST_DIFFICULTY);
        assert!(res.replaced);
        assert_eq!(res.chain.len(), 3);
        assert_eq!(res.chain.last().unwrap().proof, longer.last().unwrap().proof);
    }

    #[test]
    fn longest_among_several_valid_candidates_wins() {
        let local = mined_chain(0);
        let candidates = vec![mined_chain(1), mined_chain(3), mined_chain(2)];
        let res = resolve(&local, &candidates, TEST_DIFFICULTY);
        assert!(res.replaced);
        assert_eq!(res.chain.len(), 4);
    }

    #[test]
    fn longer_invalid_candidate_loses_to_shorter_valid_one() {
        let local = mined_chain(0);
        let mut forged = mined_chain(3);
        forged[2].proof += 1; // break the proof link
        let honest = mined_chain(1);
        let res = resolve(&local, &[forged, honest], TEST_DIFFICULTY);
        assert!(res.replaced);
        assert_eq!(res.chain.len(), 2);
    }

    #[test]
    fn only_invalid_candidates_keep_local() {
        let local = mined_chain(1);
        let mut forged = mined_chain(3);
        forged[1].transactions.push(crate::transaction::Transaction {
            sender: "0".into(),
            recipient: "eve".into(),
            amount: 1_000_000,
        });
        let res = resolve(&local, &[forged], TEST_DIFFICULTY);
        assert!(!res.replaced);
        assert_eq!(res.chain.len(), 2);
    }

    #[test]
    fn scan_order_does_not_matter() {
        let local = mined_chain(0);
        let a = mined_chain(2);
        let b = mined_chain(3);
        let fwd = resolve(&local, &[a.clone(), b.clone()], TEST_DIFFICULTY);
        let rev = resolve(&local, &[b, a], TEST_DIFFICULTY);
        assert_eq!(fwd.chain.len(), rev.chain.len());
        assert!(fwd.replaced && rev.replaced);
    }
}
