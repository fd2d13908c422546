use actix_web::{HttpResponse, Responder, post, web};
use log::{info, warn};
use std::sync::atomic::Ordering;

use super::models::{AppState, MineResponse};
use crate::blockchain::{pow, MINING_REWARD, MINING_SENDER};
use crate::transaction::Transaction;

/// Mine a new block:
/// - Snapshot the tip under a short lock
/// - Brute-force the proof on the blocking pool (cancellable)
/// - Re-check the tip, award the mining reward, drain the mempool, append
///
/// The search runs against a snapshot so transaction submissions and
/// chain fetches stay responsive. If consensus swapped the chain while we
/// were searching, the stale proof is discarded with a 409 rather than
/// appended onto a chain it no longer extends.
#[post("/mine/")]
pub async fn mine_block(state: web::Data<AppState>) -> impl Responder {
    let (last_index, last_proof, difficulty) = {
        let bc = state.blockchain.lock().expect("mutex poisoned");
        let last = bc.last_block();
        (last.index, last.proof, bc.difficulty())
    };

    let cancel = state.mining_cancel.clone();
    cancel.store(false, Ordering::Relaxed);

    info!("MINER - searching proof extending block #{last_index} (difficulty={difficulty})");
    let search = web::block(move || pow::search(last_proof, difficulty, &cancel)).await;

    let proof = match search {
        Ok(Some(proof)) => proof,
        Ok(None) => {
            warn!("MINER - search cancelled by a consensus replacement");
            return HttpResponse::Conflict().body("mining cancelled: chain was replaced");
        }
        Err(err) => {
            warn!("MINER - blocking task failed: {err}");
            return HttpResponse::InternalServerError().body("mining task failed");
        }
    };

    // Sanity check before touching the pool; a failure here would be an
    // internal-invariant violation and nothing may be appended.
    if !pow::verify(last_proof, proof, difficulty) {
        warn!("MINER - search produced an unverifiable proof {proof}");
        return HttpResponse::InternalServerError().body("search produced an invalid proof");
    }

    let mut bc = state.blockchain.lock().expect("mutex poisoned");

    // The tip may have moved while we were searching (another mine call or
    // a consensus swap). Our proof only extends the snapshot we took.
    let last = bc.last_block();
    if last.index != last_index || last.proof != last_proof {
        warn!(
            "MINER - discarding stale proof: tip moved from #{} to #{}",
            last_index, last.index
        );
        return HttpResponse::Conflict().body("stale proof: chain tip moved during search");
    }

    let transactions = {
        let mut pool = state.mempool.lock().expect("mutex poisoned");
        // The forging node earns one coin from the reserved mine address.
        pool.add(Transaction {
            sender: MINING_SENDER.to_string(),
            recipient: state.node_id.clone(),
            amount: MINING_REWARD,
        });
        pool.drain()
    };

    match bc.append(transactions, proof) {
        Ok(block) => {
            let block = block.clone();
            let resp = MineResponse {
                message: "New Block Forged".to_string(),
                block,
                length: bc.len(),
            };
            HttpResponse::Ok().json(resp)
        }
        Err(err) => {
            // Unreachable given the verify above; kept as a hard stop.
            warn!("MINER - append refused: {err}");
            HttpResponse::InternalServerError().body(err.to_string())
        }
    }
}
