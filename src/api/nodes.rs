use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};
use std::sync::atomic::Ordering;

use super::models::{
    AppState, NodesResponse, PeerChainResponse, RegisterNodesRequest, RegisterNodesResponse,
    ResolveResponse,
};
use crate::blockchain::consensus;
use crate::blockchain::Block;

/// Reduce a peer URL to its authority (`host:port`), which is how peers
/// are stored and dialed.
fn peer_authority(addr: &str) -> Option<String> {
    let url = reqwest::Url::parse(addr).ok()?;
    let host = url.host_str()?;
    match url.port_or_known_default() {
        Some(port) => Some(format!("{host}:{port}")),
        None => Some(host.to_string()),
    }
}

/// Register one or more peer node addresses.
#[post("/nodes/")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> impl Responder {
    if body.nodes.is_empty() {
        return HttpResponse::BadRequest().body("please supply a list of node URLs");
    }

    let mut parsed = Vec::with_capacity(body.nodes.len());
    for addr in &body.nodes {
        match peer_authority(addr) {
            Some(authority) => parsed.push(authority),
            None => {
                return HttpResponse::BadRequest().body(format!("invalid node URL: {addr}"));
            }
        }
    }

    let total = {
        let mut peers = state.peers.lock().expect("mutex poisoned");
        for authority in parsed {
            info!("NODES - registered peer {authority}");
            peers.insert(authority);
        }
        peers.len()
    };

    HttpResponse::Created().json(RegisterNodesResponse {
        message: "New nodes have been added".to_string(),
        total_nodes: total,
    })
}

/// List the known peers.
#[get("/nodes/")]
pub async fn list_nodes(state: web::Data<AppState>) -> impl Responder {
    let peers = state.peers.lock().expect("mutex poisoned");
    let mut nodes: Vec<String> = peers.iter().cloned().collect();
    nodes.sort();
    HttpResponse::Ok().json(NodesResponse { nodes })
}

/// Run one consensus round: fetch every peer's chain, keep the longest
/// valid one.
///
/// Unreachable or malformed peers are simply excluded as candidates, never
/// fatal; with no usable candidate the round degrades to "keep local".
/// All fetching happens before the chain lock is taken, so the resolver
/// itself works on snapshots and stays pure.
#[post("/nodes/resolve/")]
pub async fn resolve_conflicts(state: web::Data<AppState>) -> impl Responder {
    let peers: Vec<String> = {
        let peers = state.peers.lock().expect("mutex poisoned");
        peers.iter().cloned().collect()
    };

    let mut candidates: Vec<Vec<Block>> = Vec::with_capacity(peers.len());
    for peer in &peers {
        match fetch_peer_chain(peer).await {
            Ok(chain) => {
                info!("CONSENSUS - fetched {} blocks from {peer}", chain.len());
                candidates.push(chain);
            }
            Err(err) => {
                warn!("CONSENSUS - skipping unreachable peer {peer}: {err}");
            }
        }
    }

    let (resolution, length) = {
        let mut bc = state.blockchain.lock().expect("mutex poisoned");
        let resolution = consensus::resolve(&bc.chain, &candidates, bc.difficulty());
        if resolution.replaced {
            bc.replace(resolution.chain.clone());
            // Abort any in-flight proof search; it extends a dead tip.
            state.mining_cancel.store(true, Ordering::Relaxed);
        }
        let length = bc.len();
        (resolution, length)
    };

    let message = if resolution.replaced {
        "Our chain was replaced"
    } else {
        "Our chain is authoritative"
    };
    HttpResponse::Ok().json(ResolveResponse {
        message: message.to_string(),
        replaced: resolution.replaced,
        length,
        chain: resolution.chain,
    })
}

/// Fetch a peer's full chain via its public chain endpoint.
async fn fetch_peer_chain(peer: &str) -> Result<Vec<Block>, reqwest::Error> {
    let url = format!("http://{peer}/api/v1/chain/");
    let resp = reqwest::get(&url).await?.error_for_status()?;
    let body: PeerChainResponse = resp.json().await?;
    Ok(body.chain)
}
