use actix_web::{HttpResponse, Responder, get, post, web};
use log::debug;

use super::models::{AppState, MempoolResponse, NewTxRequest, NewTxResponse};
use crate::transaction::Transaction;

/// Submit a new transaction into the mempool.
///
/// No validation beyond structural presence: amounts, duplicate sends and
/// self-payments are all accepted in this design. Responds 201 with the
/// index of the block the transaction will eventually belong to.
#[post("/transactions/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> impl Responder {
    if body.sender.is_empty() || body.recipient.is_empty() {
        return HttpResponse::BadRequest().body("sender and recipient are required");
    }

    let tx = Transaction {
        sender: body.sender.clone(),
        recipient: body.recipient.clone(),
        amount: body.amount,
    };

    let block_index = {
        let bc = state.blockchain.lock().expect("mutex poisoned");
        bc.last_block().index + 1
    };
    let position = {
        let mut pool = state.mempool.lock().expect("mutex poisoned");
        pool.add(tx)
    };
    debug!(
        "TX - queued {} -> {} ({}) at position {} for block {}",
        body.sender, body.recipient, body.amount, position, block_index
    );

    HttpResponse::Created().json(NewTxResponse {
        message: format!("Transaction will be added to block {block_index}"),
        block_index,
    })
}

/// List the current mempool.
#[get("/mempool/")]
pub async fn get_mempool(state: web::Data<AppState>) -> impl Responder {
    let pool = state.mempool.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(MempoolResponse {
        size: pool.len(),
        transactions: pool.pending().to_vec(),
    })
}
