use actix_web::{HttpResponse, Responder, get};

#[get("/api/v1/health/")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("Node is up and mining-ready 🦀")
}
