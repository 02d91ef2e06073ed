use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;

/// Health check endpoint for load balancers. The service holds no state
/// and makes its upstream call lazily, so healthy means the process is up.
#[get("")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "comick-rss"
    }))
}

/// Liveness check - simple check to see if the app is alive
#[get("/live")]
pub async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn routes() -> actix_web::Scope {
    web::scope("/health")
        .service(health_check)
        .service(liveness_check)
}
