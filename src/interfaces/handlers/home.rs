use actix_web::{get, HttpResponse, Responder};

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to the Portfolio Codex API!",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "public": "/api/public",
        "admin": "/api/admin"
    }))
}

/// Liveness only; the admin health endpoint checks dependencies.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
