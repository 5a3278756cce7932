use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{errors::AppError, use_cases::extractors::AdminClaims, AppState};

#[instrument(skip(admin, state))]
pub async fn admin_dashboard(
    admin: AdminClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let summary = state.dashboard_handler.summary().await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Welcome, {}", admin.0.email),
        "counts": summary.counts,
        "recent_activity": summary.recent_activity,
    })))
}
