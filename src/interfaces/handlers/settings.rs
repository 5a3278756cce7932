use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{entities::user::PasswordUpdate, errors::AppError, use_cases::extractors::AdminClaims, AppState};

#[instrument(skip(admin, state))]
pub async fn account(
    admin: AdminClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, actix_web::Error> {
    let user = state.auth_handler.account(&admin.0).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[instrument(skip(admin, state, update))]
pub async fn update_password(
    admin: AdminClaims,
    state: web::Data<AppState>,
    update: web::Json<PasswordUpdate>,
) -> Result<impl Responder, AppError> {
    state.auth_handler.update_password(&admin.0, update.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Password updated" })))
}
