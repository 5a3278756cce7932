use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use validator::Validate;

use crate::entities::token::RefreshTokenRequest;
use crate::entities::user::{LoginUser, PasswordResetConfirm, PasswordResetRequest};
use crate::errors::AppError;
use crate::use_cases::extractors::AuthClaims;
use crate::AppState;

#[instrument(skip(state, user), fields(email = %user.email))]
pub async fn login(
    state: web::Data<AppState>,
    user: web::Json<LoginUser>,
) -> Result<impl Responder, actix_web::Error> {
    let user = user.into_inner();
    user.validate().map_err(AppError::from)?;

    let auth_response = state.auth_handler.login(user).await?;
    Ok(HttpResponse::Ok().json(auth_response))
}

#[instrument(skip(state, request))]
pub async fn refresh_token(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<impl Responder, actix_web::Error> {
    let auth_response = state.auth_handler.refresh_token(&request.refresh_token).await?;
    Ok(HttpResponse::Ok().json(auth_response))
}

#[instrument(skip(state, claims))]
pub async fn session(
    claims: AuthClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, actix_web::Error> {
    let session = state.auth_handler.session(&claims.0).await?;
    Ok(HttpResponse::Ok().json(session))
}

/// Sessions are stateless; the client drops its tokens.
#[instrument(skip(claims))]
pub async fn logout(claims: AuthClaims) -> impl Responder {
    tracing::info!(user_id = %claims.0.sub, "User logged out");
    HttpResponse::Ok().json(serde_json::json!({ "message": "Logged out successfully" }))
}

#[instrument(skip(state, request))]
pub async fn request_password_reset(
    state: web::Data<AppState>,
    request: web::Json<PasswordResetRequest>,
) -> Result<impl Responder, AppError> {
    state.auth_handler.request_password_reset(request.into_inner()).await?;
    Ok(HttpResponse::Accepted().json(serde_json::json!({
        "message": "If that address has an account, a reset link is on its way"
    })))
}

#[instrument(skip(state, request))]
pub async fn confirm_password_reset(
    state: web::Data<AppState>,
    request: web::Json<PasswordResetConfirm>,
) -> Result<impl Responder, AppError> {
    state.auth_handler.confirm_password_reset(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Password updated" })))
}
