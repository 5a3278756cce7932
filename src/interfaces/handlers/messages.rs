use actix_web::{web, HttpRequest, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::message::{AppointmentForm, ContactForm, DemoRequestForm, ReplyRequest},
    errors::AppError,
    handlers::query::{DeleteQuery, ListQuery},
    use_cases::extractors::AdminClaims,
    utils::get_client_ip::get_client_ip,
    AppState,
};

/// Per-client budget shared by every public submission route.
pub(crate) fn check_rate_limit(req: &HttpRequest, state: &AppState) -> Result<(), AppError> {
    let client = get_client_ip(req, state.config.trust_x_forwarded_for);
    state.submission_limiter.check(&client)
}

#[instrument(skip(req, state, form))]
pub async fn submit_contact(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Json<ContactForm>,
) -> Result<impl Responder, AppError> {
    check_rate_limit(&req, &state)?;
    let response = state.message_handler.submit_contact(form.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(req, state, form))]
pub async fn submit_appointment(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Json<AppointmentForm>,
) -> Result<impl Responder, AppError> {
    check_rate_limit(&req, &state)?;
    let response = state.message_handler.submit_appointment(form.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(req, state, form))]
pub async fn submit_demo(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Json<DemoRequestForm>,
) -> Result<impl Responder, AppError> {
    check_rate_limit(&req, &state)?;
    let response = state.message_handler.submit_demo(form.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(_claims, state, query))]
pub async fn list_messages(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let messages = state.message_handler.list_messages(query.q.as_deref()).await?;
    Ok(HttpResponse::Ok().json(messages))
}

#[instrument(skip(_claims, state))]
pub async fn get_message(
    _claims: AdminClaims,
    message_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let message = state.message_handler.get_message(&message_id).await?;
    Ok(HttpResponse::Ok().json(message))
}

#[instrument(skip(_claims, state, query))]
pub async fn delete_message(
    _claims: AdminClaims,
    message_id: web::Path<String>,
    state: web::Data<AppState>,
    query: web::Query<DeleteQuery>,
) -> Result<impl Responder, AppError> {
    state.message_handler.delete_message(&message_id, query.confirmed()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(_claims, state, body))]
pub async fn reply_to_message(
    _claims: AdminClaims,
    message_id: web::Path<String>,
    state: web::Data<AppState>,
    body: web::Json<ReplyRequest>,
) -> Result<impl Responder, AppError> {
    state.message_handler.reply(&message_id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}
