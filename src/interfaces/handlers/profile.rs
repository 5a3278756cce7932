use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::{profile::ProfileForm, timeline::{ReorderRequest, TimelineForm}},
    errors::AppError,
    handlers::query::DeleteQuery,
    use_cases::extractors::AdminClaims,
    AppState,
};

#[instrument(skip(state))]
pub async fn public_profile(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let profile = state.profile_handler.public_profile().await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[instrument(skip(_claims, state))]
pub async fn get_profile(
    _claims: AdminClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let profile = state.profile_handler.get_profile().await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[instrument(skip(_claims, state, form))]
pub async fn update_profile(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    form: web::Json<ProfileForm>,
) -> Result<impl Responder, AppError> {
    let profile = state.profile_handler.update_profile(form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[instrument(skip(_claims, state))]
pub async fn list_timeline(
    _claims: AdminClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let events = state.profile_handler.list_timeline().await?;
    Ok(HttpResponse::Ok().json(events))
}

#[instrument(skip(_claims, state, form))]
pub async fn create_timeline_event(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    form: web::Json<TimelineForm>,
) -> Result<impl Responder, AppError> {
    let event = state.profile_handler.create_event(form.into_inner()).await?;
    Ok(HttpResponse::Created().json(event))
}

#[instrument(skip(_claims, state, form))]
pub async fn update_timeline_event(
    _claims: AdminClaims,
    event_id: web::Path<String>,
    state: web::Data<AppState>,
    form: web::Json<TimelineForm>,
) -> Result<impl Responder, AppError> {
    let event = state.profile_handler.update_event(&event_id, form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(event))
}

#[instrument(skip(_claims, state, query))]
pub async fn delete_timeline_event(
    _claims: AdminClaims,
    event_id: web::Path<String>,
    state: web::Data<AppState>,
    query: web::Query<DeleteQuery>,
) -> Result<impl Responder, AppError> {
    state.profile_handler.delete_event(&event_id, query.confirmed()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(_claims, state, body))]
pub async fn reorder_timeline(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    body: web::Json<ReorderRequest>,
) -> Result<impl Responder, AppError> {
    let events = state.profile_handler.reorder_timeline(&body.ids).await?;
    Ok(HttpResponse::Ok().json(events))
}
