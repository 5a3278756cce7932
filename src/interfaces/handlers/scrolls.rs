use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::scroll::{PublishRequest, ScrollForm},
    errors::AppError,
    handlers::query::{CategoryQuery, DeleteQuery, ListQuery},
    use_cases::extractors::AdminClaims,
    AppState,
};

#[instrument(skip(_claims, state, query))]
pub async fn list_scrolls(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let scrolls = state.scroll_handler.list_scrolls(query.q.as_deref()).await?;
    Ok(HttpResponse::Ok().json(scrolls))
}

#[instrument(skip(_claims, state))]
pub async fn get_scroll(
    _claims: AdminClaims,
    scroll_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let scroll = state.scroll_handler.get_scroll(&scroll_id).await?;
    Ok(HttpResponse::Ok().json(scroll))
}

#[instrument(skip(_claims, state, form))]
pub async fn create_scroll(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    form: web::Json<ScrollForm>,
) -> Result<impl Responder, AppError> {
    let scroll = state.scroll_handler.create_scroll(form.into_inner()).await?;
    Ok(HttpResponse::Created().json(scroll))
}

#[instrument(skip(_claims, state, form))]
pub async fn replace_scroll(
    _claims: AdminClaims,
    scroll_id: web::Path<String>,
    state: web::Data<AppState>,
    form: web::Json<ScrollForm>,
) -> Result<impl Responder, AppError> {
    let scroll = state.scroll_handler.replace_scroll(&scroll_id, form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(scroll))
}

#[instrument(skip(_claims, state, body))]
pub async fn set_scroll_published(
    _claims: AdminClaims,
    scroll_id: web::Path<String>,
    state: web::Data<AppState>,
    body: web::Json<PublishRequest>,
) -> Result<impl Responder, AppError> {
    let scroll = state.scroll_handler.set_published(&scroll_id, body.published).await?;
    Ok(HttpResponse::Ok().json(scroll))
}

#[instrument(skip(_claims, state, query))]
pub async fn delete_scroll(
    _claims: AdminClaims,
    scroll_id: web::Path<String>,
    state: web::Data<AppState>,
    query: web::Query<DeleteQuery>,
) -> Result<impl Responder, AppError> {
    state.scroll_handler.delete_scroll(&scroll_id, query.confirmed()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(state, query))]
pub async fn public_scrolls(
    state: web::Data<AppState>,
    query: web::Query<CategoryQuery>,
) -> Result<impl Responder, AppError> {
    let scrolls = state.scroll_handler.public_scrolls(query.category()?).await?;
    Ok(HttpResponse::Ok().json(scrolls))
}

#[instrument(skip(state))]
pub async fn public_scroll(
    slug: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let scroll = state.scroll_handler.public_scroll(&slug).await?;
    Ok(HttpResponse::Ok().json(scroll))
}
