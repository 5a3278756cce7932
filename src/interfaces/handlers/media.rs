use actix_multipart::form::MultipartForm;
use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::media::MediaUpload,
    errors::AppError,
    handlers::query::DeleteQuery,
    use_cases::extractors::AdminClaims,
    AppState,
};

#[instrument(skip(_claims, state))]
pub async fn list_media(
    _claims: AdminClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let objects = state.media_handler.list_media().await?;
    Ok(HttpResponse::Ok().json(objects))
}

#[instrument(skip(_claims, state, form))]
pub async fn upload_media(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    form: MultipartForm<MediaUpload>,
) -> Result<impl Responder, AppError> {
    let form = form.into_inner();
    let max = state.media_handler.max_upload_bytes;
    if form.file.size > max {
        return Err(AppError::PayloadTooLarge(max));
    }

    let bytes = tokio::fs::read(form.file.file.path())
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to read upload: {}", e)))?;

    let uploaded = state
        .media_handler
        .upload_media(form.file.file_name.as_deref(), bytes)
        .await?;
    Ok(HttpResponse::Created().json(uploaded))
}

#[instrument(skip(_claims, state, query))]
pub async fn delete_media(
    _claims: AdminClaims,
    name: web::Path<String>,
    state: web::Data<AppState>,
    query: web::Query<DeleteQuery>,
) -> Result<impl Responder, AppError> {
    state.media_handler.delete_media(&name, query.confirmed()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(_claims, state))]
pub async fn media_url(
    _claims: AdminClaims,
    name: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let url = state.media_handler.public_url(&name)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "name": name.into_inner(), "public_url": url })))
}
