use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::{project::ProjectForm, scroll::PublishRequest},
    errors::AppError,
    handlers::query::{DeleteQuery, ListQuery},
    use_cases::extractors::AdminClaims,
    AppState,
};

#[instrument(skip(_claims, state, query))]
pub async fn list_projects(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let projects = state.project_handler.list_projects(query.q.as_deref()).await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[instrument(skip(_claims, state))]
pub async fn get_project(
    _claims: AdminClaims,
    project_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.get_project(&project_id).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(_claims, state, form))]
pub async fn create_project(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    form: web::Json<ProjectForm>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.create_project(form.into_inner()).await?;
    Ok(HttpResponse::Created().json(project))
}

#[instrument(skip(_claims, state, form))]
pub async fn replace_project(
    _claims: AdminClaims,
    project_id: web::Path<String>,
    state: web::Data<AppState>,
    form: web::Json<ProjectForm>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.replace_project(&project_id, form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(_claims, state, body))]
pub async fn set_project_published(
    _claims: AdminClaims,
    project_id: web::Path<String>,
    state: web::Data<AppState>,
    body: web::Json<PublishRequest>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.set_published(&project_id, body.published).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(_claims, state, query))]
pub async fn delete_project(
    _claims: AdminClaims,
    project_id: web::Path<String>,
    state: web::Data<AppState>,
    query: web::Query<DeleteQuery>,
) -> Result<impl Responder, AppError> {
    state.project_handler.delete_project(&project_id, query.confirmed()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(state))]
pub async fn public_projects(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let projects = state.project_handler.public_projects().await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[instrument(skip(state))]
pub async fn public_project(
    slug: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.public_project(&slug).await?;
    Ok(HttpResponse::Ok().json(project))
}

/// Raw structured fields of every project, for inspecting stored JSON.
#[instrument(skip(_claims, state))]
pub async fn debug_projects(
    _claims: AdminClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let projects = state.project_handler.diagnostics().await.map_err(|e| {
        tracing::error!(error = %e, "Project diagnostics failed");
        e
    })?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "projects": projects })))
}
