use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use portfolio_auth::CurrentUser;
use portfolio_core::portfolio::{CreateProjectRequest, Project, UpdateProjectRequest, UserKey};

use crate::{handlers::AppError, state::AppState};

/// List all projects (GET /api/v1/projects).
pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<Project>>, AppError> {
    let projects = state.service.read_projects().await?;
    Ok(Json(projects))
}

/// Get a single project (GET /api/v1/projects/{id}).
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, AppError> {
    let project = state.service.read_project(id).await?;
    Ok(Json(project))
}

/// Create a project owned by the caller (POST /api/v1/projects).
pub async fn create_project(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    let draft = payload.into_draft(UserKey::Id(identity.user_id));
    let project = state.service.create_project(draft).await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// Replace a project's editable fields (PUT /api/v1/projects/{id}).
pub async fn update_project(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProjectRequest>,
) -> Result<Json<Project>, AppError> {
    let current = state.service.read_project(id).await?;
    let project = state.service.update_project(payload.apply_to(current)).await?;

    tracing::info!(project_id = %id, caller = %identity.user_id, "Updated project");

    Ok(Json(project))
}

/// Delete a project and unlink it from its owner (DELETE /api/v1/projects/{id}).
pub async fn delete_project(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.service.delete_project(id).await?;

    tracing::info!(project_id = %id, caller = %identity.user_id, "Deleted project");

    Ok(StatusCode::NO_CONTENT)
}
