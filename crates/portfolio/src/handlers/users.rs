use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use portfolio_auth::CurrentUser;
use portfolio_core::portfolio::{ChangePasswordRequest, UpdateUserRequest, User, UserKey};

use crate::{
    handlers::{error::Forbidden, AppError},
    state::AppState,
};

/// List all users without password hashes (GET /api/v1/users).
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = state.service.read_users().await?;
    Ok(Json(users))
}

/// Get a single user by ID or email (GET /api/v1/users/{key}).
pub async fn get_user(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<User>, AppError> {
    let user = state.service.resolve_user(&UserKey::parse(&key)).await?;
    Ok(Json(user))
}

/// Replace a user's profile (PUT /api/v1/users/{id}).
///
/// Password hash and project summaries are kept from the stored record.
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    let current = state.service.read_user(id).await?;
    let user = state.service.update_user(payload.apply_to(current)).await?;

    tracing::info!(user_id = %id, caller = %identity.user_id, "Updated user");

    Ok(Json(user))
}

/// Change the caller's own password (PUT /api/v1/users/{id}/password).
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    if identity.user_id != id {
        tracing::debug!(user_id = %id, caller = %identity.user_id, "Password change for another user");
        return Err(Forbidden.into());
    }

    state
        .auth
        .manager
        .change_password(id, &payload.current_password, payload.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a user and every project they own (DELETE /api/v1/users/{key}).
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(key): Path<String>,
) -> Result<StatusCode, AppError> {
    let key = UserKey::parse(&key);
    state.service.delete_user(&key).await?;

    tracing::info!(user = %key, caller = %identity.user_id, "Deleted user");

    Ok(StatusCode::NO_CONTENT)
}
