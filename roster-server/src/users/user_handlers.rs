//! User CRUD and lifecycle endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use roster_core::{CreateUserRequest, UpdateUserRequest, UserDto};

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// List every user in presentation shape.
pub async fn list_users_handler(State(state): State<AppState>) -> AppResult<Json<Vec<UserDto>>> {
    let users = state.service.list().await?;
    Ok(Json(users))
}

/// Fetch one user by mail.
pub async fn get_user_by_mail_handler(
    State(state): State<AppState>,
    Path(mail): Path<String>,
) -> AppResult<Json<UserDto>> {
    let user = state.service.get_by_mail(&mail).await?;
    Ok(Json(user))
}

/// Create a user. New users always start deactivated.
pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> AppResult<Json<UserDto>> {
    let user = state.service.create(request).await?;
    Ok(Json(user))
}

/// Overwrite the name fields of the user with the given mail.
pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(mail): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> AppResult<Json<UserDto>> {
    let user = state.service.update(&mail, request).await?;
    Ok(Json(user))
}

/// Deactivate the user with the given id.
pub async fn deactivate_user_handler(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_user_id(&identifier)?;
    state.service.deactivate(id).await?;
    Ok(StatusCode::OK)
}

/// Activate the user with the given id.
///
/// The trailing path segment is accepted for wire compatibility but not
/// interpreted; this endpoint always activates.
pub async fn activate_user_handler(
    State(state): State<AppState>,
    Path((identifier, _segment)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let id = parse_user_id(&identifier)?;
    state.service.activate(id).await?;
    Ok(StatusCode::OK)
}

/// Delete the user with the given id.
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_user_id(&identifier)?;
    state.service.delete(id).await?;
    Ok(StatusCode::OK)
}

fn parse_user_id(identifier: &str) -> Result<i64, AppError> {
    identifier
        .parse()
        .map_err(|_| AppError::bad_request(format!("invalid user id: {identifier}")))
}
