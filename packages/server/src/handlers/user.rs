use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::shared::new_id;
use crate::models::user::*;
use crate::state::AppState;

use super::not_found_if_unmatched;

/// Batch-load users for a join, keyed by ID. Duplicate and missing IDs are fine.
pub(crate) async fn users_by_id<C, I>(db: &C, ids: I) -> Result<HashMap<String, user::Model>, DbErr>
where
    C: ConnectionTrait,
    I: IntoIterator<Item = String>,
{
    let mut ids: Vec<String> = ids.into_iter().collect();
    ids.sort();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let users = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(users.into_iter().map(|u| (u.id.clone(), u)).collect())
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Users",
    operation_id = "listUsers",
    summary = "List all users",
    description = "Returns every user ordered by name.",
    responses(
        (status = 200, description = "All users", body = Vec<UserResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let rows = user::Entity::find()
        .order_by_asc(user::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    operation_id = "getUser",
    summary = "Get a user by ID",
    description = "Returns the user, or `null` when no user has this ID.",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "The user, or null", body = Option<UserResponse>),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<UserResponse>>, AppError> {
    let model = user::Entity::find_by_id(id).one(&state.db).await?;
    Ok(Json(model.map(Into::into)))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Users",
    operation_id = "addUser",
    summary = "Create a user",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "E-mail already registered (CONSTRAINT_VIOLATION)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn add_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<UserRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_user_request(&payload)?;

    let new_user = user::ActiveModel {
        id: Set(new_id()),
        name: Set(payload.name),
        email: Set(payload.email),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let model = new_user.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Users",
    operation_id = "updateUser",
    summary = "Replace a user's name and e-mail",
    params(("id" = String, Path, description = "User ID")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "E-mail already registered (CONSTRAINT_VIOLATION)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    validate_user_request(&payload)?;

    let active = user::ActiveModel {
        id: ActiveValue::Unchanged(id.clone()),
        name: Set(payload.name),
        email: Set(payload.email),
        ..Default::default()
    };
    let model = active
        .update(&state.db)
        .await
        .map_err(not_found_if_unmatched("User", &id))?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Users",
    operation_id = "removeUser",
    summary = "Delete a user",
    description = "Deletes the user and returns it as it was. Fails with 409 while assignments, bangers or reviews still reference the user.",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = UserResponse),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Still referenced (CONSTRAINT_VIOLATION)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn remove_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let txn = state.db.begin().await?;

    let existing = user::Entity::find_by_id(id.as_str())
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User '{id}' not found")))?;
    user::Entity::delete_by_id(id.as_str()).exec(&txn).await?;

    txn.commit().await?;
    Ok(Json(existing.into()))
}
