use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{banger, episode};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::banger::*;
use crate::models::shared::{new_id, normalize_ref};
use crate::state::AppState;

use super::not_found_if_unmatched;
use super::user::users_by_id;

fn active_from_request(payload: BangerRequest) -> banger::ActiveModel {
    banger::ActiveModel {
        title: Set(payload.title),
        artist: Set(payload.artist),
        url: Set(payload.url),
        episode_id: Set(normalize_ref(payload.episode_id)),
        user_id: Set(normalize_ref(payload.user_id)),
        ..Default::default()
    }
}

/// Run `select` with the episode left-joined and attach each banger's user.
async fn find_with_joins(
    db: &DatabaseConnection,
    select: Select<banger::Entity>,
) -> Result<Vec<BangerResponse>, DbErr> {
    let rows = select.find_also_related(episode::Entity).all(db).await?;
    let users = users_by_id(db, rows.iter().filter_map(|(b, _)| b.user_id.clone())).await?;

    Ok(rows
        .into_iter()
        .map(|(b, ep)| {
            let user = b.user_id.as_ref().and_then(|id| users.get(id).cloned());
            BangerResponse::with_joins(b, ep, user)
        })
        .collect())
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Bangers",
    operation_id = "listBangers",
    summary = "List all bangers",
    description = "Returns every banger ordered by title, with its episode and user joined. Public.",
    responses(
        (status = 200, description = "All bangers", body = Vec<BangerResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_bangers(
    State(state): State<AppState>,
) -> Result<Json<Vec<BangerResponse>>, AppError> {
    let select = banger::Entity::find().order_by_asc(banger::Column::Title);
    Ok(Json(find_with_joins(&state.db, select).await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Bangers",
    operation_id = "getBanger",
    summary = "Get a banger by ID",
    description = "Returns the banger with its episode and user joined, or `null` when absent. Public.",
    params(("id" = String, Path, description = "Banger ID")),
    responses(
        (status = 200, description = "The banger, or null", body = Option<BangerResponse>),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_banger(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<BangerResponse>>, AppError> {
    let select = banger::Entity::find_by_id(id);
    let found = find_with_joins(&state.db, select).await?;
    Ok(Json(found.into_iter().next()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Bangers",
    operation_id = "addBanger",
    summary = "Create a banger",
    request_body = BangerRequest,
    responses(
        (status = 201, description = "Banger created", body = BangerResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 409, description = "Unknown episode or user (CONSTRAINT_VIOLATION)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id, title = %payload.title))]
pub async fn add_banger(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<BangerRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_banger_request(&payload)?;

    let mut active = active_from_request(payload);
    active.id = Set(new_id());
    active.created_at = Set(chrono::Utc::now());
    let model = active.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(BangerResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Bangers",
    operation_id = "updateBanger",
    summary = "Replace a banger",
    description = "Overwrites every writable field of the banger. The ID is taken from the path.",
    params(("id" = String, Path, description = "Banger ID")),
    request_body = BangerRequest,
    responses(
        (status = 200, description = "Banger updated", body = BangerResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Banger not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Unknown episode or user (CONSTRAINT_VIOLATION)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id, id))]
pub async fn update_banger(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<BangerRequest>,
) -> Result<Json<BangerResponse>, AppError> {
    validate_banger_request(&payload)?;

    let mut active = active_from_request(payload);
    active.id = ActiveValue::Unchanged(id.clone());
    let model = active
        .update(&state.db)
        .await
        .map_err(not_found_if_unmatched("Banger", &id))?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Bangers",
    operation_id = "removeBanger",
    summary = "Delete a banger",
    description = "Deletes the banger and returns it as it was.",
    params(("id" = String, Path, description = "Banger ID")),
    responses(
        (status = 200, description = "Banger deleted", body = BangerResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Banger not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id, id))]
pub async fn remove_banger(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BangerResponse>, AppError> {
    let txn = state.db.begin().await?;

    let existing = banger::Entity::find_by_id(id.as_str())
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Banger '{id}' not found")))?;
    banger::Entity::delete_by_id(id.as_str()).exec(&txn).await?;

    txn.commit().await?;
    Ok(Json(existing.into()))
}
