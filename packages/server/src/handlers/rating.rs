use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::rating;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::rating::*;
use crate::models::shared::new_id;
use crate::state::AppState;

use super::not_found_if_unmatched;

fn active_from_request(payload: RatingRequest) -> rating::ActiveModel {
    rating::ActiveModel {
        name: Set(payload.name),
        value: Set(payload.value),
        sound: Set(payload.sound),
        icon: Set(payload.icon),
        category: Set(payload.category),
        ..Default::default()
    }
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Ratings",
    operation_id = "listRatings",
    summary = "List all ratings",
    description = "Returns every rating, highest value first. Public.",
    responses(
        (status = 200, description = "All ratings", body = Vec<RatingResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_ratings(
    State(state): State<AppState>,
) -> Result<Json<Vec<RatingResponse>>, AppError> {
    let rows = rating::Entity::find()
        .order_by_desc(rating::Column::Value)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Ratings",
    operation_id = "getRating",
    summary = "Get a rating by ID",
    description = "Returns the rating, or `null` when no rating has this ID. Public.",
    params(("id" = String, Path, description = "Rating ID")),
    responses(
        (status = 200, description = "The rating, or null", body = Option<RatingResponse>),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_rating(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<RatingResponse>>, AppError> {
    let model = rating::Entity::find_by_id(id).one(&state.db).await?;
    Ok(Json(model.map(Into::into)))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Ratings",
    operation_id = "addRating",
    summary = "Create a rating",
    request_body = RatingRequest,
    responses(
        (status = 201, description = "Rating created", body = RatingResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 409, description = "Constraint violated (CONSTRAINT_VIOLATION)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id, name = %payload.name))]
pub async fn add_rating(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<RatingRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_rating_request(&payload)?;

    let mut active = active_from_request(payload);
    active.id = Set(new_id());
    let model = active.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(RatingResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Ratings",
    operation_id = "updateRating",
    summary = "Replace a rating",
    description = "Overwrites every writable field of the rating. The ID is taken from the path.",
    params(("id" = String, Path, description = "Rating ID")),
    request_body = RatingRequest,
    responses(
        (status = 200, description = "Rating updated", body = RatingResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Rating not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id, id))]
pub async fn update_rating(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<RatingRequest>,
) -> Result<Json<RatingResponse>, AppError> {
    validate_rating_request(&payload)?;

    let mut active = active_from_request(payload);
    active.id = ActiveValue::Unchanged(id.clone());
    let model = active
        .update(&state.db)
        .await
        .map_err(not_found_if_unmatched("Rating", &id))?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Ratings",
    operation_id = "removeRating",
    summary = "Delete a rating",
    description = "Deletes the rating and returns it as it was.",
    params(("id" = String, Path, description = "Rating ID")),
    responses(
        (status = 200, description = "Rating deleted", body = RatingResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Rating not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Still referenced by reviews (CONSTRAINT_VIOLATION)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id, id))]
pub async fn remove_rating(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RatingResponse>, AppError> {
    let txn = state.db.begin().await?;

    let existing = rating::Entity::find_by_id(id.as_str())
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Rating '{id}' not found")))?;
    rating::Entity::delete_by_id(id.as_str()).exec(&txn).await?;

    txn.commit().await?;
    Ok(Json(existing.into()))
}
