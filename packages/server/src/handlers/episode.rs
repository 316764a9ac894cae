use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::episode;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::episode::*;
use crate::models::shared::new_id;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/episodes",
    tag = "Episodes",
    operation_id = "listEpisodes",
    summary = "List all episodes",
    description = "Returns every episode ordered by episode number. Public.",
    responses(
        (status = 200, description = "All episodes", body = Vec<EpisodeResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_episodes(
    State(state): State<AppState>,
) -> Result<Json<Vec<EpisodeResponse>>, AppError> {
    let rows = episode::Entity::find()
        .order_by_asc(episode::Column::Number)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/episodes",
    tag = "Episodes",
    operation_id = "addEpisode",
    summary = "Create an episode",
    request_body = EpisodeRequest,
    responses(
        (status = 201, description = "Episode created", body = EpisodeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(number = payload.number))]
pub async fn add_episode(
    State(state): State<AppState>,
    AppJson(payload): AppJson<EpisodeRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_episode_request(&payload)?;

    let model = episode::ActiveModel {
        id: Set(new_id()),
        number: Set(payload.number),
        title: Set(payload.title),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(EpisodeResponse::from(model))))
}

#[utoipa::path(
    delete,
    path = "/episodes/{id}",
    tag = "Episodes",
    operation_id = "removeEpisode",
    summary = "Delete an episode",
    description = "Deletes the episode and returns it as it was. Fails while assignments or bangers still reference it.",
    params(("id" = String, Path, description = "Episode ID")),
    responses(
        (status = 200, description = "Episode deleted", body = EpisodeResponse),
        (status = 404, description = "Episode not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Still referenced (CONSTRAINT_VIOLATION)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn remove_episode(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EpisodeResponse>, AppError> {
    let txn = state.db.begin().await?;

    let existing = episode::Entity::find_by_id(id.as_str())
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Episode '{id}' not found")))?;
    episode::Entity::delete_by_id(id.as_str()).exec(&txn).await?;

    txn.commit().await?;
    Ok(Json(existing.into()))
}
