use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use sea_orm::*;
use tracing::instrument;

use crate::entity::movie;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::movie::*;
use crate::models::shared::new_id;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Movies",
    operation_id = "listMovies",
    summary = "List all movies",
    description = "Returns every movie ordered by title. Public.",
    responses(
        (status = 200, description = "All movies", body = Vec<MovieResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_movies(
    State(state): State<AppState>,
) -> Result<Json<Vec<MovieResponse>>, AppError> {
    let rows = movie::Entity::find()
        .order_by_asc(movie::Column::Title)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Movies",
    operation_id = "getMovie",
    summary = "Get a movie by ID",
    description = "Returns the movie, or `null` when no movie has this ID. Public.",
    params(("id" = String, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "The movie, or null", body = Option<MovieResponse>),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<MovieResponse>>, AppError> {
    let model = movie::Entity::find_by_id(id).one(&state.db).await?;
    Ok(Json(model.map(Into::into)))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Movies",
    operation_id = "addMovie",
    summary = "Add or refresh a movie",
    description = "Creates the movie. When `url` matches a known movie, that movie is \
                   overwritten instead and keeps its ID.",
    request_body = MovieRequest,
    responses(
        (status = 201, description = "Movie created", body = MovieResponse),
        (status = 200, description = "Existing movie with this url updated", body = MovieResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(title = %payload.title))]
pub async fn add_movie(
    State(state): State<AppState>,
    AppJson(payload): AppJson<MovieRequest>,
) -> Result<(StatusCode, Json<MovieResponse>), AppError> {
    validate_movie_request(&payload)?;

    let txn = state.db.begin().await?;

    let existing = match payload.url.as_deref() {
        Some(url) => {
            movie::Entity::find()
                .filter(movie::Column::Url.eq(url))
                .one(&txn)
                .await?
        }
        None => None,
    };

    let mut active = movie::ActiveModel {
        title: Set(payload.title),
        year: Set(payload.year),
        poster: Set(payload.poster),
        url: Set(payload.url),
        ..Default::default()
    };
    let (status, model) = match existing {
        Some(found) => {
            tracing::debug!(id = %found.id, "Refreshing movie matched by url");
            active.id = ActiveValue::Unchanged(found.id);
            (StatusCode::OK, active.update(&txn).await?)
        }
        None => {
            active.id = Set(new_id());
            (StatusCode::CREATED, active.insert(&txn).await?)
        }
    };

    txn.commit().await?;
    Ok((status, Json(model.into())))
}
