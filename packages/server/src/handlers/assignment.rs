use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{assignment, episode, movie, rating, review};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::assignment::*;
use crate::models::shared::new_id;
use crate::state::AppState;

use super::not_found_if_unmatched;
use super::user::users_by_id;

fn active_from_request(payload: AssignmentRequest) -> assignment::ActiveModel {
    assignment::ActiveModel {
        user_id: Set(payload.user_id),
        movie_id: Set(payload.movie_id),
        episode_id: Set(payload.episode_id),
        homework: Set(payload.homework),
        ..Default::default()
    }
}

#[utoipa::path(
    get,
    path = "/assignments",
    tag = "Assignments",
    operation_id = "listAssignments",
    summary = "List all assignments",
    description = "Returns every assignment in creation order, without joins. Public.",
    responses(
        (status = 200, description = "All assignments", body = Vec<AssignmentResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_assignments(
    State(state): State<AppState>,
) -> Result<Json<Vec<AssignmentResponse>>, AppError> {
    let rows = assignment::Entity::find()
        .order_by_asc(assignment::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/assignments/{id}",
    tag = "Assignments",
    operation_id = "getAssignment",
    summary = "Get an assignment by ID",
    description = "Returns the assignment with its episode joined, or `null` when absent. Public.",
    params(("id" = String, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "The assignment, or null", body = Option<AssignmentWithEpisode>),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_assignment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<AssignmentWithEpisode>>, AppError> {
    let found = assignment::Entity::find_by_id(id)
        .find_also_related(episode::Entity)
        .one(&state.db)
        .await?;

    Ok(Json(found.map(|(a, ep)| AssignmentWithEpisode::new(a, ep))))
}

#[utoipa::path(
    get,
    path = "/episodes/{episode_id}/assignments",
    tag = "Assignments",
    operation_id = "getAssignmentsForEpisode",
    summary = "List the assignments of an episode",
    description = "Returns the episode's assignments with movie, user and reviews (each with reviewer and rating) joined. An unknown episode yields an empty list. Public.",
    params(("episode_id" = String, Path, description = "Episode ID")),
    responses(
        (status = 200, description = "Assignments of the episode", body = Vec<AssignmentDetail>),
    ),
)]
#[instrument(skip(state), fields(episode_id))]
pub async fn get_assignments_for_episode(
    State(state): State<AppState>,
    Path(episode_id): Path<String>,
) -> Result<Json<Vec<AssignmentDetail>>, AppError> {
    let db = &state.db;

    let rows = assignment::Entity::find()
        .filter(assignment::Column::EpisodeId.eq(episode_id))
        .order_by_asc(assignment::Column::CreatedAt)
        .find_also_related(movie::Entity)
        .all(db)
        .await?;
    if rows.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let assignment_ids: Vec<String> = rows.iter().map(|(a, _)| a.id.clone()).collect();
    let reviews = review::Entity::find()
        .filter(review::Column::AssignmentId.is_in(assignment_ids))
        .order_by_asc(review::Column::CreatedAt)
        .find_also_related(rating::Entity)
        .all(db)
        .await?;

    let user_ids = rows
        .iter()
        .map(|(a, _)| a.user_id.clone())
        .chain(reviews.iter().map(|(r, _)| r.user_id.clone()));
    let users = users_by_id(db, user_ids).await?;

    let mut reviews_by_assignment: HashMap<String, Vec<ReviewDetail>> = HashMap::new();
    for (r, rating) in reviews {
        let reviewer = users.get(&r.user_id).cloned();
        reviews_by_assignment
            .entry(r.assignment_id.clone())
            .or_default()
            .push(ReviewDetail::new(r, reviewer, rating));
    }

    let details = rows
        .into_iter()
        .map(|(a, movie)| {
            let user = users.get(&a.user_id).cloned();
            let reviews = reviews_by_assignment.remove(&a.id).unwrap_or_default();
            AssignmentDetail::new(a, movie, user, reviews)
        })
        .collect();

    Ok(Json(details))
}

#[utoipa::path(
    post,
    path = "/assignments",
    tag = "Assignments",
    operation_id = "addAssignment",
    summary = "Assign a movie to a host for an episode",
    request_body = AssignmentRequest,
    responses(
        (status = 201, description = "Assignment created", body = AssignmentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 409, description = "Unknown user, movie or episode (CONSTRAINT_VIOLATION)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id, episode_id = %payload.episode_id))]
pub async fn add_assignment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<AssignmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_assignment_request(&payload)?;

    let mut active = active_from_request(payload);
    active.id = Set(new_id());
    active.created_at = Set(chrono::Utc::now());
    let model = active.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(AssignmentResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/assignments/{id}",
    tag = "Assignments",
    operation_id = "updateAssignment",
    summary = "Replace an assignment",
    description = "Overwrites user, movie, episode and homework flag. The ID is taken from the path.",
    params(("id" = String, Path, description = "Assignment ID")),
    request_body = AssignmentRequest,
    responses(
        (status = 200, description = "Assignment updated", body = AssignmentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Assignment not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Unknown user, movie or episode (CONSTRAINT_VIOLATION)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id, id))]
pub async fn update_assignment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<AssignmentRequest>,
) -> Result<Json<AssignmentResponse>, AppError> {
    validate_assignment_request(&payload)?;

    let mut active = active_from_request(payload);
    active.id = ActiveValue::Unchanged(id.clone());
    let model = active
        .update(&state.db)
        .await
        .map_err(not_found_if_unmatched("Assignment", &id))?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/assignments/{id}/homework",
    tag = "Assignments",
    operation_id = "setAssignmentHomework",
    summary = "Mark or unmark an assignment as homework",
    params(("id" = String, Path, description = "Assignment ID")),
    request_body = SetHomeworkRequest,
    responses(
        (status = 200, description = "Assignment updated", body = AssignmentResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Assignment not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id, id, homework = payload.homework))]
pub async fn set_homework(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<SetHomeworkRequest>,
) -> Result<Json<AssignmentResponse>, AppError> {
    let active = assignment::ActiveModel {
        id: ActiveValue::Unchanged(id.clone()),
        homework: Set(payload.homework),
        ..Default::default()
    };
    let model = active
        .update(&state.db)
        .await
        .map_err(not_found_if_unmatched("Assignment", &id))?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/assignments/{id}",
    tag = "Assignments",
    operation_id = "removeAssignment",
    summary = "Delete an assignment",
    description = "Deletes the assignment and returns it as it was. Fails with 409 while reviews still reference it.",
    params(("id" = String, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment deleted", body = AssignmentResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Assignment not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Still referenced by reviews (CONSTRAINT_VIOLATION)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id, id))]
pub async fn remove_assignment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AssignmentResponse>, AppError> {
    let txn = state.db.begin().await?;

    let existing = assignment::Entity::find_by_id(id.as_str())
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Assignment '{id}' not found")))?;
    assignment::Entity::delete_by_id(id.as_str()).exec(&txn).await?;

    txn.commit().await?;
    Ok(Json(existing.into()))
}
