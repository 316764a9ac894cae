use axum::Json;
use axum::extract::State;
use common::storage::PageRequest;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::query::AppQuery;
use crate::models::blob::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/containers",
    tag = "Blobs",
    operation_id = "listContainers",
    summary = "List storage containers",
    description = "Returns the name of every container in the configured storage account. Not paginated.",
    responses(
        (status = 200, description = "Container names", body = Vec<String>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 503, description = "Storage unreachable (STORAGE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state))]
pub async fn list_containers(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let names = state.blobs.list_containers().await?;
    Ok(Json(names))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Blobs",
    operation_id = "listBlobs",
    summary = "List one page of blobs in a container",
    description = "Fetches a single page (1-100 items, default 20) starting at `continuation_token`. Pass the returned `next_continuation_token` back to get the next page; it is omitted once the listing is exhausted.",
    params(ListBlobsQuery),
    responses(
        (status = 200, description = "One page of blobs", body = BlobPage),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Container not found (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "Storage unreachable (STORAGE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, query), fields(container = %query.container_name, page_size = ?query.page_size))]
pub async fn list_blobs(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListBlobsQuery>,
) -> Result<Json<BlobPage>, AppError> {
    validate_container_name(&query.container_name)?;

    let request = PageRequest::new(
        query.container_name.trim(),
        query.continuation_token,
        query.page_size,
    );
    let page = state.blobs.list_blobs(&request).await?;

    tracing::debug!(
        count = page.blobs.len(),
        more = page.next_continuation_token.is_some(),
        "Listed blob page"
    );
    Ok(Json(page))
}
