use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use tracing::instrument;

use crate::error::ErrorBody;
use crate::extractors::auth::AuthUser;
use crate::models::auth::{SecretMessageResponse, SessionResponse};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/session",
    tag = "Auth",
    operation_id = "getSession",
    summary = "Describe the current session",
    description = "Returns the identity carried by the bearer token, or `null` when the request is anonymous or the token does not verify.",
    responses(
        (status = 200, description = "Session, or null", body = Option<SessionResponse>),
    ),
)]
#[instrument(skip_all)]
pub async fn get_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<Option<SessionResponse>> {
    let session = AuthUser::from_headers(&headers, &state.config.auth.jwt_secret)
        .ok()
        .map(SessionResponse::from);
    Json(session)
}

#[utoipa::path(
    get,
    path = "/secret",
    tag = "Auth",
    operation_id = "getSecretMessage",
    summary = "Authenticated greeting",
    description = "Returns a fixed message. Succeeds only with a valid bearer token.",
    responses(
        (status = 200, description = "Secret message", body = SecretMessageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user), fields(user_id = %auth_user.user_id))]
pub async fn get_secret_message(auth_user: AuthUser) -> Json<SecretMessageResponse> {
    Json(SecretMessageResponse {
        message: "you can now see this secret message!",
    })
}
