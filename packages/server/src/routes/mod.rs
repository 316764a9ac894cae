mod v1;

use utoipa_axum::router::OpenApiRouter;

use crate::gate::TokenVerifier;
use crate::state::AppState;

pub fn api_routes(verifier: &TokenVerifier) -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest("/v1", v1::routes(verifier))
}
