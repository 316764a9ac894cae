//! Access tiers.
//!
//! Every operation is either public or protected. Protected routes are wrapped
//! once, at router construction, with [`require_identity`]; a request without a
//! verifiable bearer token is answered with 401 before any handler (and so any
//! database call) runs.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
};
use utoipa_axum::router::OpenApiRouter;

use crate::error::AppError;
use crate::extractors::auth::AuthUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessTier {
    /// Runs unconditionally.
    Public,
    /// Requires a resolved caller identity.
    Protected,
}

/// Key material the gate verifies tokens with.
#[derive(Clone)]
pub struct TokenVerifier {
    secret: Arc<str>,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: Arc::from(secret),
        }
    }
}

impl AccessTier {
    /// Put every route currently in `router` behind this tier.
    pub fn apply<S>(self, router: OpenApiRouter<S>, verifier: &TokenVerifier) -> OpenApiRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        match self {
            AccessTier::Public => router,
            AccessTier::Protected => router.route_layer(middleware::from_fn_with_state(
                verifier.clone(),
                require_identity,
            )),
        }
    }
}

/// Resolve the caller and stash it in the request extensions for [`AuthUser`].
pub async fn require_identity(
    State(verifier): State<TokenVerifier>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = AuthUser::from_headers(req.headers(), &verifier.secret).inspect_err(|e| {
        tracing::debug!(method = %req.method(), path = %req.uri().path(), "Rejected: {:?}", e);
    })?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
