pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod gate;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::{HeaderValue, Method, header};
use common::storage::BlobCatalog;
use common::storage::memory::MemoryBlobCatalog;
use common::storage::s3::S3BlobCatalog;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{CorsConfig, StorageBackend, StorageConfig};
use crate::gate::TokenVerifier;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Podcast Catalog API",
        version = "1.0.0",
        description = "Episodes, movies, bangers, ratings, assignments and users of the podcast"
    ),
    tags(
        (name = "Ratings", description = "Rating scale CRUD operations"),
        (name = "Bangers", description = "Songs played on an episode"),
        (name = "Users", description = "Podcast hosts and guests"),
        (name = "Episodes", description = "Podcast episodes"),
        (name = "Movies", description = "Movies that can be assigned"),
        (name = "Assignments", description = "Movies assigned to a host for an episode"),
        (name = "Blobs", description = "Paginated object storage listing"),
        (name = "Auth", description = "Session inspection"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let verifier = TokenVerifier::new(&state.config.auth.jwt_secret);
    let cors = cors_layer(&state.config.server.cors);

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", routes::api_routes(&verifier))
        .split_for_parts();

    router
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring malformed CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(config.max_age))
}

/// Construct the blob catalog selected by `storage.backend`.
pub fn build_blob_catalog(config: &StorageConfig) -> anyhow::Result<Arc<dyn BlobCatalog>> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory blob catalog");
            Ok(Arc::new(MemoryBlobCatalog::new()))
        }
        StorageBackend::S3 => {
            let s3 = config
                .s3
                .as_ref()
                .context("storage.backend is \"s3\" but the [storage.s3] section is missing")?;
            let catalog = S3BlobCatalog::new(s3).context("Failed to configure S3 blob catalog")?;
            tracing::info!(region = %s3.region, "Using S3 blob catalog");
            Ok(Arc::new(catalog))
        }
    }
}
