use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::gate::{AccessTier, TokenVerifier};
use crate::handlers;
use crate::state::AppState;

pub fn routes(verifier: &TokenVerifier) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/ratings", rating_routes(verifier))
        .nest("/bangers", banger_routes(verifier))
        .nest("/users", user_routes())
        .nest("/movies", movie_routes())
        .nest("/blobs", blob_routes(verifier))
        .nest("/auth", auth_routes(verifier))
        .merge(episode_routes())
        .merge(assignment_routes(verifier))
}

/// Combine the public and protected halves of one procedure group.
fn tiered(
    public: OpenApiRouter<AppState>,
    protected: OpenApiRouter<AppState>,
    verifier: &TokenVerifier,
) -> OpenApiRouter<AppState> {
    AccessTier::Public
        .apply(public, verifier)
        .merge(AccessTier::Protected.apply(protected, verifier))
}

fn rating_routes(verifier: &TokenVerifier) -> OpenApiRouter<AppState> {
    let public = OpenApiRouter::new()
        .routes(routes!(handlers::rating::list_ratings))
        .routes(routes!(handlers::rating::get_rating));
    let protected = OpenApiRouter::new()
        .routes(routes!(handlers::rating::add_rating))
        .routes(routes!(
            handlers::rating::update_rating,
            handlers::rating::remove_rating
        ));
    tiered(public, protected, verifier)
}

fn banger_routes(verifier: &TokenVerifier) -> OpenApiRouter<AppState> {
    let public = OpenApiRouter::new()
        .routes(routes!(handlers::banger::list_bangers))
        .routes(routes!(handlers::banger::get_banger));
    let protected = OpenApiRouter::new()
        .routes(routes!(handlers::banger::add_banger))
        .routes(routes!(
            handlers::banger::update_banger,
            handlers::banger::remove_banger
        ));
    tiered(public, protected, verifier)
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::user::list_users,
            handlers::user::add_user
        ))
        .routes(routes!(
            handlers::user::get_user,
            handlers::user::update_user,
            handlers::user::remove_user
        ))
}

// Mounted with full paths: `/episodes/{episode_id}/assignments` lives in the
// assignment group.
fn episode_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::episode::list_episodes,
            handlers::episode::add_episode
        ))
        .routes(routes!(handlers::episode::remove_episode))
}

fn movie_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::movie::list_movies,
            handlers::movie::add_movie
        ))
        .routes(routes!(handlers::movie::get_movie))
}

fn assignment_routes(verifier: &TokenVerifier) -> OpenApiRouter<AppState> {
    let public = OpenApiRouter::new()
        .routes(routes!(handlers::assignment::list_assignments))
        .routes(routes!(handlers::assignment::get_assignment))
        .routes(routes!(handlers::assignment::get_assignments_for_episode));
    let protected = OpenApiRouter::new()
        .routes(routes!(handlers::assignment::add_assignment))
        .routes(routes!(
            handlers::assignment::update_assignment,
            handlers::assignment::remove_assignment
        ))
        .routes(routes!(handlers::assignment::set_homework));
    tiered(public, protected, verifier)
}

fn blob_routes(verifier: &TokenVerifier) -> OpenApiRouter<AppState> {
    let protected = OpenApiRouter::new()
        .routes(routes!(handlers::blob::list_blobs))
        .routes(routes!(handlers::blob::list_containers));
    AccessTier::Protected.apply(protected, verifier)
}

fn auth_routes(verifier: &TokenVerifier) -> OpenApiRouter<AppState> {
    let public = OpenApiRouter::new().routes(routes!(handlers::auth::get_session));
    let protected = OpenApiRouter::new().routes(routes!(handlers::auth::get_secret_message));
    tiered(public, protected, verifier)
}
