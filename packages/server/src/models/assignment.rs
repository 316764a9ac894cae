use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{assignment, episode, movie, rating, review, user};
use crate::error::AppError;

use super::rating::RatingResponse;
use super::shared::{EpisodeSummary, MovieSummary, UserSummary, validate_required};

/// Request body for creating or replacing an assignment.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct AssignmentRequest {
    /// Host the movie is assigned to.
    pub user_id: String,
    pub movie_id: String,
    pub episode_id: String,
    /// Whether the assignment is homework. Defaults to `false`.
    #[serde(default)]
    pub homework: bool,
}

pub fn validate_assignment_request(req: &AssignmentRequest) -> Result<(), AppError> {
    validate_required("user_id", &req.user_id, 64)?;
    validate_required("movie_id", &req.movie_id, 64)?;
    validate_required("episode_id", &req.episode_id, 64)?;
    Ok(())
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SetHomeworkRequest {
    pub homework: bool,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AssignmentResponse {
    pub id: String,
    pub user_id: String,
    pub movie_id: String,
    pub episode_id: String,
    pub homework: bool,
    pub created_at: DateTime<Utc>,
}

impl From<assignment::Model> for AssignmentResponse {
    fn from(m: assignment::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            movie_id: m.movie_id,
            episode_id: m.episode_id,
            homework: m.homework,
            created_at: m.created_at,
        }
    }
}

/// Single assignment with its episode joined.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AssignmentWithEpisode {
    #[serde(flatten)]
    pub assignment: AssignmentResponse,
    pub episode: Option<EpisodeSummary>,
}

/// One review attached to an assignment, with reviewer and rating joined.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ReviewDetail {
    pub id: String,
    pub user: Option<UserSummary>,
    pub rating: Option<RatingResponse>,
    pub created_at: DateTime<Utc>,
}

impl ReviewDetail {
    pub fn new(m: review::Model, user: Option<user::Model>, rating: Option<rating::Model>) -> Self {
        Self {
            id: m.id,
            user: user.map(Into::into),
            rating: rating.map(Into::into),
            created_at: m.created_at,
        }
    }
}

/// Assignment as shown on an episode page.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AssignmentDetail {
    #[serde(flatten)]
    pub assignment: AssignmentResponse,
    pub movie: Option<MovieSummary>,
    pub user: Option<UserSummary>,
    pub reviews: Vec<ReviewDetail>,
}

impl AssignmentDetail {
    pub fn new(
        m: assignment::Model,
        movie: Option<movie::Model>,
        user: Option<user::Model>,
        reviews: Vec<ReviewDetail>,
    ) -> Self {
        Self {
            assignment: m.into(),
            movie: movie.map(Into::into),
            user: user.map(Into::into),
            reviews,
        }
    }
}

impl AssignmentWithEpisode {
    pub fn new(m: assignment::Model, episode: Option<episode::Model>) -> Self {
        Self {
            assignment: m.into(),
            episode: episode.map(Into::into),
        }
    }
}
