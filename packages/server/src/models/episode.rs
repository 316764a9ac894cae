use serde::{Deserialize, Serialize};

use crate::entity::episode;
use crate::error::AppError;

use super::shared::validate_required;

/// Request body for creating an episode.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct EpisodeRequest {
    /// Running episode number.
    #[schema(example = 42)]
    pub number: i32,
    /// Episode title (1-256 characters).
    #[schema(example = "Maniac Cop Marathon")]
    pub title: String,
}

pub fn validate_episode_request(req: &EpisodeRequest) -> Result<(), AppError> {
    if req.number < 0 {
        return Err(AppError::Validation("number must not be negative".into()));
    }
    validate_required("title", &req.title, 256)?;
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EpisodeResponse {
    pub id: String,
    pub number: i32,
    pub title: String,
}

impl From<episode::Model> for EpisodeResponse {
    fn from(m: episode::Model) -> Self {
        Self {
            id: m.id,
            number: m.number,
            title: m.title,
        }
    }
}
