use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{banger, episode, user};
use crate::error::AppError;

use super::shared::{EpisodeSummary, UserSummary, validate_required, validate_url};

/// Request body for creating or replacing a banger.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct BangerRequest {
    /// Song title (1-256 characters).
    #[schema(example = "Maniac")]
    pub title: String,
    /// Performing artist (1-256 characters).
    #[schema(example = "Michael Sembello")]
    pub artist: String,
    /// Absolute link to the track.
    #[schema(example = "https://www.youtube.com/watch?v=1234")]
    pub url: String,
    /// Episode the banger was played on.
    #[serde(default)]
    pub episode_id: Option<String>,
    /// Host who brought the banger.
    #[serde(default)]
    pub user_id: Option<String>,
}

pub fn validate_banger_request(req: &BangerRequest) -> Result<(), AppError> {
    validate_required("title", &req.title, 256)?;
    validate_required("artist", &req.artist, 256)?;
    validate_url("url", &req.url)?;
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BangerResponse {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub url: String,
    pub episode_id: Option<String>,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Joined episode. Only populated on reads.
    pub episode: Option<EpisodeSummary>,
    /// Joined user. Only populated on reads.
    pub user: Option<UserSummary>,
}

impl From<banger::Model> for BangerResponse {
    fn from(m: banger::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            artist: m.artist,
            url: m.url,
            episode_id: m.episode_id,
            user_id: m.user_id,
            created_at: m.created_at,
            episode: None,
            user: None,
        }
    }
}

impl BangerResponse {
    pub fn with_joins(
        m: banger::Model,
        episode: Option<episode::Model>,
        user: Option<user::Model>,
    ) -> Self {
        Self {
            episode: episode.map(Into::into),
            user: user.map(Into::into),
            ..Self::from(m)
        }
    }
}
