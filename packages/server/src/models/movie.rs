use serde::{Deserialize, Serialize};

use crate::entity::movie;
use crate::error::AppError;

use super::shared::{validate_required, validate_url};

/// Request body for adding a movie.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct MovieRequest {
    /// Movie title (1-256 characters).
    #[schema(example = "Hackers")]
    pub title: String,
    /// Release year.
    #[schema(example = 1995)]
    pub year: i32,
    /// Absolute poster image URL.
    #[serde(default)]
    pub poster: Option<String>,
    /// Absolute link to an external listing. Adding a movie whose `url` is
    /// already known updates that movie instead of creating a duplicate.
    #[serde(default)]
    pub url: Option<String>,
}

pub fn validate_movie_request(req: &MovieRequest) -> Result<(), AppError> {
    validate_required("title", &req.title, 256)?;
    if !(1870..=2200).contains(&req.year) {
        return Err(AppError::Validation(
            "year must be between 1870 and 2200".into(),
        ));
    }
    if let Some(poster) = &req.poster {
        validate_url("poster", poster)?;
    }
    if let Some(url) = &req.url {
        validate_url("url", url)?;
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MovieResponse {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub poster: Option<String>,
    pub url: Option<String>,
}

impl From<movie::Model> for MovieResponse {
    fn from(m: movie::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            year: m.year,
            poster: m.poster,
            url: m.url,
        }
    }
}
