use serde::Serialize;
use url::Url;

use crate::entity::{episode, movie, user};
use crate::error::AppError;

/// Generate a new primary key. UUIDv7 keeps insertion order roughly sortable.
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Validate a required string field: non-empty after trimming, at most `max` characters.
pub fn validate_required(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be 1-{max} characters"
        )));
    }
    Ok(())
}

/// Validate an optional string field: when present it must be non-empty after trimming.
pub fn validate_optional(field: &str, value: Option<&str>, max: usize) -> Result<(), AppError> {
    match value {
        Some(v) => validate_required(field, v, max),
        None => Ok(()),
    }
}

/// Validate that `value` is an absolute URL with no surrounding whitespace.
pub fn validate_url(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim() != value || Url::parse(value).is_err() {
        return Err(AppError::Validation(format!(
            "{field} must be a valid absolute URL"
        )));
    }
    Ok(())
}

/// Normalize a nullable reference: blank strings count as absent.
pub fn normalize_ref(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Compact user representation embedded in joined reads.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
}

impl From<user::Model> for UserSummary {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

/// Compact episode representation embedded in joined reads.
#[derive(Serialize, utoipa::ToSchema)]
pub struct EpisodeSummary {
    pub id: String,
    #[schema(example = 42)]
    pub number: i32,
    pub title: String,
}

impl From<episode::Model> for EpisodeSummary {
    fn from(m: episode::Model) -> Self {
        Self {
            id: m.id,
            number: m.number,
            title: m.title,
        }
    }
}

/// Compact movie representation embedded in joined reads.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MovieSummary {
    pub id: String,
    pub title: String,
    #[schema(example = 1987)]
    pub year: i32,
    pub poster: Option<String>,
    pub url: Option<String>,
}

impl From<movie::Model> for MovieSummary {
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
