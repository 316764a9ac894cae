use serde::{Deserialize, Serialize};

use crate::entity::rating;
use crate::error::AppError;

use super::shared::{validate_optional, validate_required};

/// Request body for creating or replacing a rating.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RatingRequest {
    /// Display name (1-64 characters).
    #[schema(example = "Gold Star")]
    pub name: String,
    /// Numeric weight; higher is better. Ratings are listed by value, descending.
    #[schema(example = 5.0)]
    pub value: f64,
    /// Sound clip played when the rating is revealed.
    pub sound: Option<String>,
    /// Icon identifier or URL.
    pub icon: Option<String>,
    /// Free-form grouping, e.g. "movie" or "game".
    pub category: Option<String>,
}

pub fn validate_rating_request(req: &RatingRequest) -> Result<(), AppError> {
    validate_required("name", &req.name, 64)?;
    if !req.value.is_finite() {
        return Err(AppError::Validation("value must be a finite number".into()));
    }
    validate_optional("sound", req.sound.as_deref(), 2048)?;
    validate_optional("icon", req.icon.as_deref(), 2048)?;
    validate_optional("category", req.category.as_deref(), 64)?;
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RatingResponse {
    pub id: String,
    pub name: String,
    #[schema(example = 5.0)]
    pub value: f64,
    pub sound: Option<String>,
    pub icon: Option<String>,
    pub category: Option<String>,
}

impl From<rating::Model> for RatingResponse {
    fn from(m: rating::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            value: m.value,
            sound: m.sound,
            icon: m.icon,
            category: m.category,
        }
    }
}
