use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::user;
use crate::error::AppError;

use super::shared::validate_required;

/// Request body for creating or replacing a user.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UserRequest {
    /// Display name (1-128 characters).
    #[schema(example = "Test User")]
    pub name: String,
    /// Unique e-mail address.
    #[schema(example = "test@example.com")]
    pub email: String,
}

pub fn validate_user_request(req: &UserRequest) -> Result<(), AppError> {
    validate_required("name", &req.name, 128)?;
    validate_required("email", &req.email, 254)?;
    let email = req.email.as_str();
    let well_formed = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
    });
    if !well_formed || email.contains(char::is_whitespace) {
        return Err(AppError::Validation(
            "email must be a valid e-mail address".into(),
        ));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            created_at: m.created_at,
        }
    }
}
