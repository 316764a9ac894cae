use serde::Serialize;

use crate::extractors::auth::AuthUser;

/// Identity attached to the current request.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SessionResponse {
    /// User ID carried by the bearer token.
    pub user_id: String,
    /// Display name carried by the bearer token.
    #[schema(example = "Test User")]
    pub name: String,
}

impl From<AuthUser> for SessionResponse {
    fn from(user: AuthUser) -> Self {
        Self {
            user_id: user.user_id,
            name: user.name,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SecretMessageResponse {
    #[schema(example = "you can now see this secret message!")]
    pub message: &'static str,
}
