use serde::Deserialize;

use crate::error::AppError;

pub use common::storage::{BlobItem, BlobPage};

/// Query parameters for listing one page of a container.
#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListBlobsQuery {
    /// Container (bucket) to list.
    #[param(example = "episode-audio")]
    pub container_name: String,
    /// Cursor returned by the previous page. Omit to start from the beginning.
    pub continuation_token: Option<String>,
    /// Items per page; clamped to 1-100. Defaults to 20.
    pub page_size: Option<u32>,
}

pub fn validate_container_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation(
            "container_name must not be empty".into(),
        ));
    }
    Ok(())
}
