use thiserror::Error;

/// Errors that can occur while listing an object store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The named container does not exist in the account.
    #[error("container not found: {0}")]
    ContainerNotFound(String),
    /// The continuation token was not produced by this backend.
    #[error("invalid continuation token")]
    InvalidToken,
    /// Connectivity, credential, or any other backend failure.
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}
