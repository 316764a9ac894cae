use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::StorageError;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Largest page a single listing call may return.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Clamp a requested page size into `1..=MAX_PAGE_SIZE`, defaulting when absent.
pub fn clamp_page_size(requested: Option<u32>) -> u32 {
    requested
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE)
}

/// One object in a container listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct BlobItem {
    /// Object name (key) inside the container.
    #[schema(example = "episodes/042/intro.mp3")]
    pub name: String,
    /// Creation time, when the backend reports one.
    pub created_on: Option<DateTime<Utc>>,
    /// Last modification time, when the backend reports one.
    pub last_modified: Option<DateTime<Utc>>,
    /// Size in bytes.
    #[schema(example = 1048576)]
    pub content_length: u64,
    /// MIME type, when the backend reports one.
    #[schema(example = "audio/mpeg")]
    pub content_type: Option<String>,
}

/// A single page of a container listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct BlobPage {
    pub blobs: Vec<BlobItem>,
    /// Opaque cursor for the next page. Absent once the listing is exhausted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_continuation_token: Option<String>,
}

impl BlobPage {
    pub fn empty() -> Self {
        Self {
            blobs: Vec::new(),
            next_continuation_token: None,
        }
    }
}

/// Parameters for fetching one page of a container listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub container: String,
    pub continuation_token: Option<String>,
    /// Always within `1..=MAX_PAGE_SIZE`.
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(
        container: impl Into<String>,
        continuation_token: Option<String>,
        page_size: Option<u32>,
    ) -> Self {
        Self {
            container: container.into(),
            continuation_token: continuation_token.filter(|t| !t.is_empty()),
            page_size: clamp_page_size(page_size),
        }
    }
}

/// Read-only view over an object store account.
///
/// Implementations hold no per-listing state: everything needed to resume a
/// listing travels in the continuation token.
#[async_trait]
pub trait BlobCatalog: Send + Sync {
    /// Names of every container in the account.
    async fn list_containers(&self) -> Result<Vec<String>, StorageError>;

    /// Fetch exactly one page of objects from a container.
    async fn list_blobs(&self, request: &PageRequest) -> Result<BlobPage, StorageError>;
}
