use async_trait::async_trait;
use chrono::{DateTime, Utc};
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::serde_types::Object;
use s3::{Bucket, Region};
use serde::Deserialize;

use super::error::StorageError;
use super::traits::{BlobCatalog, BlobItem, BlobPage, PageRequest};

/// Connection settings for an S3-compatible account.
#[derive(Debug, Deserialize, Clone)]
pub struct S3Config {
    /// Custom endpoint (MinIO, R2, Azurite gateways). Empty means AWS.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_region")]
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    /// Use path-style addressing. Required by most self-hosted gateways.
    #[serde(default)]
    pub path_style: bool,
}

fn default_region() -> String {
    "us-east-1".into()
}

/// Lists buckets and objects through the S3 `ListObjectsV2` API.
pub struct S3BlobCatalog {
    region: Region,
    credentials: Credentials,
    path_style: bool,
}

impl S3BlobCatalog {
    pub fn new(config: &S3Config) -> Result<Self, StorageError> {
        let region = match config.endpoint.as_deref().filter(|e| !e.is_empty()) {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.to_string(),
            },
            None => config
                .region
                .parse()
                .map_err(|e| StorageError::Unavailable(format!("invalid region: {e}")))?,
        };

        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Unavailable(format!("invalid credentials: {e}")))?;

        Ok(Self {
            region,
            credentials,
            path_style: config.path_style,
        })
    }

    fn bucket(&self, name: &str) -> Result<Box<Bucket>, StorageError> {
        let bucket = Bucket::new(name, self.region.clone(), self.credentials.clone())
            .map_err(|e| map_s3_error(e, name))?;
        Ok(if self.path_style {
            bucket.with_path_style()
        } else {
            bucket
        })
    }
}

/// Non-2xx replies only surface as `HttpFailWithBody` with rust-s3's
/// `fail-on-err` feature enabled.
fn map_s3_error(err: S3Error, container: &str) -> StorageError {
    match err {
        S3Error::HttpFailWithBody(404, _) => StorageError::ContainerNotFound(container.to_string()),
        other => StorageError::Unavailable(other.to_string()),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

impl From<Object> for BlobItem {
    fn from(object: Object) -> Self {
        Self {
            last_modified: parse_timestamp(&object.last_modified),
            name: object.key,
            // ListObjectsV2 reports neither creation time nor content type.
            created_on: None,
            content_length: object.size,
            content_type: None,
        }
    }
}

#[async_trait]
impl BlobCatalog for S3BlobCatalog {
    async fn list_containers(&self) -> Result<Vec<String>, StorageError> {
        let response = Bucket::list_buckets(self.region.clone(), self.credentials.clone())
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(response.bucket_names().collect())
    }

    async fn list_blobs(&self, request: &PageRequest) -> Result<BlobPage, StorageError> {
        let bucket = self.bucket(&request.container)?;

        let (result, _status) = bucket
            .list_page(
                String::new(),
                None,
                request.continuation_token.clone(),
                None,
                Some(request.page_size as usize),
            )
            .await
            .map_err(|e| map_s3_error(e, &request.container))?;

        tracing::debug!(
            container = %request.container,
            count = result.contents.len(),
            truncated = result.is_truncated,
            "Listed object page"
        );

        let next_continuation_token = if result.is_truncated {
            result.next_continuation_token
        } else {
            None
        };

        Ok(BlobPage {
            blobs: result.contents.into_iter().map(BlobItem::from).collect(),
            next_continuation_token,
        })
    }
}
