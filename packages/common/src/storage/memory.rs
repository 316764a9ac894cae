use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::error::StorageError;
use super::traits::{BlobCatalog, BlobItem, BlobPage, PageRequest};

type Container = BTreeMap<String, BlobItem>;

/// In-process object catalog, ordered by object name.
///
/// Continuation tokens are the hex encoding of the last name returned, so a
/// listing resumes strictly after it even if objects are added in between.
#[derive(Default)]
pub struct MemoryBlobCatalog {
    containers: RwLock<BTreeMap<String, Container>>,
    offline: AtomicBool,
}

impl MemoryBlobCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty container. Existing containers are left untouched.
    pub fn create_container(&self, name: &str) {
        let mut containers = self.containers.write().unwrap_or_else(|e| e.into_inner());
        containers.entry(name.to_string()).or_default();
    }

    /// Insert or replace an object, creating the container if needed.
    pub fn insert(&self, container: &str, item: BlobItem) {
        let mut containers = self.containers.write().unwrap_or_else(|e| e.into_inner());
        containers
            .entry(container.to_string())
            .or_default()
            .insert(item.name.clone(), item);
    }

    /// Simulate losing the backend. Every call fails with `Unavailable` while offline.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    fn ensure_online(&self) -> Result<(), StorageError> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(StorageError::Unavailable(
                "in-memory catalog is offline".into(),
            ));
        }
        Ok(())
    }
}

fn decode_token(token: &str) -> Result<String, StorageError> {
    let bytes = hex::decode(token).map_err(|_| StorageError::InvalidToken)?;
    String::from_utf8(bytes).map_err(|_| StorageError::InvalidToken)
}

#[async_trait]
impl BlobCatalog for MemoryBlobCatalog {
    async fn list_containers(&self) -> Result<Vec<String>, StorageError> {
        self.ensure_online()?;
        let containers = self.containers.read().unwrap_or_else(|e| e.into_inner());
        Ok(containers.keys().cloned().collect())
    }

    async fn list_blobs(&self, request: &PageRequest) -> Result<BlobPage, StorageError> {
        self.ensure_online()?;

        let start = match request.continuation_token.as_deref() {
            Some(token) => Bound::Excluded(decode_token(token)?),
            None => Bound::Unbounded,
        };

        let containers = self.containers.read().unwrap_or_else(|e| e.into_inner());
        let container = containers
            .get(&request.container)
            .ok_or_else(|| StorageError::ContainerNotFound(request.container.clone()))?;

        let mut remaining = container.range((start, Bound::Unbounded)).map(|(_, b)| b);
        let blobs: Vec<BlobItem> = remaining
            .by_ref()
            .take(request.page_size as usize)
            .cloned()
            .collect();

        let next_continuation_token = match (remaining.next(), blobs.last()) {
            (Some(_), Some(last)) => Some(hex::encode(last.name.as_bytes())),
            _ => None,
        };

        Ok(BlobPage {
            blobs,
            next_continuation_token,
        })
    }
}
