mod error;
mod traits;

pub mod memory;
#[cfg(feature = "object-storage")]
pub mod s3;

pub use error::StorageError;
pub use traits::{
    BlobCatalog, BlobItem, BlobPage, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageRequest,
    clamp_page_size,
};
