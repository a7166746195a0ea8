//! Storage for generated video images.
//!
//! This crate provides:
//! - The `ImageStore` capability used by the job pipeline
//! - An S3-compatible implementation (AWS S3, R2, MinIO)
//! - Object key derivation for stored images

pub mod client;
pub mod error;
pub mod keys;

pub use client::{S3Config, S3ImageStore};
pub use error::{StorageError, StorageResult};
pub use keys::{image_key, DEFAULT_IMAGES_PREFIX};

use std::path::Path;

use async_trait::async_trait;

/// Persists a local image and returns the key it can be referenced by.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn store_image(&self, path: &Path) -> StorageResult<String>;
}
