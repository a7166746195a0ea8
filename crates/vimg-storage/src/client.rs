//! S3-compatible image store.

use std::path::Path;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use crate::keys::{image_key, DEFAULT_IMAGES_PREFIX};
use crate::ImageStore;

const IMAGE_CONTENT_TYPE: &str = "image/png";

/// Configuration for the image bucket.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Bucket name
    pub bucket_name: String,
    /// Key prefix for stored stills
    pub prefix: String,
    /// Region
    pub region: String,
    /// Custom endpoint (R2, MinIO); `None` for AWS
    pub endpoint_url: Option<String>,
    /// Static credentials; the default provider chain is used when unset
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl S3Config {
    /// Create config from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self {
            bucket_name: std::env::var("VIDEO_IMAGES_BUCKET")
                .map_err(|_| StorageError::config_error("VIDEO_IMAGES_BUCKET not set"))?,
            prefix: std::env::var("VIDEO_IMAGES_PREFIX")
                .unwrap_or_else(|_| DEFAULT_IMAGES_PREFIX.to_string()),
            region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            endpoint_url: std::env::var("S3_ENDPOINT_URL").ok(),
            access_key_id: std::env::var("S3_ACCESS_KEY_ID").ok(),
            secret_access_key: std::env::var("S3_SECRET_ACCESS_KEY").ok(),
        })
    }
}

/// Uploads stills to an S3-compatible bucket.
#[derive(Clone)]
pub struct S3ImageStore {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3ImageStore {
    /// Create a new store from configuration.
    pub async fn new(config: S3Config) -> StorageResult<Self> {
        if config.bucket_name.is_empty() {
            return Err(StorageError::config_error("bucket name cannot be empty"));
        }

        let mut builder = match (&config.access_key_id, &config.secret_access_key) {
            (Some(key_id), Some(secret)) => Builder::new()
                .behavior_version(BehaviorVersion::latest())
                .credentials_provider(Credentials::new(
                    key_id,
                    secret,
                    None,
                    None,
                    "video-images",
                )),
            _ => {
                let shared = aws_config::defaults(BehaviorVersion::latest()).load().await;
                Builder::from(&shared)
            }
        };

        builder = builder.region(Region::new(config.region.clone()));
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket_name,
            prefix: config.prefix,
        })
    }

    /// Create from environment variables.
    pub async fn from_env() -> StorageResult<Self> {
        Self::new(S3Config::from_env()?).await
    }

    /// Upload a file under `key`.
    pub async fn upload_file(&self, path: &Path, key: &str) -> StorageResult<()> {
        debug!("Uploading {} to {}", path.display(), key);

        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(IMAGE_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(format!("{}: {}", key, e)))?;

        info!("Uploaded {} to {}", path.display(), key);
        Ok(())
    }
}

#[async_trait]
impl ImageStore for S3ImageStore {
    async fn store_image(&self, path: &Path) -> StorageResult<String> {
        let key = image_key(&self.prefix, path)?;
        self.upload_file(path, &key).await?;
        Ok(key)
    }
}
