//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Media error: {0}")]
    Media(#[from] vimg_media::MediaError),

    #[error("Storage error: {0}")]
    Storage(#[from] vimg_storage::StorageError),

    #[error("Publish error: {0}")]
    Publish(#[from] vimg_publish::PublishError),
}

impl WorkerError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Check if error is retryable by a job-level retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            WorkerError::Media(e) => e.is_retryable(),
            WorkerError::Storage(e) => matches!(e, vimg_storage::StorageError::UploadFailed(_)),
            WorkerError::Publish(e) => e.is_retryable(),
            WorkerError::ConfigError(_) => false,
        }
    }

    /// True when the input itself is unusable and a retry cannot help.
    pub fn is_permanent_failure(&self) -> bool {
        match self {
            WorkerError::Media(e) => e.is_invalid_input(),
            WorkerError::ConfigError(_) => true,
            _ => false,
        }
    }
}
