//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during frame extraction.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Invalid duration: {0}")]
    InvalidDuration(f64),

    #[error("Transcoder not found: {0}")]
    FfmpegNotFound(String),

    #[error("FFmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("Frame {index} at {position}s could not be extracted: {source}")]
    ExtractionFailed {
        index: usize,
        position: u64,
        #[source]
        source: Box<MediaError>,
    },

    #[error("Job id {0:?} cannot be used as a file name")]
    InvalidJobId(String),

    #[error("Invalid output image {path}: {reason}")]
    InvalidOutput { path: PathBuf, reason: String },

    #[error("Expected {expected} images, found {found}")]
    ImageCountMismatch { expected: usize, found: usize },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Create an FFmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Attach the frame a failure happened at.
    pub fn extraction_failed(index: usize, position: u64, source: MediaError) -> Self {
        Self::ExtractionFailed {
            index,
            position,
            source: Box::new(source),
        }
    }

    pub fn invalid_output(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidOutput {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors raised before any external process was started.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            MediaError::InvalidDuration(_)
                | MediaError::InvalidJobId(_)
                | MediaError::FileNotFound(_)
        )
    }

    /// Underlying failure, looking through `ExtractionFailed`.
    pub fn cause(&self) -> &MediaError {
        match self {
            MediaError::ExtractionFailed { source, .. } => source.cause(),
            other => other,
        }
    }

    /// Check if a retry of the whole extraction may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self.cause(), MediaError::Timeout(_) | MediaError::Io(_))
    }
}
