//! Worker settings.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{WorkerError, WorkerResult};

/// Settings shared by extraction and publishing.
#[derive(Debug, Clone)]
pub struct Settings {
    /// FFmpeg binary (name on PATH or absolute path)
    pub ffmpeg_path: PathBuf,
    /// Kill FFmpeg if a single still takes longer than this
    pub ffmpeg_timeout: Option<Duration>,
    /// Credential scope for token issuance
    pub val_client_id: Option<String>,
    /// Endpoint receiving generated image references
    pub val_video_images_url: String,
    /// Per-call publish timeout
    pub publish_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffmpeg_timeout: Some(Duration::from_secs(120)),
            val_client_id: None,
            val_video_images_url: String::new(),
            publish_timeout: Duration::from_secs(30),
        }
    }
}

impl Settings {
    /// Load settings from the environment (and `.env`, if present).
    pub fn from_env() -> WorkerResult<Self> {
        dotenvy::dotenv().ok();

        let settings = Self {
            ffmpeg_path: std::env::var("FFMPEG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("ffmpeg")),
            ffmpeg_timeout: match env_secs("FFMPEG_TIMEOUT_SECS")? {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
                None => Some(Duration::from_secs(120)),
            },
            val_client_id: std::env::var("VAL_CLIENT_ID").ok().filter(|s| !s.is_empty()),
            val_video_images_url: std::env::var("VAL_VIDEO_IMAGES_URL")
                .map_err(|_| WorkerError::config_error("VAL_VIDEO_IMAGES_URL not set"))?,
            publish_timeout: Duration::from_secs(
                env_secs("VAL_PUBLISH_TIMEOUT_SECS")?.unwrap_or(30),
            ),
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Check values that would otherwise only fail mid-job.
    pub fn validate(&self) -> WorkerResult<()> {
        if self.ffmpeg_path.as_os_str().is_empty() {
            return Err(WorkerError::config_error("FFmpeg path cannot be empty"));
        }

        let url = Url::parse(&self.val_video_images_url).map_err(|e| {
            WorkerError::config_error(format!(
                "invalid video images URL {:?}: {}",
                self.val_video_images_url, e
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(WorkerError::config_error(format!(
                "video images URL must be http(s): {}",
                url
            )));
        }

        if self.publish_timeout.is_zero() {
            return Err(WorkerError::config_error("publish timeout must be finite and non-zero"));
        }

        Ok(())
    }

    pub fn ffmpeg_timeout_secs(&self) -> Option<u64> {
        self.ffmpeg_timeout.map(|d| d.as_secs().max(1))
    }
}

/// Whole seconds from `name`; unset is `None`, anything unparsable is an error.
fn env_secs(name: &str) -> WorkerResult<Option<u64>> {
    match std::env::var(name) {
        Ok(s) => s.trim().parse::<u64>().map(Some).map_err(|_| {
            WorkerError::config_error(format!("{} is not a number of seconds: {}", name, s))
        }),
        Err(_) => Ok(None),
    }
}
