//! Extracted still images.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Number of stills extracted per video
pub const IMAGE_COUNT: usize = 3;

/// Output resolution of every still
pub const IMAGE_WIDTH: u32 = 1280;
pub const IMAGE_HEIGHT: u32 = 720;

/// A still frame written to the job's work directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedImage {
    /// Local file path
    pub path: PathBuf,
    /// 1-based index of the timestamp this image was taken at
    pub index: usize,
    /// Offset into the video in seconds
    pub position: u64,
    pub width: u32,
    pub height: u32,
}

impl ExtractedImage {
    pub fn new(path: impl Into<PathBuf>, index: usize, position: u64) -> Self {
        Self {
            path: path.into(),
            index,
            position,
            width: IMAGE_WIDTH,
            height: IMAGE_HEIGHT,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name component of the path, used as the storage key suffix.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}
