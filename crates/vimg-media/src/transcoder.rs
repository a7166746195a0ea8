//! Transcoder capability.
//!
//! The extractor only depends on this trait, so tests can substitute a fake
//! that writes fixture images instead of spawning FFmpeg.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// One still to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRequest {
    pub source: PathBuf,
    /// Offset into the source in seconds
    pub position: u64,
    pub width: u32,
    pub height: u32,
    pub output: PathBuf,
}

/// Produces a single still image from a video.
///
/// On success a decodable image of exactly `width`x`height` must exist at
/// `output`; the extractor verifies this independently.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn extract_frame(&self, request: &FrameRequest) -> MediaResult<()>;
}

/// `Transcoder` backed by the FFmpeg CLI.
#[derive(Debug, Clone, Default)]
pub struct FfmpegTranscoder {
    runner: FfmpegRunner,
}

impl FfmpegTranscoder {
    /// Use the FFmpeg binary at `binary` (name on `PATH` or a path).
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            runner: FfmpegRunner::new(binary),
        }
    }

    /// Kill FFmpeg if a single still takes longer than `secs`.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.runner = self.runner.with_timeout(secs);
        self
    }

    /// Build the command used for a request.
    pub fn command_for(request: &FrameRequest) -> FfmpegCommand {
        FfmpegCommand::new(&request.source, &request.output)
            .seek_secs(request.position)
            .single_frame()
            .video_only()
            .fit_to(request.width, request.height)
            .log_level("error")
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn extract_frame(&self, request: &FrameRequest) -> MediaResult<()> {
        let cmd = Self::command_for(request);
        self.runner.run(&cmd).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_for_request() {
        let request = FrameRequest {
            source: PathBuf::from("/work/test.mp4"),
            position: 122,
            width: 1280,
            height: 720,
            output: PathBuf::from("/work/101_2.png"),
        };

        let args = FfmpegTranscoder::command_for(&request).build_args();
        assert!(args.contains(&"122".to_string()));
        assert!(args.contains(&"/work/test.mp4".to_string()));
        assert_eq!(args.last().unwrap(), "/work/101_2.png");
    }
}
