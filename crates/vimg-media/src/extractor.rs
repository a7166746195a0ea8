//! Frame extraction.
//!
//! Produces exactly `IMAGE_COUNT` stills per job, named
//! `<job_id>_<index>.png` so that re-running a job overwrites its previous
//! output instead of accumulating files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use metrics::counter;
use tracing::{debug, error, info};
use vimg_models::{ExtractedImage, JobId, VideoDescriptor, IMAGE_COUNT, IMAGE_HEIGHT, IMAGE_WIDTH};

use crate::error::{MediaError, MediaResult};
use crate::positions::calculate_positions;
use crate::transcoder::{FfmpegTranscoder, FrameRequest, Transcoder};
use crate::validate::validate_image;

const IMAGE_EXTENSION: &str = "png";

/// File name of the `index`-th (1-based) still of a job.
pub fn image_file_name(job_id: &JobId, index: usize) -> String {
    format!("{}_{}.{}", job_id, index, IMAGE_EXTENSION)
}

/// Extracts and validates the stills of one video.
#[derive(Clone)]
pub struct FrameExtractor {
    transcoder: Arc<dyn Transcoder>,
}

impl FrameExtractor {
    pub fn new(transcoder: Arc<dyn Transcoder>) -> Self {
        Self { transcoder }
    }

    /// Extractor using the FFmpeg binary at `binary`.
    pub fn ffmpeg(binary: impl Into<PathBuf>, timeout_secs: Option<u64>) -> Self {
        let mut transcoder = FfmpegTranscoder::new(binary);
        if let Some(secs) = timeout_secs {
            transcoder = transcoder.with_timeout(secs);
        }
        Self::new(Arc::new(transcoder))
    }

    /// Generate the stills for `video` from `work_dir/source_file`.
    ///
    /// Returns the images in position order. Any failed invocation, any
    /// output that is missing, empty, undecodable or of the wrong size, and
    /// any disagreement between the number of files on disk and
    /// `IMAGE_COUNT` fails the whole extraction. Per-frame failures are
    /// reported as `ExtractionFailed` carrying the index, the position and
    /// the underlying error.
    pub async fn generate(
        &self,
        video: &VideoDescriptor,
        work_dir: &Path,
        source_file: &Path,
        job_id: &JobId,
    ) -> MediaResult<Vec<ExtractedImage>> {
        let positions = calculate_positions(video.duration)?;
        check_job_id(job_id)?;

        let source = work_dir.join(source_file);
        if !source.is_file() {
            return Err(MediaError::FileNotFound(source));
        }

        info!(
            job_id = %job_id,
            source = %source.display(),
            ?positions,
            "Extracting video images"
        );

        let mut images = Vec::with_capacity(IMAGE_COUNT);
        for (offset, position) in positions.into_iter().enumerate() {
            let index = offset + 1;
            let output = work_dir.join(image_file_name(job_id, index));

            let request = FrameRequest {
                source: source.clone(),
                position,
                width: IMAGE_WIDTH,
                height: IMAGE_HEIGHT,
                output: output.clone(),
            };

            if let Err(e) = self.extract_one(&request).await {
                error!(job_id = %job_id, index, position, "Frame extraction failed: {}", e);
                counter!("video_images_frames_total", "status" => "failed").increment(1);
                return Err(MediaError::extraction_failed(index, position, e));
            }

            counter!("video_images_frames_total", "status" => "ok").increment(1);
            debug!(job_id = %job_id, index, position, path = %output.display(), "Frame extracted");

            images.push(ExtractedImage::new(output, index, position));
        }

        let found = count_job_images(work_dir, job_id)?;
        if found != IMAGE_COUNT {
            return Err(MediaError::ImageCountMismatch {
                expected: IMAGE_COUNT,
                found,
            });
        }

        info!(job_id = %job_id, count = images.len(), "Video images generated");
        Ok(images)
    }

    /// Produce and validate one still. A file left by an earlier run is
    /// removed first so it can never pass as this run's output.
    async fn extract_one(&self, request: &FrameRequest) -> MediaResult<()> {
        match std::fs::remove_file(&request.output) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        self.transcoder.extract_frame(request).await?;
        validate_image(&request.output, request.width, request.height)
    }
}

/// Job ids become file names; reject anything that could leave `work_dir`.
fn check_job_id(job_id: &JobId) -> MediaResult<()> {
    let id = job_id.as_str();
    if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
        return Err(MediaError::InvalidJobId(id.to_string()));
    }
    Ok(())
}

/// Count files in `work_dir` named like this job's stills.
fn count_job_images(work_dir: &Path, job_id: &JobId) -> MediaResult<usize> {
    let prefix = format!("{}_", job_id);
    let suffix = format!(".{}", IMAGE_EXTENSION);

    let mut count = 0;
    for entry in std::fs::read_dir(work_dir)? {
        let name = entry?.file_name();
        let Some(name) = name.to_str() else { continue };

        let is_job_image = name
            .strip_prefix(&prefix)
            .and_then(|rest| rest.strip_suffix(&suffix))
            .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()));

        if is_job_image {
            count += 1;
        }
    }

    Ok(count)
}
