//! Video images job.
//!
//! Extracts the stills of one video, stores them, and publishes their keys
//! to every course run that references the video. Each step runs once; a
//! retrying caller wraps the whole job.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::Instrument;
use vimg_media::FrameExtractor;
use vimg_models::{ExtractedImage, JobId, PublishReport, VideoDescriptor};
use vimg_publish::{
    HttpPublishTransport, HttpTokenIssuer, PublisherConfig, TransportConfig, VideoImagePublisher,
};
use vimg_storage::{ImageStore, S3ImageStore};

use crate::config::Settings;
use crate::error::WorkerResult;
use crate::logging::JobLogger;

const OPERATION: &str = "video_images";

/// Collaborators a job runs against.
#[derive(Clone)]
pub struct JobServices {
    pub extractor: FrameExtractor,
    pub store: Arc<dyn ImageStore>,
    pub publisher: VideoImagePublisher,
}

impl JobServices {
    /// Production services: FFmpeg, the S3 image bucket and the HTTP
    /// publish endpoint. Token endpoint and bucket settings come from the
    /// environment; both HTTP clients use `settings.publish_timeout`.
    pub async fn from_settings(settings: &Settings) -> WorkerResult<Self> {
        settings.validate()?;

        let extractor =
            FrameExtractor::ffmpeg(settings.ffmpeg_path.clone(), settings.ffmpeg_timeout_secs());
        let store = S3ImageStore::from_env().await?;
        let tokens = HttpTokenIssuer::from_env(settings.publish_timeout)?;
        let transport = HttpPublishTransport::new(TransportConfig {
            timeout: settings.publish_timeout,
            ..TransportConfig::default()
        })?;

        let publisher = VideoImagePublisher::new(
            Arc::new(tokens),
            Arc::new(transport),
            PublisherConfig {
                endpoint_url: settings.val_video_images_url.clone(),
                client_id: settings.val_client_id.clone(),
            },
        );

        Ok(Self {
            extractor,
            store: Arc::new(store),
            publisher,
        })
    }
}

/// What a job did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobSummary {
    pub job_id: String,
    /// True when the video had no course runs and nothing was done
    pub skipped: bool,
    pub images: Vec<ExtractedImage>,
    pub image_keys: Vec<String>,
    pub publish: PublishReport,
}

/// One video's image generation job.
pub struct VideoImagesJob {
    video: VideoDescriptor,
    work_dir: PathBuf,
    source_file: PathBuf,
    job_id: JobId,
    services: JobServices,
    logger: JobLogger,
}

impl VideoImagesJob {
    pub fn new(
        video: VideoDescriptor,
        work_dir: impl Into<PathBuf>,
        source_file: impl Into<PathBuf>,
        job_id: JobId,
        services: JobServices,
    ) -> Self {
        let logger = JobLogger::new(&job_id, OPERATION);
        Self {
            video,
            work_dir: work_dir.into(),
            source_file: source_file.into(),
            job_id,
            services,
            logger,
        }
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Extract and validate the stills.
    pub async fn generate(&self) -> WorkerResult<Vec<ExtractedImage>> {
        let images = self
            .services
            .extractor
            .generate(&self.video, &self.work_dir, &self.source_file, &self.job_id)
            .await?;
        Ok(images)
    }

    /// Store every image, returning keys in image order.
    pub async fn upload_images(&self, images: &[ExtractedImage]) -> WorkerResult<Vec<String>> {
        let mut keys = Vec::with_capacity(images.len());
        for image in images {
            keys.push(self.services.store.store_image(image.path()).await?);
        }
        Ok(keys)
    }

    /// Publish `image_keys` to every course run of the video.
    pub async fn update_val(&self, image_keys: &[String]) -> WorkerResult<PublishReport> {
        let report = self
            .services
            .publisher
            .update_val(&self.video, image_keys)
            .await?;
        Ok(report)
    }

    /// Run the whole job: skip videos without course runs, otherwise
    /// generate, store and publish.
    ///
    /// Per-course-run publish failures are reported in the summary, not as
    /// an error; the caller decides whether they fail the job.
    pub async fn create_and_update(&self) -> WorkerResult<JobSummary> {
        let span = self.logger.create_span();
        self.run().instrument(span).await
    }

    async fn run(&self) -> WorkerResult<JobSummary> {
        let mut summary = JobSummary {
            job_id: self.job_id.to_string(),
            ..JobSummary::default()
        };

        if !self.video.has_course_runs() {
            self.logger
                .log_completion("video has no course runs, skipping image generation");
            summary.skipped = true;
            return Ok(summary);
        }

        self.logger.log_start(&format!(
            "generating images from {}",
            self.source_path().display()
        ));

        summary.images = self.generate().await.inspect_err(|e| {
            self.logger.log_error(&format!("image generation failed: {}", e));
        })?;
        self.logger
            .log_progress(&format!("generated {} images", summary.images.len()));

        summary.image_keys = self.upload_images(&summary.images).await.inspect_err(|e| {
            self.logger.log_error(&format!("image upload failed: {}", e));
        })?;

        summary.publish = self.update_val(&summary.image_keys).await.inspect_err(|e| {
            self.logger.log_error(&format!("publishing failed: {}", e));
        })?;

        let failed = summary.publish.attempted() - summary.publish.succeeded();
        if failed > 0 {
            self.logger.log_warning(&format!(
                "{} of {} course runs were not updated",
                failed,
                summary.publish.attempted()
            ));
        }

        self.logger.log_completion(&format!(
            "published {} images to {} course runs",
            summary.image_keys.len(),
            summary.publish.succeeded()
        ));
        Ok(summary)
    }

    fn source_path(&self) -> PathBuf {
        self.work_dir.join(&self.source_file)
    }
}
