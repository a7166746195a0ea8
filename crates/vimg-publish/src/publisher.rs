//! Publishing image references to every course run of a video.

use std::sync::Arc;

use tracing::{error, info, info_span, Instrument};
use vimg_models::{PublishOutcome, PublishReport, VideoDescriptor};

use crate::error::PublishResult;
use crate::metrics::record_publish;
use crate::token::TokenIssuer;
use crate::transport::PublishTransport;
use crate::types::VideoImagesUpdate;

/// Where and as whom to publish.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Endpoint accepting `VideoImagesUpdate` bodies
    pub endpoint_url: String,
    /// Optional credential scope passed to the token issuer
    pub client_id: Option<String>,
}

/// Publishes the image set of a video, once per course run.
#[derive(Clone)]
pub struct VideoImagePublisher {
    tokens: Arc<dyn TokenIssuer>,
    transport: Arc<dyn PublishTransport>,
    config: PublisherConfig,
}

impl VideoImagePublisher {
    pub fn new(
        tokens: Arc<dyn TokenIssuer>,
        transport: Arc<dyn PublishTransport>,
        config: PublisherConfig,
    ) -> Self {
        Self {
            tokens,
            transport,
            config,
        }
    }

    /// Publish `image_keys` to every course run of `video`.
    ///
    /// Nothing is called when the video has no course runs or there are no
    /// images. Otherwise exactly one token is requested and exactly one call
    /// is made per course run; a failed call is recorded in the report and
    /// does not stop the remaining ones. Only a token failure is returned as
    /// an error.
    pub async fn update_val(
        &self,
        video: &VideoDescriptor,
        image_keys: &[String],
    ) -> PublishResult<PublishReport> {
        if video.course_ids.is_empty() || image_keys.is_empty() {
            info!(
                course_runs = video.course_ids.len(),
                images = image_keys.len(),
                "Nothing to publish"
            );
            return Ok(PublishReport::new());
        }

        let token = self.tokens.issue_token(self.config.client_id.clone()).await?;

        let mut report = PublishReport::new();
        for course_id in &video.course_ids {
            let outcome = self
                .publish_one(&token, video, course_id, image_keys)
                .instrument(info_span!("publish", course_id = %course_id))
                .await;
            report.push(outcome);
        }

        info!(
            attempted = report.attempted(),
            succeeded = report.succeeded(),
            "Published video images"
        );
        Ok(report)
    }

    async fn publish_one(
        &self,
        token: &str,
        video: &VideoDescriptor,
        course_id: &str,
        image_keys: &[String],
    ) -> PublishOutcome {
        let update = VideoImagesUpdate {
            course_id: course_id.to_string(),
            edx_video_id: video.val_id.clone(),
            generated_images: image_keys.to_vec(),
        };

        let outcome = match self
            .transport
            .post_images(&self.config.endpoint_url, token, &update)
            .await
        {
            Ok(status) => PublishOutcome::succeeded(course_id, Some(status)),
            Err(e) => {
                error!(
                    course_id = %course_id,
                    val_id = ?video.val_id,
                    "Video images update failed: {}", e
                );
                PublishOutcome::failed(course_id, e.status(), e.to_string())
            }
        };

        record_publish(outcome.success);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PublishError;
    use crate::token::MockTokenIssuer;
    use crate::transport::MockPublishTransport;

    const IMAGES_URL: &str = "https://www.testimg.com/update/images";

    fn config() -> PublisherConfig {
        PublisherConfig {
            endpoint_url: IMAGES_URL.to_string(),
            client_id: None,
        }
    }

    fn image_keys() -> Vec<String> {
        vec!["video-images/abc.png".to_string()]
    }

    fn video(course_ids: &[&str]) -> VideoDescriptor {
        VideoDescriptor::new(16.0).with_course_ids(course_ids.iter().copied())
    }

    fn token_issuer(times: usize) -> MockTokenIssuer {
        let mut tokens = MockTokenIssuer::new();
        tokens
            .expect_issue_token()
            .times(times)
            .returning(|_| Ok("val_api_token".to_string()));
        tokens
    }

    #[tokio::test]
    async fn test_one_call_per_course_run() {
        for course_ids in [
            vec![
                "course-v1:W3Cx+HTML5.0x+1T2017",
                "course-v1:W3Cx+HTML5.0x+1T2018",
                "course-v1:W3Cx+HTML5.0x+1T2019",
            ],
            vec!["course-v1:W3Cx+HTML5.0x+1T2017", "course-v1:W3Cx+HTML5.0x+1T2018"],
        ] {
            let mut transport = MockPublishTransport::new();
            transport
                .expect_post_images()
                .withf(|url, token, update| {
                    url == IMAGES_URL
                        && token == "val_api_token"
                        && update.generated_images == vec!["video-images/abc.png".to_string()]
                })
                .times(course_ids.len())
                .returning(|_, _, _| Ok(200));

            let publisher =
                VideoImagePublisher::new(Arc::new(token_issuer(1)), Arc::new(transport), config());
            let report = publisher
                .update_val(&video(&course_ids), &image_keys())
                .await
                .unwrap();

            assert_eq!(report.attempted(), course_ids.len());
            assert!(report.all_succeeded());
            let published: Vec<_> = report.outcomes.iter().map(|o| o.course_id.as_str()).collect();
            assert_eq!(published, course_ids);
        }
    }

    #[tokio::test]
    async fn test_no_course_runs_makes_no_calls() {
        let mut transport = MockPublishTransport::new();
        transport.expect_post_images().never();

        let publisher =
            VideoImagePublisher::new(Arc::new(token_issuer(0)), Arc::new(transport), config());
        let report = publisher.update_val(&video(&[]), &image_keys()).await.unwrap();

        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_no_images_makes_no_calls() {
        let mut transport = MockPublishTransport::new();
        transport.expect_post_images().never();

        let publisher =
            VideoImagePublisher::new(Arc::new(token_issuer(0)), Arc::new(transport), config());
        let report = publisher.update_val(&video(&["course-a"]), &[]).await.unwrap();

        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_remaining_course_runs() {
        let mut transport = MockPublishTransport::new();
        transport
            .expect_post_images()
            .times(3)
            .returning(|_, _, update| {
                if update.course_id == "course-b" {
                    Err(PublishError::Rejected {
                        status: 500,
                        body: "boom".to_string(),
                    })
                } else {
                    Ok(204)
                }
            });

        let publisher =
            VideoImagePublisher::new(Arc::new(token_issuer(1)), Arc::new(transport), config());
        let report = publisher
            .update_val(&video(&["course-a", "course-b", "course-c"]), &image_keys())
            .await
            .unwrap();

        assert_eq!(report.attempted(), 3);
        assert_eq!(report.succeeded(), 2);

        let failed: Vec<_> = report.failed().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].course_id, "course-b");
        assert_eq!(failed[0].status, Some(500));
        assert!(failed[0].error.as_deref().unwrap().contains("boom"));
    }

    #[tokio::test]
    async fn test_all_calls_failing_still_attempts_each() {
        let mut transport = MockPublishTransport::new();
        transport
            .expect_post_images()
            .times(2)
            .returning(|_, _, _| Err(PublishError::Rejected { status: 403, body: String::new() }));

        let publisher =
            VideoImagePublisher::new(Arc::new(token_issuer(1)), Arc::new(transport), config());
        let report = publisher
            .update_val(&video(&["course-a", "course-b"]), &image_keys())
            .await
            .unwrap();

        assert_eq!(report.attempted(), 2);
        assert_eq!(report.succeeded(), 0);
    }

    #[tokio::test]
    async fn test_token_failure_aborts_before_any_call() {
        let mut tokens = MockTokenIssuer::new();
        tokens
            .expect_issue_token()
            .times(1)
            .returning(|_| Err(PublishError::auth("token endpoint down")));

        let mut transport = MockPublishTransport::new();
        transport.expect_post_images().never();

        let publisher = VideoImagePublisher::new(Arc::new(tokens), Arc::new(transport), config());
        let err = publisher
            .update_val(&video(&["course-a", "course-b"]), &image_keys())
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::Auth(_)));
    }

    #[tokio::test]
    async fn test_client_id_passed_to_issuer() {
        let mut tokens = MockTokenIssuer::new();
        tokens
            .expect_issue_token()
            .withf(|client_id| client_id.as_deref() == Some("video-worker"))
            .times(1)
            .returning(|_| Ok("scoped".to_string()));

        let mut transport = MockPublishTransport::new();
        transport
            .expect_post_images()
            .withf(|_, token, _| token == "scoped")
            .times(1)
            .returning(|_, _, _| Ok(200));

        let publisher = VideoImagePublisher::new(
            Arc::new(tokens),
            Arc::new(transport),
            PublisherConfig {
                endpoint_url: IMAGES_URL.to_string(),
                client_id: Some("video-worker".to_string()),
            },
        );

        publisher
            .update_val(&video(&["course-a"]), &image_keys())
            .await
            .unwrap();
    }
}
