//! HTTP transport for publish calls.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::{PublishError, PublishResult};
use crate::types::VideoImagesUpdate;

/// Sends one authenticated publish request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PublishTransport: Send + Sync {
    /// POST `update` to `url`; returns the HTTP status on success.
    async fn post_images(
        &self,
        url: &str,
        token: &str,
        update: &VideoImagesUpdate,
    ) -> PublishResult<u16>;
}

/// Transport configuration.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

/// `PublishTransport` backed by reqwest.
#[derive(Clone)]
pub struct HttpPublishTransport {
    http: Client,
}

impl HttpPublishTransport {
    pub fn new(config: TransportConfig) -> PublishResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!("vimg-publish/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(PublishError::Network)?;

        Ok(Self { http })
    }
}

#[async_trait]
impl PublishTransport for HttpPublishTransport {
    async fn post_images(
        &self,
        url: &str,
        token: &str,
        update: &VideoImagesUpdate,
    ) -> PublishResult<u16> {
        debug!(course_id = %update.course_id, "POST {}", url);

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(update)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(status.as_u16())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(PublishError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
