//! Publishing of generated video images.
//!
//! This crate provides:
//! - The `TokenIssuer` capability and an OAuth2 token endpoint client
//! - The `PublishTransport` capability and its reqwest implementation
//! - `VideoImagePublisher`, which authenticates once and publishes the image
//!   set to every course run independently

pub mod error;
pub mod metrics;
pub mod publisher;
pub mod token;
pub mod transport;
pub mod types;

pub use error::{PublishError, PublishResult};
pub use publisher::{PublisherConfig, VideoImagePublisher};
pub use token::{HttpTokenIssuer, TokenConfig, TokenIssuer};
pub use transport::{HttpPublishTransport, PublishTransport, TransportConfig};
pub use types::{TokenResponse, VideoImagesUpdate};
