//! Shared data models for the video images worker.
//!
//! This crate provides Serde-serializable types for:
//! - Job identifiers
//! - Video descriptors consumed by extraction and publishing
//! - Extracted still images and their fixed geometry
//! - Per-course-run publish outcomes

pub mod image;
pub mod job;
pub mod publish;
pub mod video;

// Re-export common types
pub use image::{ExtractedImage, IMAGE_COUNT, IMAGE_HEIGHT, IMAGE_WIDTH};
pub use job::JobId;
pub use publish::{PublishOutcome, PublishReport};
pub use video::VideoDescriptor;
