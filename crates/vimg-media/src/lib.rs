//! Still-frame extraction for the video images worker.
//!
//! This crate provides:
//! - Deterministic frame position selection from a video duration
//! - Type-safe FFmpeg command building and a runner with timeouts
//! - A mockable `Transcoder` capability
//! - The frame extractor, which validates count and geometry of its output

pub mod command;
pub mod error;
pub mod extractor;
pub mod positions;
pub mod transcoder;
pub mod validate;

pub use command::{FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use extractor::{image_file_name, FrameExtractor};
pub use positions::calculate_positions;
pub use transcoder::{FfmpegTranscoder, FrameRequest, Transcoder};
pub use validate::validate_image;
