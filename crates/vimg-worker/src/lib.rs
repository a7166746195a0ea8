//! Video images worker.
//!
//! This crate provides:
//! - Settings loaded from the environment
//! - Tracing initialisation and structured job logging
//! - The video images job: extract stills, store them, publish their keys

pub mod config;
pub mod error;
pub mod job;
pub mod logging;

pub use config::Settings;
pub use error::{WorkerError, WorkerResult};
pub use job::{JobServices, JobSummary, VideoImagesJob};
pub use logging::{init_tracing, JobLogger};
