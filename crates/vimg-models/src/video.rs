//! Video descriptor.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The video a job works on.
///
/// Supplied by the caller and never mutated by extraction or publishing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoDescriptor {
    /// Duration of the encoded source in seconds
    pub duration: f64,
    /// Opaque identifier of the video in the asset-management service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub val_id: Option<String>,
    /// Course runs that reference this video, in publish order
    #[serde(default)]
    pub course_ids: Vec<String>,
}

impl VideoDescriptor {
    /// Create a descriptor with no associated course runs.
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            val_id: None,
            course_ids: Vec::new(),
        }
    }

    pub fn with_val_id(mut self, val_id: impl Into<String>) -> Self {
        self.val_id = Some(val_id.into());
        self
    }

    pub fn with_course_ids<I, S>(mut self, course_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.course_ids = course_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Whether any course run references this video.
    pub fn has_course_runs(&self) -> bool {
        !self.course_ids.is_empty()
    }
}
