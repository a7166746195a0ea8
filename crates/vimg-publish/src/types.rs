//! Request/response types of the video asset service.

use serde::{Deserialize, Serialize};

/// Body of one publish call: the full image set for one course run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoImagesUpdate {
    pub course_id: String,
    pub edx_video_id: Option<String>,
    pub generated_images: Vec<String>,
}

/// OAuth2 token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}
