//! Publish metrics.

use metrics::counter;

/// Metric name constants for consistency.
pub mod names {
    /// Publish calls by outcome.
    pub const PUBLISH_TOTAL: &str = "video_images_publish_total";

    /// Token requests by outcome.
    pub const TOKEN_REQUESTS_TOTAL: &str = "video_images_token_requests_total";
}

/// Record one publish call.
pub fn record_publish(success: bool) {
    counter!(names::PUBLISH_TOTAL, "status" => outcome(success)).increment(1);
}

/// Record one token request.
pub fn record_token_request(success: bool) {
    counter!(names::TOKEN_REQUESTS_TOTAL, "status" => outcome(success)).increment(1);
}

fn outcome(success: bool) -> &'static str {
    if success {
        "ok"
    } else {
        "failed"
    }
}
