//! Publish outcomes.
//!
//! Outcomes are reported as data: one failing course run never hides the
//! results of the others, and the caller decides how to escalate.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Result of publishing the image set to a single course run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PublishOutcome {
    pub course_id: String,
    pub success: bool,
    /// HTTP status returned by the endpoint, if a response was received
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Diagnostic for failed attempts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub attempted_at: DateTime<Utc>,
}

impl PublishOutcome {
    pub fn succeeded(course_id: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            course_id: course_id.into(),
            success: true,
            status,
            error: None,
            attempted_at: Utc::now(),
        }
    }

    pub fn failed(
        course_id: impl Into<String>,
        status: Option<u16>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            course_id: course_id.into(),
            success: false,
            status,
            error: Some(error.into()),
            attempted_at: Utc::now(),
        }
    }
}

/// Aggregated outcomes of one publish invocation, in course-run order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PublishReport {
    pub outcomes: Vec<PublishOutcome>,
}

impl PublishReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: PublishOutcome) {
        self.outcomes.push(outcome);
    }

    /// Number of course runs a publish call was issued for.
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &PublishOutcome> {
        self.outcomes.iter().filter(|o| !o.success)
    }

    /// True when nothing was attempted or every attempt succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.success)
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let mut report = PublishReport::new();
        report.push(PublishOutcome::succeeded("course-a", Some(200)));
        report.push(PublishOutcome::failed("course-b", Some(500), "boom"));
        report.push(PublishOutcome::succeeded("course-c", Some(201)));

        assert_eq!(report.attempted(), 3);
        assert_eq!(report.succeeded(), 2);
        assert!(!report.all_succeeded());

        let failed: Vec<_> = report.failed().map(|o| o.course_id.as_str()).collect();
        assert_eq!(failed, vec!["course-b"]);
    }

    #[test]
    fn test_empty_report() {
        let report = PublishReport::new();
        assert!(report.is_empty());
        assert!(report.all_succeeded());
        assert_eq!(report.attempted(), 0);
    }

    #[test]
    fn test_outcome_serialization_skips_empty_fields() {
        let outcome = PublishOutcome::succeeded("course-a", None);
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("status").is_none());
        assert!(json.get("error").is_none());
        assert_eq!(json["success"], true);
    }
}
