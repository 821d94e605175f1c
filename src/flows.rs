// User-visible failure messages, one set per flow.
// Only the analyze flow distinguishes rate limiting and unavailability.

use reqwest::StatusCode;

use crate::error::ClientError;

pub const SESSION_EXPIRED: &str = "Session expired. Please sign in again.";
pub const DAILY_LIMIT_REACHED: &str = "Daily limit reached. Please try again tomorrow.";
pub const SERVICE_UNAVAILABLE: &str = "Service temporarily unavailable. Please try again later.";
pub const ANALYZE_FAILED: &str = "Failed to analyze. Please try again.";
pub const QUOTA_FAILED: &str = "Failed to fetch quota";
pub const HISTORY_FAILED: &str = "Failed to load history";
pub const EXPORT_FAILED: &str = "Failed to export history";
pub const LEAD_FAILED: &str = "Failed to submit lead";
pub const ROI_FAILED: &str = "Failed to calculate ROI";
pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
pub const HEALTH_FAILED: &str = "Backend is not reachable";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Analyze,
    Quota,
    History,
    Export,
    Leads,
    Roi,
    Health,
}

impl Flow {
    fn generic_message(&self) -> &'static str {
        match self {
            Flow::Analyze => ANALYZE_FAILED,
            Flow::Quota => QUOTA_FAILED,
            Flow::History => HISTORY_FAILED,
            Flow::Export => EXPORT_FAILED,
            Flow::Leads => LEAD_FAILED,
            Flow::Roi => ROI_FAILED,
            Flow::Health => HEALTH_FAILED,
        }
    }

    // Translates a failed request into the text shown to the user
    pub fn failure_message(&self, error: &ClientError) -> String {
        match error {
            ClientError::Unauthorized => SESSION_EXPIRED.to_string(),
            ClientError::Validation(v) => v.to_string(),
            _ => match (self, error.status()) {
                (Flow::Analyze, Some(StatusCode::TOO_MANY_REQUESTS)) => DAILY_LIMIT_REACHED.to_string(),
                (Flow::Analyze, Some(StatusCode::SERVICE_UNAVAILABLE)) => SERVICE_UNAVAILABLE.to_string(),
                _ => self.generic_message().to_string(),
            },
        }
    }
}
