// Typed operations against the reliability backend's REST surface.
// One method per endpoint; all of them go through the HttpClient adapter.

use crate::error::ClientResult;
use crate::http::HttpClient;
use crate::models::{
    AnalysisRequest, AnalysisResult, HealthStatus, HistoryPage, HistoryQuery, LeadAck, LeadSubmission, QuotaInfo,
    RoiRequest, RoiResult,
};

pub const ANALYZE_PATH: &str = "/v1/analyze";
pub const QUOTA_PATH: &str = "/v1/quota";
pub const HISTORY_PATH: &str = "/v1/history";
pub const HISTORY_EXPORT_PATH: &str = "/v1/history/export.csv";
pub const LEADS_PATH: &str = "/v1/leads";
pub const ROI_PATH: &str = "/v1/roi";
pub const HEALTH_PATH: &str = "/health";

#[derive(Clone)]
pub struct ReliabilityApi {
    http: HttpClient,
}

impl ReliabilityApi {
    pub fn new(http: HttpClient) -> Self {
        ReliabilityApi { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    // Validates, then submits the vehicle description for scoring
    pub async fn analyze(&self, request: &AnalysisRequest, current_year: i32) -> ClientResult<AnalysisResult> {
        request.validate(current_year)?;
        tracing::info!(
            make = %request.make,
            model = %request.model,
            year = request.year,
            advanced = request.advanced_mode,
            "Submitting analysis request"
        );
        let result: AnalysisResult = self.http.post_json(ANALYZE_PATH, request).await?;
        tracing::info!(source = ?result.source, fallback = result.used_fallback, "Analysis completed");
        Ok(result)
    }

    pub async fn quota(&self) -> ClientResult<QuotaInfo> {
        self.http.get_json(QUOTA_PATH, &[]).await
    }

    pub async fn history(&self, query: HistoryQuery) -> ClientResult<HistoryPage> {
        let params = [("limit", query.limit.to_string()), ("offset", query.offset.to_string())];
        let page: HistoryPage = self.http.get_json(HISTORY_PATH, &params).await?;
        tracing::debug!(items = page.items.len(), "Fetched history page");
        Ok(page)
    }

    // Opaque CSV body; callers persist it without looking inside
    pub async fn export_history(&self) -> ClientResult<Vec<u8>> {
        self.http.get_bytes(HISTORY_EXPORT_PATH).await
    }

    pub async fn submit_lead(&self, lead: &LeadSubmission) -> ClientResult<LeadAck> {
        lead.validate()?;
        tracing::info!(lead_type = ?lead.lead_type, "Submitting lead");
        // The lead is saved once the backend answers 2xx; the ack body is optional
        self.http.post_ack(LEADS_PATH, lead).await
    }

    pub async fn roi(&self, request: &RoiRequest, current_year: i32) -> ClientResult<RoiResult> {
        request.validate(current_year)?;
        self.http.post_json(ROI_PATH, request).await
    }

    pub async fn health(&self) -> ClientResult<HealthStatus> {
        self.http.get_json(HEALTH_PATH, &[]).await
    }
}
