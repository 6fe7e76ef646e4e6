//! HTTP client for the contract-analysis service plus the pure UI logic
//! (wizard state machine, deal filtering, chart shaping, display formatting)
//! that front-ends share. The service is consumed as a black box: this crate
//! never interprets contract text itself.

use std::time::Duration;

use reqwest::{multipart, Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    dashboard::{
        AnalyticsData, DashboardSummary, DealDetail, DealSummary, DealsPage, FilterOptions,
    },
    domain::{AnalysisReport, AthleteInfo},
    error::ApiError,
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

pub mod charts;
pub mod filters;
pub mod format;
pub mod wizard;

/// Header carrying the shared dashboard secret on every internal endpoint.
pub const DASHBOARD_KEY_HEADER: &str = "X-Dashboard-Key";

/// The deals table is fetched in one page; the service caps larger asks.
pub const DEALS_FETCH_LIMIT: usize = 500;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Contract analysis runs an LLM pipeline server-side and can take minutes.
const ANALYZE_TIMEOUT: Duration = Duration::from_secs(180);

const RESPONSE_DETAIL_MAX_CHARS: usize = 300;

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("invalid API base url `{0}`")]
    InvalidBaseUrl(String),
    #[error("unsupported contract file type `{0}` (expected pdf, doc, or docx)")]
    UnsupportedFileType(String),
    #[error("could not read contract file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("analysis service returned {status}: {detail}")]
    Status { status: StatusCode, detail: String },
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("invalid dashboard key")]
    InvalidKey,
    #[error("deal `{0}` not found")]
    DealNotFound(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("dashboard service returned {status}: {detail}")]
    Status { status: StatusCode, detail: String },
}

/// A contract file staged for upload, read fully into memory. Contracts are
/// a few megabytes at most, so buffering beats streaming here.
#[derive(Debug, Clone)]
pub struct ContractUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ContractUpload {
    pub fn new(
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, ApiClientError> {
        let file_name = file_name.into();
        let mime_type = contract_mime_type(&file_name)?.to_string();
        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }

    pub async fn from_path(path: &std::path::Path) -> Result<Self, ApiClientError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = contract_mime_type(&file_name)?.to_string();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }
}

/// Only the three formats the extraction pipeline accepts.
fn contract_mime_type(file_name: &str) -> Result<&'static str, ApiClientError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => Ok("application/pdf"),
        "doc" => Ok("application/msword"),
        "docx" => {
            Ok("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        }
        _ => Err(ApiClientError::UnsupportedFileType(file_name.to_string())),
    }
}

/// Thin client over the analysis service. Cloning shares the underlying
/// connection pool.
#[derive(Debug, Clone)]
pub struct NilApiClient {
    http: Client,
    base_url: Url,
}

impl NilApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiClientError> {
        let parsed = Url::parse(base_url)
            .map_err(|_| ApiClientError::InvalidBaseUrl(base_url.to_string()))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiClientError::InvalidBaseUrl(base_url.to_string()));
        }
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    /// Submits a contract with its athlete details for analysis and waits for
    /// the finished report. Consent is forwarded verbatim so the service can
    /// decide whether the document may enter its knowledge base.
    pub async fn analyze(
        &self,
        athlete: &AthleteInfo,
        upload: ContractUpload,
    ) -> Result<AnalysisReport, ApiClientError> {
        info!(file = %upload.file_name, athlete = %athlete.name, "submitting contract for analysis");
        let file_part = multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name.clone())
            .mime_str(&upload.mime_type)?;
        let form = multipart::Form::new()
            .part("file", file_part)
            .text("name", athlete.name.clone())
            .text("email", athlete.email.clone())
            .text("school", athlete.school.clone())
            .text("sport", athlete.sport.clone())
            .text("state", athlete.state.clone())
            .text("consent", if athlete.consent_to_kb { "true" } else { "false" });

        let response = self
            .http
            .post(self.endpoint(&["analyze"]))
            .timeout(ANALYZE_TIMEOUT)
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response_detail(status, &response.text().await.unwrap_or_default());
            warn!(%status, %detail, "analysis request rejected");
            return Err(ApiClientError::Status { status, detail });
        }
        let report = response.json::<AnalysisReport>().await?;
        info!(report_id = %report.id, risk = report.overall_risk.as_str(), "analysis complete");
        Ok(report)
    }

    /// Fetches the rendered PDF for a finished report.
    pub async fn download_report_pdf(&self, report_id: &str) -> Result<Vec<u8>, ApiClientError> {
        let response = self
            .http
            .get(self.endpoint(&["report", report_id, "pdf"]))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response_detail(status, &response.text().await.unwrap_or_default());
            return Err(ApiClientError::Status { status, detail });
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Validates a dashboard key. The service answers 200 or 401 and nothing
    /// else on success paths.
    pub async fn dashboard_auth(&self, key: &str) -> Result<(), DashboardError> {
        let response = self
            .http
            .post(self.endpoint(&["dashboard", "auth"]))
            .header(DASHBOARD_KEY_HEADER, key)
            .send()
            .await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(DashboardError::InvalidKey);
        }
        if !status.is_success() {
            let detail = response_detail(status, &response.text().await.unwrap_or_default());
            return Err(DashboardError::Status { status, detail });
        }
        Ok(())
    }

    pub async fn dashboard_summary(&self, key: &str) -> Result<DashboardSummary, DashboardError> {
        self.dashboard_get(key, self.endpoint(&["dashboard", "summary"]))
            .await
    }

    pub async fn dashboard_deals(
        &self,
        key: &str,
        limit: usize,
    ) -> Result<Vec<DealSummary>, DashboardError> {
        let mut url = self.endpoint(&["dashboard", "deals"]);
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        let page: DealsPage = self.dashboard_get(key, url).await?;
        Ok(page.deals)
    }

    pub async fn dashboard_filter_options(&self, key: &str) -> Result<FilterOptions, DashboardError> {
        self.dashboard_get(key, self.endpoint(&["dashboard", "filter-options"]))
            .await
    }

    pub async fn dashboard_analytics(&self, key: &str) -> Result<AnalyticsData, DashboardError> {
        self.dashboard_get(key, self.endpoint(&["dashboard", "analytics"]))
            .await
    }

    pub async fn dashboard_deal_detail(
        &self,
        key: &str,
        deal_id: &str,
    ) -> Result<DealDetail, DashboardError> {
        let url = self.endpoint(&["dashboard", "deals", deal_id]);
        match self.dashboard_get(key, url).await {
            Err(DashboardError::Status { status, .. }) if status == StatusCode::NOT_FOUND => {
                Err(DashboardError::DealNotFound(deal_id.to_string()))
            }
            other => other,
        }
    }

    async fn dashboard_get<T: DeserializeOwned>(
        &self,
        key: &str,
        url: Url,
    ) -> Result<T, DashboardError> {
        debug!(%url, "dashboard fetch");
        let response = self
            .http
            .get(url)
            .header(DASHBOARD_KEY_HEADER, key)
            .send()
            .await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(DashboardError::InvalidKey);
        }
        if !status.is_success() {
            let detail = response_detail(status, &response.text().await.unwrap_or_default());
            warn!(%status, %detail, "dashboard fetch failed");
            return Err(DashboardError::Status { status, detail });
        }
        Ok(response.json::<T>().await?)
    }
}

fn response_detail(status: StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ApiError>(body) {
        return envelope.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.chars().take(RESPONSE_DETAIL_MAX_CHARS).collect()
    }
}

/// Everything the dashboard landing view needs, fetched as one batch.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub summary: DashboardSummary,
    pub deals: Vec<DealSummary>,
    pub filter_options: FilterOptions,
}

/// An authenticated dashboard session. Holds the validated key and a
/// session-scoped analytics cache; the analytics endpoint is expensive
/// server-side so it is hit at most once per session.
pub struct DashboardSession {
    client: NilApiClient,
    key: String,
    analytics: Mutex<Option<AnalyticsData>>,
}

impl DashboardSession {
    /// Validates `key` against the service before handing back a session, so
    /// a constructed session is always usable.
    pub async fn login(
        client: NilApiClient,
        key: impl Into<String>,
    ) -> Result<Self, DashboardError> {
        let key = key.into();
        client.dashboard_auth(&key).await?;
        info!("dashboard key accepted");
        Ok(Self {
            client,
            key,
            analytics: Mutex::new(None),
        })
    }

    /// Summary, deals, and filter options fetched concurrently. Any single
    /// failure fails the whole batch; the caller retries wholesale rather
    /// than rendering a partial dashboard.
    pub async fn load_snapshot(&self) -> Result<DashboardSnapshot, DashboardError> {
        let (summary, deals, filter_options) = tokio::try_join!(
            self.client.dashboard_summary(&self.key),
            self.client.dashboard_deals(&self.key, DEALS_FETCH_LIMIT),
            self.client.dashboard_filter_options(&self.key),
        )?;
        Ok(DashboardSnapshot {
            summary,
            deals,
            filter_options,
        })
    }

    pub async fn analytics(&self) -> Result<AnalyticsData, DashboardError> {
        let mut cached = self.analytics.lock().await;
        if let Some(data) = cached.as_ref() {
            debug!("serving analytics from session cache");
            return Ok(data.clone());
        }
        let data = self.client.dashboard_analytics(&self.key).await?;
        *cached = Some(data.clone());
        Ok(data)
    }

    pub async fn deal_detail(&self, deal_id: &str) -> Result<DealDetail, DashboardError> {
        self.client.dashboard_deal_detail(&self.key, deal_id).await
    }

    pub fn client(&self) -> &NilApiClient {
        &self.client
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
