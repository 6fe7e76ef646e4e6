use super::*;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use shared::error::{ApiError, ErrorCode};
use tokio::net::TcpListener;

const TEST_KEY: &str = "test-dashboard-key";

#[derive(Debug, Default)]
struct CapturedAnalyze {
    fields: HashMap<String, String>,
    file_name: String,
    file_len: usize,
}

#[derive(Clone)]
struct AnalyzeState {
    captured: Arc<Mutex<Option<CapturedAnalyze>>>,
    respond_with_error: bool,
}

async fn handle_analyze(
    State(state): State<AnalyzeState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ApiError>)> {
    let mut captured = CapturedAnalyze::default();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            captured.file_name = field.file_name().unwrap_or_default().to_string();
            captured.file_len = field.bytes().await.unwrap().len();
        } else {
            captured.fields.insert(name, field.text().await.unwrap());
        }
    }
    let athlete_name = captured.fields.get("name").cloned().unwrap_or_default();
    *state.captured.lock().await = Some(captured);

    if state.respond_with_error {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiError::new(
                ErrorCode::Validation,
                "contract text could not be extracted",
            )),
        ));
    }
    Ok(Json(serde_json::json!({
        "id": "r-100",
        "athleteName": athlete_name,
        "overallRisk": "medium",
        "summary": "Mostly standard terms.",
        "risks": [{
            "section": "Section 3.2",
            "level": "high",
            "title": "Broad exclusivity",
            "description": "Covers all platforms.",
            "recommendation": "Narrow the scope."
        }],
        "keyTerms": [{
            "term": "Exclusivity Period",
            "explanation": "Time you cannot sign competing deals."
        }],
        "generatedAt": "2026-03-04T10:00:00Z"
    })))
}

const TEST_PDF_BYTES: &[u8] = b"%PDF-1.7 rendered report";

async fn handle_report_pdf(
    Path(report_id): Path<String>,
) -> Result<Vec<u8>, (StatusCode, Json<ApiError>)> {
    if report_id != "r-100" {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiError::new(ErrorCode::NotFound, "report not found")),
        ));
    }
    Ok(TEST_PDF_BYTES.to_vec())
}

async fn spawn_analyze_server(
    respond_with_error: bool,
) -> (String, Arc<Mutex<Option<CapturedAnalyze>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured = Arc::new(Mutex::new(None));
    let state = AnalyzeState {
        captured: captured.clone(),
        respond_with_error,
    };
    let app = Router::new()
        .route("/analyze", post(handle_analyze))
        .route("/report/:report_id/pdf", get(handle_report_pdf))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), captured)
}

fn test_athlete() -> AthleteInfo {
    AthleteInfo {
        name: "Jordan Smith".to_string(),
        email: "jsmith@university.edu".to_string(),
        school: "State University".to_string(),
        sport: "Football".to_string(),
        state: "Texas".to_string(),
        consent_to_kb: true,
    }
}

fn test_upload() -> ContractUpload {
    ContractUpload::new("deal.pdf", b"%PDF-1.7 fake".to_vec()).unwrap()
}

#[tokio::test]
async fn analyze_submits_athlete_fields_and_file() {
    let (url, captured) = spawn_analyze_server(false).await;
    let client = NilApiClient::new(&url).unwrap();

    let report = client.analyze(&test_athlete(), test_upload()).await.unwrap();
    assert_eq!(report.id, "r-100");
    assert_eq!(report.athlete_name, "Jordan Smith");
    assert_eq!(report.overall_risk, shared::domain::RiskLevel::Medium);
    assert_eq!(report.risks.len(), 1);
    assert_eq!(report.key_terms.len(), 1);

    let captured = captured.lock().await.take().unwrap();
    assert_eq!(captured.file_name, "deal.pdf");
    assert_eq!(captured.file_len, b"%PDF-1.7 fake".len());
    assert_eq!(captured.fields.get("name").unwrap(), "Jordan Smith");
    assert_eq!(captured.fields.get("email").unwrap(), "jsmith@university.edu");
    assert_eq!(captured.fields.get("school").unwrap(), "State University");
    assert_eq!(captured.fields.get("sport").unwrap(), "Football");
    assert_eq!(captured.fields.get("state").unwrap(), "Texas");
    assert_eq!(captured.fields.get("consent").unwrap(), "true");
}

#[tokio::test]
async fn analyze_surfaces_service_error_detail() {
    let (url, _captured) = spawn_analyze_server(true).await;
    let client = NilApiClient::new(&url).unwrap();

    let err = client
        .analyze(&test_athlete(), test_upload())
        .await
        .unwrap_err();
    match err {
        ApiClientError::Status { status, detail } => {
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(detail, "contract text could not be extracted");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn report_pdf_bytes_are_returned_verbatim() {
    let (url, _captured) = spawn_analyze_server(false).await;
    let client = NilApiClient::new(&url).unwrap();

    let bytes = client.download_report_pdf("r-100").await.unwrap();
    assert_eq!(bytes, TEST_PDF_BYTES);
}

#[tokio::test]
async fn report_pdf_download_surfaces_service_error_detail() {
    let (url, _captured) = spawn_analyze_server(false).await;
    let client = NilApiClient::new(&url).unwrap();

    let err = client.download_report_pdf("r-404").await.unwrap_err();
    match err {
        ApiClientError::Status { status, detail } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(detail, "report not found");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn contract_upload_rejects_unsupported_extension() {
    let err = ContractUpload::new("notes.txt", Vec::new()).unwrap_err();
    assert!(matches!(err, ApiClientError::UnsupportedFileType(_)));
}

#[test]
fn contract_upload_maps_known_extensions() {
    let pdf = ContractUpload::new("Deal.PDF", Vec::new()).unwrap();
    assert_eq!(pdf.mime_type, "application/pdf");
    let docx = ContractUpload::new("deal.docx", Vec::new()).unwrap();
    assert_eq!(
        docx.mime_type,
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
}

#[test]
fn client_rejects_invalid_base_url() {
    assert!(matches!(
        NilApiClient::new("not a url"),
        Err(ApiClientError::InvalidBaseUrl(_))
    ));
    assert!(matches!(
        NilApiClient::new("ftp://example.com"),
        Err(ApiClientError::InvalidBaseUrl(_))
    ));
}

#[derive(Clone, Default)]
struct DashboardState {
    summary_status: Option<StatusCode>,
    analytics_hits: Arc<Mutex<u32>>,
    deals_limit: Arc<Mutex<Option<String>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(DASHBOARD_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        == Some(TEST_KEY)
}

async fn handle_auth(headers: HeaderMap) -> StatusCode {
    if authorized(&headers) {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    }
}

async fn handle_summary(
    State(state): State<DashboardState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    if let Some(status) = state.summary_status {
        return Err(status);
    }
    Ok(Json(serde_json::json!({
        "totalDeals": 2,
        "dealsBySport": { "Football": 2 },
        "totalCompensation": 30000.0,
        "averageCompensation": 15000.0,
        "compensationPercentiles": { "p25": 5000.0, "p50": 15000.0 }
    })))
}

async fn handle_deals(
    State(state): State<DashboardState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    *state.deals_limit.lock().await = params.get("limit").cloned();
    Ok(Json(serde_json::json!({
        "deals": [{
            "dealId": "d-1",
            "athleteName": "Jordan Smith",
            "athleteEmail": "jsmith@university.edu",
            "school": "State University",
            "sport": "Football",
            "state": "Texas",
            "dealType": "endorsement",
            "totalCompensation": 25000.0,
            "overallRisk": "low",
            "extractionStatus": "COMPLETED",
            "qualityScore": 0.93,
            "createdAt": "2026-03-01T09:00:00Z"
        }]
    })))
}

async fn handle_filter_options(headers: HeaderMap) -> Result<Json<serde_json::Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(serde_json::json!({
        "sports": ["Football"],
        "states": ["Texas"],
        "schools": ["State University"],
        "riskLevels": ["low", "medium", "high"],
        "dealTypes": ["endorsement"],
        "statuses": ["COMPLETED"],
        "compensationRange": { "min": 0.0, "max": 25000.0 }
    })))
}

async fn handle_analytics(
    State(state): State<DashboardState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    *state.analytics_hits.lock().await += 1;
    Ok(Json(serde_json::json!({
        "dealsAnalyzed": 2,
        "payorTypeDistribution": { "brand": 2 },
        "exclusivityBreakdown": { "exclusive": 1, "non_exclusive": 1 },
        "perpetualRightsCount": 1,
        "clawbackCount": 0,
        "clawbackRate": 0.0
    })))
}

async fn handle_deal_detail(
    headers: HeaderMap,
    Path(deal_id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    if deal_id != "d-1" {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(serde_json::json!({
        "dealId": "d-1",
        "athleteName": "Jordan Smith",
        "athleteEmail": "jsmith@university.edu",
        "school": "State University",
        "sport": "Football",
        "state": "Texas",
        "overallRisk": "low",
        "summary": "Standard endorsement deal.",
        "risks": [],
        "keyTerms": [],
        "extractionStatus": "COMPLETED",
        "extractionData": { "deal": { "deal_type": "endorsement" } },
        "qualityScore": 0.93,
        "createdAt": "2026-03-01T09:00:00Z",
        "generatedAt": "2026-03-01T09:05:00Z"
    })))
}

async fn spawn_dashboard_server(state: DashboardState) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new()
        .route("/dashboard/auth", post(handle_auth))
        .route("/dashboard/summary", get(handle_summary))
        .route("/dashboard/deals", get(handle_deals))
        .route("/dashboard/deals/:deal_id", get(handle_deal_detail))
        .route("/dashboard/filter-options", get(handle_filter_options))
        .route("/dashboard/analytics", get(handle_analytics))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn login_rejects_bad_key_and_accepts_good_key() {
    let url = spawn_dashboard_server(DashboardState::default()).await;
    let client = NilApiClient::new(&url).unwrap();

    let err = DashboardSession::login(client.clone(), "wrong-key")
        .await
        .err()
        .unwrap();
    assert!(matches!(err, DashboardError::InvalidKey));

    assert!(DashboardSession::login(client, TEST_KEY).await.is_ok());
}

#[tokio::test]
async fn snapshot_loads_summary_deals_and_filter_options() {
    let state = DashboardState::default();
    let deals_limit = state.deals_limit.clone();
    let url = spawn_dashboard_server(state).await;
    let client = NilApiClient::new(&url).unwrap();
    let session = DashboardSession::login(client, TEST_KEY).await.unwrap();

    let snapshot = session.load_snapshot().await.unwrap();
    assert_eq!(snapshot.summary.total_deals, 2);
    assert_eq!(snapshot.summary.deals_by_sport.get("Football"), Some(&2.0));
    assert_eq!(snapshot.deals.len(), 1);
    assert_eq!(snapshot.deals[0].deal_id, "d-1");
    assert_eq!(snapshot.filter_options.sports, vec!["Football"]);
    assert_eq!(
        deals_limit.lock().await.as_deref(),
        Some(DEALS_FETCH_LIMIT.to_string().as_str())
    );
}

#[tokio::test]
async fn snapshot_fails_when_any_fetch_fails() {
    let state = DashboardState {
        summary_status: Some(StatusCode::INTERNAL_SERVER_ERROR),
        ..DashboardState::default()
    };
    let url = spawn_dashboard_server(state).await;
    let client = NilApiClient::new(&url).unwrap();
    let session = DashboardSession::login(client, TEST_KEY).await.unwrap();

    let err = session.load_snapshot().await.unwrap_err();
    assert!(matches!(
        err,
        DashboardError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            ..
        }
    ));
}

#[tokio::test]
async fn analytics_is_fetched_once_per_session() {
    let state = DashboardState::default();
    let hits = state.analytics_hits.clone();
    let url = spawn_dashboard_server(state).await;
    let client = NilApiClient::new(&url).unwrap();
    let session = DashboardSession::login(client, TEST_KEY).await.unwrap();

    let first = session.analytics().await.unwrap();
    let second = session.analytics().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.deals_analyzed, 2);
    assert_eq!(first.exclusivity_breakdown.exclusive, 1);
    assert_eq!(*hits.lock().await, 1);
}

#[tokio::test]
async fn deal_detail_maps_missing_deal_to_not_found() {
    let url = spawn_dashboard_server(DashboardState::default()).await;
    let client = NilApiClient::new(&url).unwrap();
    let session = DashboardSession::login(client, TEST_KEY).await.unwrap();

    let detail = session.deal_detail("d-1").await.unwrap();
    assert_eq!(detail.deal_id, "d-1");
    assert!(detail.extraction().contains_key("deal"));

    let err = session.deal_detail("d-404").await.unwrap_err();
    match err {
        DashboardError::DealNotFound(id) => assert_eq!(id, "d-404"),
        other => panic!("unexpected error: {other}"),
    }
}
